/*!
# Call normalizer
Applies the founder call normalization in [`crate::data_types::founder_call`] to an entire column of raw founder calls, producing a new column of allele codes.

# Example usage
```rust
use mutpat::call_normalizer::normalize_call_column;
use mutpat::data_types::founder_call::CallParseMode;

let raw_calls = vec![Some("3,3".to_string()), Some("3/4".to_string()), None, Some("x,1".to_string())];
let (allele_codes, stats) = normalize_call_column(&raw_calls, CallParseMode::Lenient).unwrap();
assert_eq!(allele_codes, vec![Some("3".to_string()), None, None, None]);
assert_eq!(stats.normalized, 1);
assert_eq!(stats.unparseable, 1);
```
*/
use indicatif::ParallelProgressIterator;
use log::debug;
use rayon::prelude::*;
use std::ops::AddAssign;

use crate::data_types::founder_call::{parse_founder_call_strict, AlleleCode, CallParseMode, FounderCallError};
use crate::data_types::group::Column;
use crate::util::progress_bar::get_progress_style;

/// Tracks what happened to each call during normalization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    /// Total number of calls
    pub total: u64,
    /// Calls converted to an allele code
    pub normalized: u64,
    /// Calls that were missing in the input
    pub missing_input: u64,
    /// Calls without a separator or with disagreeing reads
    pub unresolved: u64,
    /// Calls with bad tokens that were converted to missing (lenient mode only)
    pub unparseable: u64
}

impl AddAssign for NormalizationStats {
    // Enables += with stats
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.normalized += rhs.normalized;
        self.missing_input += rhs.missing_input;
        self.unresolved += rhs.unresolved;
        self.unparseable += rhs.unparseable;
    }
}

impl NormalizationStats {
    /// Number of output cells that are missing
    pub fn missing_output(&self) -> u64 {
        self.total - self.normalized
    }
}

/// Classifies a single call and returns the allele code with the stat it contributes
fn normalize_with_stats(raw: Option<&str>, mode: CallParseMode) -> Result<(AlleleCode, NormalizationStats), FounderCallError> {
    let mut stats = NormalizationStats { total: 1, ..Default::default() };
    let code = match raw {
        None => {
            stats.missing_input = 1;
            None
        },
        Some(call) => match parse_founder_call_strict(call) {
            Ok(Some(code)) => {
                stats.normalized = 1;
                Some(code)
            },
            Ok(None) => {
                stats.unresolved = 1;
                None
            },
            Err(e) => match mode {
                CallParseMode::Strict => return Err(e),
                CallParseMode::Lenient => {
                    debug!("Unparseable founder call converted to missing: {e}");
                    stats.unparseable = 1;
                    None
                }
            }
        }
    };
    Ok((code, stats))
}

/// Normalizes every raw call in a column, in parallel.
/// Output cells are the allele code as text, or `None` when the code is missing.
/// # Arguments
/// * `raw_calls` - the raw founder call column
/// * `mode` - strict mode fails on the first unparseable call, lenient mode converts it to missing
/// # Errors
/// * in strict mode, if any call has a bad token or token count
pub fn normalize_call_column(raw_calls: &[Option<String>], mode: CallParseMode) -> Result<(Column, NormalizationStats), FounderCallError> {
    let style = get_progress_style("calls");
    let results: Vec<(AlleleCode, NormalizationStats)> = raw_calls.par_iter()
        .map(|raw| normalize_with_stats(raw.as_deref(), mode))
        .progress_with_style(style)
        .collect::<Result<_, _>>()?;

    let mut total_stats = NormalizationStats::default();
    let column: Column = results.into_iter()
        .map(|(code, stats)| {
            total_stats += stats;
            code.map(|c| c.to_string())
        })
        .collect();
    Ok((column, total_stats))
}
