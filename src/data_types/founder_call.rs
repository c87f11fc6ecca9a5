
use serde::Serialize;
use strum_macros::EnumString;

/// The normalized allele identity for a founder call; `None` is the missing value
pub type AlleleCode = Option<i64>;

/// Separators we accept between the two reads, in priority order
const CALL_SEPARATORS: [char; 2] = [',', '/'];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FounderCallError {
    #[error("founder call {call:?} has a non-numeric token: {token:?}")]
    NonNumericToken { call: String, token: String },
    #[error("founder call {call:?} must have exactly 2 tokens, found {count}")]
    TokenCount { call: String, count: usize }
}

/// Controls what happens when a founder call has a separator but the tokens are unusable
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, strum_macros::Display, EnumString, Serialize, clap::ValueEnum)]
pub enum CallParseMode {
    /// Unparseable tokens are reported as errors
    #[strum(ascii_case_insensitive, serialize = "strict")]
    #[clap(name = "strict")]
    Strict,
    /// Unparseable tokens are converted to a missing allele code
    #[default]
    #[strum(ascii_case_insensitive, serialize = "lenient")]
    #[clap(name = "lenient")]
    Lenient
}

/// Converts a raw founder call into a single allele code.
/// Calls without a `,` or `/` separator are missing, as are heterozygous calls like "3,4".
/// # Arguments
/// * `raw` - the raw call, `None` if the cell was empty
/// * `mode` - strict mode returns errors for bad tokens, lenient mode converts them to missing
/// # Errors
/// * in strict mode, if the call does not split into exactly two tokens
/// * in strict mode, if either token is not a base-10 integer
pub fn normalize_founder_call(raw: Option<&str>, mode: CallParseMode) -> Result<AlleleCode, FounderCallError> {
    let call = match raw {
        Some(c) => c,
        // an absent value has no separator, so it is always missing
        None => return Ok(None)
    };

    match (parse_founder_call_strict(call), mode) {
        (Ok(code), _) => Ok(code),
        (Err(e), CallParseMode::Strict) => Err(e),
        (Err(_e), CallParseMode::Lenient) => Ok(None)
    }
}

/// Lenient wrapper that never fails; anything unusable becomes a missing allele code.
pub fn normalize_founder_call_lenient(raw: Option<&str>) -> AlleleCode {
    // lenient mode cannot produce an error
    normalize_founder_call(raw, CallParseMode::Lenient).unwrap_or(None)
}

/// Strict parse of a single call string.
/// # Arguments
/// * `call` - the raw call, formatted as "a1,a2" or "a1/a2"
/// # Errors
/// * if the call does not split into exactly two tokens
/// * if either token is not a base-10 integer
pub fn parse_founder_call_strict(call: &str) -> Result<AlleleCode, FounderCallError> {
    // comma takes priority over slash when both are present
    let separator = match CALL_SEPARATORS.iter().find(|&&s| call.contains(s)) {
        Some(&s) => s,
        None => return Ok(None)
    };

    let tokens: Vec<&str> = call.split(separator).collect();
    if tokens.len() != 2 {
        return Err(FounderCallError::TokenCount { call: call.to_string(), count: tokens.len() });
    }

    let a1 = parse_allele_token(call, tokens[0])?;
    let a2 = parse_allele_token(call, tokens[1])?;
    if a1 != a2 {
        // heterozygous calls do not have a single allele code
        return Ok(None);
    }
    Ok(Some(a1))
}

/// Parses one side of the call, surrounding whitespace is ignored
fn parse_allele_token(call: &str, token: &str) -> Result<i64, FounderCallError> {
    token.trim().parse::<i64>()
        .map_err(|_e| FounderCallError::NonNumericToken { call: call.to_string(), token: token.to_string() })
}
