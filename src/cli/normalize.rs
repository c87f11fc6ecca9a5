
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_output_filename, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::founder_call::CallParseMode;

/// Suffix added to the call column name when no output column is given
pub const DEFAULT_ALLELE_SUFFIX: &str = "_allele";

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct NormalizeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    mutpat_version: String,

    /// Input table (TSV/CSV, optionally gzipped) with a header row
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-table")]
    #[clap(value_name = "TABLE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output table with the appended allele code column
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-table")]
    #[clap(value_name = "TABLE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_table: PathBuf,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Column containing the raw founder calls, e.g. "3,3" or "3/3"
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "call-column")]
    #[clap(value_name = "COLUMN")]
    #[clap(help_heading = Some("Normalization"))]
    pub call_column: String,

    /// Name of the appended allele code column [default: <call-column>_allele]
    #[clap(long = "output-column")]
    #[clap(value_name = "COLUMN")]
    #[clap(help_heading = Some("Normalization"))]
    #[clap(default_value = "", hide_default_value = true)]
    pub output_column: String,

    /// Handling of calls with non-numeric tokens
    #[clap(long = "mode")]
    #[clap(value_name = "MODE")]
    #[clap(help_heading = Some("Normalization"))]
    #[clap(default_value = "lenient")]
    pub mode: CallParseMode,

    /// Number of threads to use in the normalization step
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_normalize_settings(mut settings: NormalizeSettings) -> anyhow::Result<NormalizeSettings> {
    // hard code the version in
    settings.mutpat_version = FULL_VERSION.clone();
    info!("Mutpat version: {:?}", &settings.mutpat_version);
    info!("Sub-command: normalize");
    info!("Inputs:");

    check_required_filename(&settings.input_table, "Input table")?;
    info!("\tInput table: {:?}", &settings.input_table);

    // outputs
    check_output_filename(&settings.output_table, "Output table")?;
    ensure!(settings.output_table != settings.input_table, "--output-table must be different from --input-table");
    info!("Outputs:");
    info!("\tOutput table: {:?}", &settings.output_table);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Normalization parameters:");
    ensure!(!settings.call_column.is_empty(), "--call-column must not be empty");
    if settings.output_column.is_empty() {
        settings.output_column = format!("{}{DEFAULT_ALLELE_SUFFIX}", settings.call_column);
    }
    info!("\tCall column: {:?}", &settings.call_column);
    info!("\tOutput column: {:?}", &settings.output_column);
    info!("\tParse mode: {}", settings.mode);

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> NormalizeSettings {
        NormalizeSettings {
            input_table: PathBuf::from("test_data/example_table/mutations.tsv"),
            output_table: PathBuf::from("normalized.tsv"),
            call_column: "founder_call".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_output_column() {
        let settings = check_normalize_settings(base_settings()).unwrap();
        assert_eq!(settings.output_column, "founder_call_allele");
        assert_eq!(settings.mode, CallParseMode::Lenient);
        assert_eq!(settings.threads, 1);

        let mut settings = base_settings();
        settings.output_column = "fou_allele".to_string();
        settings.mode = CallParseMode::Strict;
        let settings = check_normalize_settings(settings).unwrap();
        assert_eq!(settings.output_column, "fou_allele");
        assert_eq!(settings.mode, CallParseMode::Strict);
    }

    #[test]
    fn test_bad_settings() {
        let mut settings = base_settings();
        settings.output_table = settings.input_table.clone();
        assert!(check_normalize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.call_column = String::new();
        assert!(check_normalize_settings(settings).is_err());
    }
}
