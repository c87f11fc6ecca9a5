
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_output_filename, check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct SummarizeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    mutpat_version: String,

    /// Input mutation table (TSV/CSV, optionally gzipped) with a header row
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-table")]
    #[clap(value_name = "TABLE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_table: PathBuf,

    /// Output summary file; ".csv" is comma-delimited, anything else is tab-delimited
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-summary")]
    #[clap(value_name = "FILE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_summary: PathBuf,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Optional label for each row of the summary output
    #[clap(long = "summary-label")]
    #[clap(value_name = "LABEL")]
    #[clap(help_heading = Some("Input/Output"))]
    #[clap(default_value = "summary")]
    pub summary_label: String,

    /// Column(s) that define a group; may be provided multiple times
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "group-by")]
    #[clap(value_name = "COLUMN")]
    #[clap(help_heading = Some("Grouping"))]
    pub group_columns: Vec<String>,

    /// Keeps rows with a missing group key under an "NA" key instead of dropping them
    #[clap(long = "keep-missing-keys")]
    #[clap(help_heading = Some("Grouping"))]
    pub keep_missing_keys: bool,

    /// Number of threads to use in the summary step
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

pub fn check_summarize_settings(mut settings: SummarizeSettings) -> anyhow::Result<SummarizeSettings> {
    // hard code the version in
    settings.mutpat_version = FULL_VERSION.clone();
    info!("Mutpat version: {:?}", &settings.mutpat_version);
    info!("Sub-command: summarize");
    info!("Inputs:");

    check_required_filename(&settings.input_table, "Input table")?;
    info!("\tInput table: {:?}", &settings.input_table);

    // outputs
    check_output_filename(&settings.output_summary, "Output summary")?;
    info!("Outputs:");
    info!("\tSummary label: {:?}", &settings.summary_label);
    info!("\tSummary file: {:?}", &settings.output_summary);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Grouping parameters:");
    ensure!(!settings.group_columns.is_empty(), "--group-by must be provided at least once");
    for (i, column) in settings.group_columns.iter().enumerate() {
        ensure!(
            !settings.group_columns[..i].contains(column),
            "--group-by column provided more than once: {column:?}"
        );
    }
    info!("\tGroup columns: {:?}", &settings.group_columns);
    info!("\tMissing keys: {}", if settings.keep_missing_keys { "KEPT" } else { "DROPPED" });

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> SummarizeSettings {
        SummarizeSettings {
            input_table: PathBuf::from("test_data/example_table/mutations.tsv"),
            output_summary: PathBuf::from("summary.tsv"),
            group_columns: vec!["segment".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_check_summarize_settings() {
        let settings = check_summarize_settings(base_settings()).unwrap();
        assert_eq!(settings.mutpat_version, *FULL_VERSION);
        // 0 threads is bumped to 1
        assert_eq!(settings.threads, 1);
    }

    #[test]
    fn test_bad_settings() {
        let mut settings = base_settings();
        settings.input_table = PathBuf::from("test_data/does_not_exist.tsv");
        assert!(check_summarize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.group_columns = vec![];
        assert!(check_summarize_settings(settings).is_err());

        let mut settings = base_settings();
        settings.group_columns = vec!["segment".to_string(), "family".to_string(), "segment".to_string()];
        assert!(check_summarize_settings(settings).is_err());
    }
}
