
use anyhow::bail;
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::normalize::NormalizeSettings;
use crate::cli::summarize::SummarizeSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.1.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.1.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2024-{}     The Mutpat developers.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// Mutpat, per-group summaries of founder calls and repeat mutation patterns.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Groups a mutation table and summarizes expansion and founder counts per group
    Summarize(Box<SummarizeSettings>),
    /// Normalizes a column of raw founder calls into allele codes
    Normalize(Box<NormalizeSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}

/// Checks that an output file can be created, i.e. its parent folder exists
/// # Arguments
/// * `filename` - the output file path
/// * `label` - the label to use for error messages
pub fn check_output_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    match filename.parent() {
        // a bare filename goes into the working directory
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            bail!("{} parent folder does not exist: \"{}\"", label, parent.display());
        },
        _ => Ok(())
    }
}
