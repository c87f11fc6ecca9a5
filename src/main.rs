
use indicatif::ParallelProgressIterator;
use log::{LevelFilter, debug, error, info, warn};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use mutpat::call_normalizer::normalize_call_column;
use mutpat::cli::core::{Commands, get_cli};
use mutpat::cli::normalize::{NormalizeSettings, check_normalize_settings};
use mutpat::cli::summarize::{SummarizeSettings, check_summarize_settings};
use mutpat::data_types::categories::{FounderStrain, CHR13_GT_COLUMN, EXPAND_TYPE_COLUMN, FOUNDER_COLUMN};
use mutpat::data_types::group_summary::GroupSummary;
use mutpat::parsing::table::{GroupingConfigBuilder, Table};
use mutpat::util::json_io::save_json;
use mutpat::util::progress_bar::get_progress_style;
use mutpat::writers::summary::SummaryWriter;

/// Sets up logging based on the verbosity count
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Sets up the global rayon thread pool, exits on failure
fn init_thread_pool(threads: usize) {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };
}

/// Creates the debug folder and saves the CLI options into it, exits on failure
fn save_debug_settings<T: serde::Serialize>(debug_folder: &Path, settings: &T) {
    info!("Creating debug folder at {debug_folder:?}...");
    match std::fs::create_dir_all(debug_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating debug folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    let cli_json = debug_folder.join("cli_settings.json");
    info!("Saving CLI options to {cli_json:?}...");
    if let Err(e) = save_json(settings, &cli_json) {
        error!("Error while saving CLI options: {e:#}");
        std::process::exit(exitcode::IOERR);
    }
}

/// Loads the input table, exits on failure
fn load_table(filename: &Path) -> Table {
    info!("Loading table from {filename:?}...");
    match Table::from_path(filename) {
        Ok(t) => {
            info!("Loaded {} rows.", t.num_rows());
            t
        },
        Err(e) => {
            error!("Error while loading input table: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }
}

fn run_summarize(settings: SummarizeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);

    let settings = match check_summarize_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    init_thread_pool(settings.threads);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        save_debug_settings(debug_folder, &settings);
    }

    let table = load_table(&settings.input_table);
    for column in [EXPAND_TYPE_COLUMN, FOUNDER_COLUMN, CHR13_GT_COLUMN] {
        match table.value_counts(column) {
            Ok(counts) => debug!("{column} values: {counts:?}"),
            Err(e) => {
                error!("Error while checking required columns: {e}");
                std::process::exit(exitcode::DATAERR);
            }
        }
    }

    // build our grouping configuration
    let grouping_config = match GroupingConfigBuilder::default()
        .group_columns(settings.group_columns.clone())
        .drop_missing_keys(!settings.keep_missing_keys)
        .build() {
        Ok(gc) => gc,
        Err(e) => {
            error!("Error while building grouping config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    info!("Grouping rows...");
    let groups = match table.group_by(&grouping_config) {
        Ok(g) => g,
        Err(e) => {
            error!("Error while grouping table: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    let grouped_rows: usize = groups.iter().map(|g| g.len()).sum();
    if grouped_rows < table.num_rows() {
        warn!("Dropped {} rows with a missing group key.", table.num_rows() - grouped_rows);
    }
    info!("Found {} groups.", groups.len());

    // run the parallel iterator to summarize them; groups are already sorted by key
    let style = get_progress_style("groups");
    info!("Summarizing groups...");
    let all_results: Vec<(String, Option<GroupSummary>)> = groups.into_par_iter()
        .map(|group| {
            let group_label = group.key_label();
            let summary = match GroupSummary::from_group(&group) {
                Ok(s) => Some(s),
                Err(e) => {
                    error!("Error while summarizing group {group_label:?}: {e}");
                    None
                }
            };
            debug!("Group {group_label:?} => {summary:?}");
            (group_label, summary)
        })
        .progress_with_style(style)
        .collect();

    let mut summary_writer = SummaryWriter::new(settings.summary_label.clone());
    for (group_label, opt_summary) in all_results.into_iter() {
        match opt_summary {
            Some(summary) => summary_writer.add_group_summary(group_label, summary),
            None => summary_writer.add_error_group()
        }
    }

    let joint = summary_writer.all_summary();
    info!("Joint rows: {}", joint.num_rows);
    info!("\tExpansions: {} ({:?})", joint.num_expan, joint.expansion_fraction());
    info!("\tContractions: {} ({:?})", joint.num_contr, joint.contraction_fraction());
    for strain in FounderStrain::ALL {
        info!("\tFounder {strain}: {}; chr13 {strain}: {}", joint.founder_count(strain), joint.chr13_count(strain));
    }
    info!("Solved:error groups: {} : {}", summary_writer.solved_groups(), summary_writer.error_groups());

    if summary_writer.error_groups() > 0 {
        error!("Some groups failed to summarize.");
        std::process::exit(exitcode::DATAERR);
    }

    // now write things
    info!("Saving output summary to {:?}...", settings.output_summary);
    if let Err(e) = summary_writer.write_summary(&settings.output_summary) {
        error!("Error while saving summary file: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Summary completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn run_normalize(settings: NormalizeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);

    let settings = match check_normalize_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    init_thread_pool(settings.threads);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        save_debug_settings(debug_folder, &settings);
    }

    let mut table = load_table(&settings.input_table);
    let raw_calls = match table.column(&settings.call_column) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while finding call column: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };

    info!("Normalizing founder calls...");
    let (allele_codes, stats) = match normalize_call_column(&raw_calls, settings.mode) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while normalizing founder calls: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    info!("Normalized:total calls: {} : {}", stats.normalized, stats.total);
    info!("\tMissing input: {}", stats.missing_input);
    info!("\tNo separator or heterozygous: {}", stats.unresolved);
    if stats.unparseable > 0 {
        warn!("\tUnparseable calls set to missing: {}", stats.unparseable);
    }

    if let Err(e) = table.push_column(settings.output_column.clone(), allele_codes) {
        error!("Error while adding allele code column: {e}");
        std::process::exit(exitcode::DATAERR);
    }

    info!("Saving output table to {:?}...", settings.output_table);
    if let Err(e) = table.write_path(&settings.output_table) {
        error!("Error while saving output table: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Normalization completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Summarize(settings) => {
            run_summarize(*settings);
        },
        Commands::Normalize(settings) => {
            run_normalize(*settings);
        }
    }

    info!("Process finished successfully.");
}
