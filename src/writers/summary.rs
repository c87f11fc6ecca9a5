
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use crate::data_types::categories::FounderStrain;
use crate::data_types::group_summary::GroupSummary;
use crate::util::file_io::{create_writer, table_delimiter};

/// Group label used for the pooled row at the end of the summary
pub const ALL_GROUPS_LABEL: &str = "ALL";

/// This is a wrapper for collecting per-group summaries and writing them to a file
#[derive(Default)]
pub struct SummaryWriter {
    /// Summary label to go on each row
    summary_label: String,
    /// The group key label and summary for each group, in insertion order
    group_summaries: Vec<(String, GroupSummary)>,
    /// Pooled summary over every added group
    all_summary: GroupSummary,
    /// Number of groups that failed to summarize
    error_groups: u64
}

/// Contains all the data written to each row of our summary file
#[derive(Debug, PartialEq, Serialize)]
struct SummaryRow {
    /// User provided label
    summary_label: String,
    /// The group key, or "ALL" for the pooled row
    group: String,
    /// Number of rows in the group
    num_rows: u64,
    /// Number of expansions
    num_expan: u64,
    /// Number of contractions
    num_contr: u64,
    /// Expansions / rows
    expan_perc: Option<f64>,
    /// Contractions / rows
    contr_perc: Option<f64>,
    /// fou_gt_chr13 == B
    num_b_chr13: u64,
    /// fou_gt_chr13 == D
    num_d_chr13: u64,
    /// founder == B
    num_b_founder: u64,
    /// founder == D
    num_d_founder: u64,
    /// founder == B and fou_gt_chr13 == B
    num_bb_founder_chr13: u64,
    /// founder == B and fou_gt_chr13 == D
    num_bd_founder_chr13: u64,
    /// founder == D and fou_gt_chr13 == B
    num_db_founder_chr13: u64,
    /// founder == D and fou_gt_chr13 == D
    num_dd_founder_chr13: u64
}

impl SummaryRow {
    /// Creates a new row from labels and a group summary
    fn new(summary_label: String, group: String, summary: &GroupSummary) -> Self {
        use FounderStrain::{B, D};
        Self {
            summary_label, group,
            num_rows: summary.num_rows,
            num_expan: summary.num_expan,
            num_contr: summary.num_contr,
            expan_perc: summary.expansion_fraction(),
            contr_perc: summary.contraction_fraction(),
            num_b_chr13: summary.chr13_count(B),
            num_d_chr13: summary.chr13_count(D),
            num_b_founder: summary.founder_count(B),
            num_d_founder: summary.founder_count(D),
            num_bb_founder_chr13: summary.pair_count(B, B),
            num_bd_founder_chr13: summary.pair_count(B, D),
            num_db_founder_chr13: summary.pair_count(D, B),
            num_dd_founder_chr13: summary.pair_count(D, D)
        }
    }
}

impl SummaryWriter {
    /// Creates a new writer to accumulate stats
    pub fn new(summary_label: String) -> Self {
        Self {
            summary_label,
            ..Default::default()
        }
    }

    /// Adds a single group to our collection
    /// # Arguments
    /// * `group_label` - the key label for the group
    /// * `summary` - the reducer results for the group
    pub fn add_group_summary(&mut self, group_label: String, summary: GroupSummary) {
        self.all_summary += summary;
        self.group_summaries.push((group_label, summary));
    }

    /// Tracks a group that could not be summarized
    pub fn add_error_group(&mut self) {
        self.error_groups += 1;
    }

    /// Builds every output row, with the pooled row last
    fn rows(&self) -> Vec<SummaryRow> {
        self.group_summaries.iter()
            .map(|(group_label, summary)| SummaryRow::new(self.summary_label.clone(), group_label.clone(), summary))
            .chain(std::iter::once(
                SummaryRow::new(self.summary_label.clone(), ALL_GROUPS_LABEL.to_string(), &self.all_summary)
            ))
            .collect()
    }

    /// Will write the summary out to the given file path
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv, optionally gzipped)
    /// # Errors
    /// * if the file cannot be created or written
    pub fn write_summary(&self, filename: &Path) -> anyhow::Result<()> {
        let writer = create_writer(filename)
            .with_context(|| format!("Error while creating {filename:?}:"))?;
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(table_delimiter(filename))
            .from_writer(writer);

        for row in self.rows() {
            csv_writer.serialize(&row)?;
        }

        // save everything
        csv_writer.flush()
            .with_context(|| format!("Error while flushing output to {filename:?}:"))?;
        Ok(())
    }

    // getters
    pub fn all_summary(&self) -> &GroupSummary {
        &self.all_summary
    }

    pub fn solved_groups(&self) -> usize {
        self.group_summaries.len()
    }

    pub fn error_groups(&self) -> u64 {
        self.error_groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parsing::table::Table;

    fn example_writer() -> SummaryWriter {
        let mut writer = SummaryWriter::new("test".to_string());
        writer.add_group_summary("seg1".to_string(), GroupSummary {
            num_rows: 4, num_expan: 2, num_contr: 1,
            chr13: [1, 3], founder: [3, 1],
            founder_chr13: [[1, 2], [0, 1]]
        });
        writer.add_group_summary("seg2".to_string(), GroupSummary::default());
        writer.add_error_group();
        writer
    }

    #[test]
    fn test_rows() {
        let writer = example_writer();
        assert_eq!(writer.solved_groups(), 2);
        assert_eq!(writer.error_groups(), 1);
        assert_eq!(writer.all_summary().num_rows, 4);

        let rows = writer.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], SummaryRow {
            summary_label: "test".to_string(),
            group: "seg1".to_string(),
            num_rows: 4,
            num_expan: 2,
            num_contr: 1,
            expan_perc: Some(0.5),
            contr_perc: Some(0.25),
            num_b_chr13: 1,
            num_d_chr13: 3,
            num_b_founder: 3,
            num_d_founder: 1,
            num_bb_founder_chr13: 1,
            num_bd_founder_chr13: 2,
            num_db_founder_chr13: 0,
            num_dd_founder_chr13: 1
        });

        // empty group has no defined fractions
        assert_eq!(rows[1].expan_perc, None);
        assert_eq!(rows[2].group, ALL_GROUPS_LABEL);
        assert_eq!(rows[2].num_bd_founder_chr13, 2);
    }

    #[test]
    fn test_write_summary() {
        let writer = example_writer();
        let out_fn = std::env::temp_dir().join(format!("mutpat_summary_test_{}.csv", std::process::id()));
        writer.write_summary(&out_fn).unwrap();

        // read it back with our own loader
        let table = Table::from_path(&out_fn).unwrap();
        std::fs::remove_file(&out_fn).unwrap();
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.headers().next(), Some("summary_label"));
        let groups: Vec<Option<&str>> = table.cells("group").unwrap().collect();
        assert_eq!(groups, vec![Some("seg1"), Some("seg2"), Some("ALL")]);
        assert_eq!(table.column("expan_perc").unwrap()[0].as_deref(), Some("0.5"));
        // None is an empty field, which loads as missing
        assert_eq!(table.column("expan_perc").unwrap()[1], None);
    }
}
