
use anyhow::Context;
use derive_builder::Builder;
use indexmap::IndexMap;
use log::debug;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::data_types::group::{Column, Group, TableError, MISSING_LABEL};
use crate::util::file_io::{create_writer, open_reader, table_delimiter};

/// Cell values that are treated as missing when loading a table
pub const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "None"];

/// Controls how a table is partitioned into groups
#[derive(Builder, Clone, Debug)]
#[builder(default)]
pub struct GroupingConfig {
    /// The columns that together form the group key
    group_columns: Vec<String>,
    /// if true, rows with a missing key value are dropped; otherwise the key component is labeled "NA"
    drop_missing_keys: bool
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            group_columns: vec![],
            drop_missing_keys: true
        }
    }
}

impl GroupingConfig {
    // mostly getters
    pub fn group_columns(&self) -> &[String] {
        &self.group_columns
    }

    pub fn drop_missing_keys(&self) -> bool {
        self.drop_missing_keys
    }
}

/// A column-oriented table with a header, loaded from a delimited file.
/// Fields are kept exactly as read so untouched columns are written back unchanged;
/// the missing tokens are only mapped to `None` when cells are read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Number of data rows
    num_rows: usize,
    /// Raw field text in header order
    columns: IndexMap<String, Vec<String>>
}

/// Maps a raw field to a cell, the missing tokens become `None`
pub fn as_cell(field: &str) -> Option<&str> {
    if MISSING_TOKENS.contains(&field) {
        None
    } else {
        Some(field)
    }
}

impl Table {
    /// Constructor
    /// # Arguments
    /// * `num_rows` - the number of rows; every column must have exactly this many fields
    /// * `columns` - the raw field text for each column
    /// # Errors
    /// * if any column length does not match `num_rows`
    pub fn new(num_rows: usize, columns: IndexMap<String, Vec<String>>) -> Result<Self, TableError> {
        for (name, fields) in columns.iter() {
            if fields.len() != num_rows {
                return Err(TableError::ColumnLength { column: name.clone(), expected: num_rows, found: fields.len() });
            }
        }
        Ok(Self {
            num_rows, columns
        })
    }

    /// Loads a table from a file with a header row.
    /// ".csv" files are comma-delimited, everything else is tab-delimited; ".gz" files are decompressed.
    /// # Arguments
    /// * `filename` - the table to load
    /// # Errors
    /// * if the file does not open or parse
    /// * if the header has duplicate column names or a row has the wrong number of fields
    pub fn from_path(filename: &Path) -> anyhow::Result<Self> {
        let reader = open_reader(filename)
            .with_context(|| format!("Error while opening {filename:?}:"))?;
        Self::from_reader(reader, table_delimiter(filename))
            .with_context(|| format!("Error while loading {filename:?}:"))
    }

    /// Loads a table from any reader.
    /// # Arguments
    /// * `reader` - the source of the delimited text, must start with a header row
    /// * `delimiter` - the field delimiter
    /// # Errors
    /// * if the text does not parse
    /// * if the header has duplicate column names or a row has the wrong number of fields
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()
            .context("Error while reading header:")?
            .iter().map(|h| h.to_string())
            .collect();

        let mut columns: IndexMap<String, Vec<String>> = IndexMap::with_capacity(headers.len());
        for header in headers.iter() {
            if columns.insert(header.clone(), vec![]).is_some() {
                return Err(TableError::DuplicateColumn { column: header.clone() }.into());
            }
        }

        let mut num_rows = 0;
        for result in csv_reader.records() {
            // the reader is not flexible, so every record has the header length
            let row = result.with_context(|| format!("Error while reading row #{}:", num_rows + 1))?;
            for (fields, field) in columns.values_mut().zip(row.iter()) {
                fields.push(field.to_string());
            }
            num_rows += 1;
        }

        debug!("Loaded table with {} columns and {num_rows} rows", columns.len());
        Ok(Self::new(num_rows, columns)?)
    }

    /// Looks up the raw field text of a column
    /// # Errors
    /// * if the column is not in the table
    pub fn raw_column(&self, name: &str) -> Result<&[String], TableError> {
        self.columns.get(name)
            .map(|c| c.as_slice())
            .ok_or_else(|| TableError::MissingColumn { column: name.to_string() })
    }

    /// Iterates over the cells of a column, with missing tokens as `None`
    /// # Errors
    /// * if the column is not in the table
    pub fn cells(&self, name: &str) -> Result<impl Iterator<Item = Option<&str>> + '_, TableError> {
        Ok(self.raw_column(name)?.iter().map(|f| as_cell(f)))
    }

    /// Copies out a column as cells, with missing tokens as `None`
    /// # Errors
    /// * if the column is not in the table
    pub fn column(&self, name: &str) -> Result<Column, TableError> {
        Ok(self.cells(name)?.map(|c| c.map(str::to_string)).collect())
    }

    /// Appends a new column to the end of the table; missing cells are stored as "NA"
    /// # Errors
    /// * if the column name is already in use
    /// * if the number of cells does not match the table
    pub fn push_column(&mut self, name: String, cells: Column) -> Result<(), TableError> {
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn { column: name });
        }
        if cells.len() != self.num_rows {
            return Err(TableError::ColumnLength { column: name, expected: self.num_rows, found: cells.len() });
        }
        let fields = cells.into_iter()
            .map(|c| c.unwrap_or_else(|| MISSING_LABEL.to_string()))
            .collect();
        self.columns.insert(name, fields);
        Ok(())
    }

    /// Partitions the rows into groups that share the same key, sorted by key.
    /// Every group carries all of the table columns, with rows in their original order.
    /// # Arguments
    /// * `config` - the grouping columns and missing key handling
    /// # Errors
    /// * if no grouping columns are provided
    /// * if a grouping column is not in the table
    pub fn group_by(&self, config: &GroupingConfig) -> Result<Vec<Group>, TableError> {
        if config.group_columns().is_empty() {
            return Err(TableError::NoGroupColumns);
        }
        let key_columns: Vec<&[String]> = config.group_columns().iter()
            .map(|name| self.raw_column(name))
            .collect::<Result<_, _>>()?;

        // collect the row indices for each key
        let mut row_lookup: BTreeMap<Vec<String>, Vec<usize>> = Default::default();
        let mut dropped_rows = 0;
        'rows: for row_index in 0..self.num_rows {
            let mut key = Vec::with_capacity(key_columns.len());
            for column in key_columns.iter() {
                match as_cell(&column[row_index]) {
                    Some(value) => key.push(value.to_string()),
                    None if config.drop_missing_keys() => {
                        dropped_rows += 1;
                        continue 'rows;
                    },
                    None => key.push(MISSING_LABEL.to_string())
                }
            }
            row_lookup.entry(key).or_default().push(row_index);
        }
        if dropped_rows > 0 {
            debug!("Dropped {dropped_rows} rows with a missing group key");
        }

        row_lookup.into_iter()
            .map(|(key, row_indices)| {
                let columns: IndexMap<String, Column> = self.columns.iter()
                    .map(|(name, fields)| {
                        let subset = row_indices.iter()
                            .map(|&i| as_cell(&fields[i]).map(str::to_string))
                            .collect();
                        (name.clone(), subset)
                    })
                    .collect();
                Group::new(key, row_indices.len(), columns)
            })
            .collect()
    }

    /// Counts how often each distinct value appears in a column; missing cells are counted under "NA"
    /// # Errors
    /// * if the column is not in the table
    pub fn value_counts(&self, name: &str) -> Result<FxHashMap<String, usize>, TableError> {
        let mut counts: FxHashMap<String, usize> = Default::default();
        for cell in self.cells(name)? {
            let label = cell.unwrap_or(MISSING_LABEL);
            *counts.entry(label.to_string()).or_default() += 1;
        }
        Ok(counts)
    }

    /// Writes the table back out with every field as it was loaded or pushed.
    /// Delimiter and compression follow the same extension rules as loading.
    /// # Errors
    /// * if the file cannot be created or written
    pub fn write_path(&self, filename: &Path) -> anyhow::Result<()> {
        let writer = create_writer(filename)
            .with_context(|| format!("Error while creating {filename:?}:"))?;
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(table_delimiter(filename))
            .from_writer(writer);

        csv_writer.write_record(self.columns.keys())?;
        for row_index in 0..self.num_rows {
            let record = self.columns.values()
                .map(|fields| fields[row_index].as_str());
            csv_writer.write_record(record)?;
        }

        csv_writer.flush()
            .with_context(|| format!("Error while flushing output to {filename:?}:"))?;
        Ok(())
    }

    // getters
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::aggregators::{num_b_founder, num_expan};
    use crate::call_normalizer::normalize_call_column;
    use crate::data_types::founder_call::CallParseMode;

    const SMALL_TABLE: &str = "chrom\tfamily\texpand_type\tfounder\n\
        chr2\tf1\texpan\tB\n\
        chr1\tf1\tcontr\tD\n\
        chr2\tNA\texpan\t\n\
        chr1\tf2\texpan\tB\n\
        chr2\tf1\tNaN\tD\n";

    fn small_table() -> Table {
        Table::from_reader(SMALL_TABLE.as_bytes(), b'\t').unwrap()
    }

    #[test]
    fn test_from_reader() {
        let table = small_table();
        assert_eq!(table.num_rows(), 5);
        assert_eq!(table.headers().collect::<Vec<_>>(), vec!["chrom", "family", "expand_type", "founder"]);
        assert_eq!(table.column("family").unwrap()[2], None);
        assert_eq!(table.column("founder").unwrap()[2], None);
        assert_eq!(table.column("expand_type").unwrap()[4], None);
        assert_eq!(table.column("expand_type").unwrap()[0].as_deref(), Some("expan"));
        assert!(table.column("fou_gt_chr13").is_err());
    }

    #[test]
    fn test_raw_fields_kept() {
        let table = Table::from_reader("a\tb\tcall\nNone\t\t3,3\nnull\tx\tN/A\n".as_bytes(), b'\t').unwrap();
        assert_eq!(table.raw_column("a").unwrap(), &["None".to_string(), "null".to_string()]);
        assert_eq!(table.raw_column("b").unwrap(), &["".to_string(), "x".to_string()]);
        assert_eq!(table.cells("a").unwrap().collect::<Vec<_>>(), vec![None, None]);
        assert_eq!(table.column("call").unwrap(), vec![Some("3,3".to_string()), None]);
        assert!(table.raw_column("missing").is_err());
    }

    #[test]
    fn test_bad_tables() {
        // duplicate header
        assert!(Table::from_reader("a,a\n1,2\n".as_bytes(), b',').is_err());
        // ragged row
        assert!(Table::from_reader("a,b\n1,2\n3\n".as_bytes(), b',').is_err());
        // header only is fine
        let table = Table::from_reader("a,b\n".as_bytes(), b',').unwrap();
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_group_by_single() {
        let table = small_table();
        let config = GroupingConfigBuilder::default()
            .group_columns(vec!["chrom".to_string()])
            .build().unwrap();
        let groups = table.group_by(&config).unwrap();
        assert_eq!(groups.len(), 2);

        // sorted by key
        assert_eq!(groups[0].key(), &["chr1".to_string()]);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(num_expan(&groups[0]).unwrap(), 1);
        assert_eq!(groups[1].key(), &["chr2".to_string()]);
        assert_eq!(groups[1].len(), 3);
        assert_eq!(num_expan(&groups[1]).unwrap(), 2);
        assert_eq!(num_b_founder(&groups[1]).unwrap(), 1);

        // original row order is kept inside the group
        assert_eq!(groups[0].column("family").unwrap()[0].as_deref(), Some("f1"));
        assert_eq!(groups[0].column("family").unwrap()[1].as_deref(), Some("f2"));
    }

    #[test]
    fn test_group_by_missing_keys() {
        let table = small_table();
        let columns = vec!["chrom".to_string(), "family".to_string()];

        // default drops the row with a missing family
        let config = GroupingConfigBuilder::default()
            .group_columns(columns.clone())
            .build().unwrap();
        let groups = table.group_by(&config).unwrap();
        let labels: Vec<String> = groups.iter().map(|g| g.key_label()).collect();
        assert_eq!(labels, vec!["chr1|f1", "chr1|f2", "chr2|f1"]);
        assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), 4);

        // keep them instead
        let config = GroupingConfigBuilder::default()
            .group_columns(columns)
            .drop_missing_keys(false)
            .build().unwrap();
        let groups = table.group_by(&config).unwrap();
        let labels: Vec<String> = groups.iter().map(|g| g.key_label()).collect();
        assert_eq!(labels, vec!["chr1|f1", "chr1|f2", "chr2|NA", "chr2|f1"]);
    }

    #[test]
    fn test_group_by_pipe_keys() {
        let table = Table::from_reader("k1\tk2\na|b\tc\na\tb|c\n".as_bytes(), b'\t').unwrap();
        let config = GroupingConfigBuilder::default()
            .group_columns(vec!["k1".to_string(), "k2".to_string()])
            .build().unwrap();
        let labels: Vec<String> = table.group_by(&config).unwrap().iter().map(|g| g.key_label()).collect();
        assert_eq!(labels, vec!["a|b\\|c", "a\\|b|c"]);
    }

    #[test]
    fn test_group_by_errors() {
        let table = small_table();
        assert_eq!(table.group_by(&GroupingConfig::default()), Err(TableError::NoGroupColumns));

        let config = GroupingConfigBuilder::default()
            .group_columns(vec!["segment".to_string()])
            .build().unwrap();
        assert_eq!(table.group_by(&config), Err(TableError::MissingColumn { column: "segment".to_string() }));
    }

    #[test]
    fn test_push_column() {
        let mut table = small_table();
        let cells: Column = (0..5).map(|i| Some(i.to_string())).collect();
        table.push_column("index".to_string(), cells.clone()).unwrap();
        assert_eq!(table.headers().last(), Some("index"));
        assert_eq!(table.column("index").unwrap()[3].as_deref(), Some("3"));

        assert!(table.push_column("index".to_string(), cells).is_err());
        assert!(table.push_column("short".to_string(), vec![None]).is_err());
    }

    #[test]
    fn test_value_counts() {
        let table = small_table();
        let counts = table.value_counts("founder").unwrap();
        assert_eq!(counts.get("B"), Some(&2));
        assert_eq!(counts.get("D"), Some(&2));
        assert_eq!(counts.get(MISSING_LABEL), Some(&1));
    }

    #[test]
    fn test_example_table() {
        let table_fn = PathBuf::from("test_data/example_table/mutations.tsv");
        let table = Table::from_path(&table_fn).unwrap();
        assert_eq!(table.num_rows(), 10);

        let config = GroupingConfigBuilder::default()
            .group_columns(vec!["segment".to_string()])
            .build().unwrap();
        let groups = table.group_by(&config).unwrap();
        let labels: Vec<String> = groups.iter().map(|g| g.key_label()).collect();
        assert_eq!(labels, vec!["seg1", "seg2", "seg3"]);
        assert_eq!(groups.iter().map(|g| g.len()).collect::<Vec<_>>(), vec![4, 4, 2]);
    }

    /// Loads, appends a normalized column, writes to `out_fn`, and returns the loaded input
    fn normalize_and_write(text: &str, delimiter: u8, out_fn: &Path) -> Table {
        let mut table = Table::from_reader(text.as_bytes(), delimiter).unwrap();
        let original = table.clone();
        let raw_calls = table.column("call").unwrap();
        let (allele_codes, _stats) = normalize_call_column(&raw_calls, CallParseMode::Lenient).unwrap();
        table.push_column("call_allele".to_string(), allele_codes).unwrap();
        table.write_path(out_fn).unwrap();
        original
    }

    #[test]
    fn test_write_path_tsv() {
        let text = "a\tb\tcall\nNone\t\t3,3\nnull\tx\tN/A\nfree text\tnan\t4/5\n";
        let out_fn = std::env::temp_dir().join(format!("mutpat_table_test_{}.tsv", std::process::id()));
        normalize_and_write(text, b'\t', &out_fn);

        // untouched columns come back byte-for-byte, only the appended column uses "NA"
        let written = std::fs::read_to_string(&out_fn).unwrap();
        std::fs::remove_file(&out_fn).unwrap();
        assert_eq!(written, "a\tb\tcall\tcall_allele\nNone\t\t3,3\t3\nnull\tx\tN/A\tNA\nfree text\tnan\t4/5\tNA\n");
    }

    #[test]
    fn test_write_path_csv_gz() {
        let text = "family,call,note\nf1,\"3,3\",None\nf2,3/4,\nf3,-2/-2,NaN\n";
        let out_fn = std::env::temp_dir().join(format!("mutpat_table_test_{}.csv.gz", std::process::id()));
        let original = normalize_and_write(text, b',', &out_fn);

        let reloaded = Table::from_path(&out_fn).unwrap();
        std::fs::remove_file(&out_fn).unwrap();
        assert_eq!(reloaded.num_rows(), 3);
        assert_eq!(reloaded.headers().collect::<Vec<_>>(), vec!["family", "call", "note", "call_allele"]);
        assert_eq!(reloaded.raw_column("call_allele").unwrap(), &["3".to_string(), "NA".to_string(), "-2".to_string()]);
        for name in original.headers() {
            assert_eq!(reloaded.raw_column(name).unwrap(), original.raw_column(name).unwrap());
        }
    }
}
