
use indexmap::IndexMap;

/// Label used when a missing cell has to be rendered, e.g. in a group key
pub const MISSING_LABEL: &str = "NA";

/// A single column of cells; `None` is a missing cell
pub type Column = Vec<Option<String>>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("column {column:?} has {found} rows, expected {expected}")]
    ColumnLength { column: String, expected: usize, found: usize },
    #[error("column {column:?} is defined more than once")]
    DuplicateColumn { column: String },
    #[error("column {column:?} was not found")]
    MissingColumn { column: String },
    #[error("at least one grouping column is required")]
    NoGroupColumns
}

/// A read-only partition of rows sharing a grouping key, stored column-wise
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    /// The grouping key values, one per grouping column
    key: Vec<String>,
    /// Number of rows in the group, tracked separately so column-less groups still have a size
    num_rows: usize,
    /// Lookup from a column name to the cell values, in header order
    columns: IndexMap<String, Column>
}

impl Group {
    /// Constructor
    /// # Arguments
    /// * `key` - the grouping key values
    /// * `num_rows` - the number of rows; every column must have exactly this many cells
    /// * `columns` - the column data
    /// # Errors
    /// * if any column length does not match `num_rows`
    pub fn new(key: Vec<String>, num_rows: usize, columns: IndexMap<String, Column>) -> Result<Self, TableError> {
        for (name, cells) in columns.iter() {
            if cells.len() != num_rows {
                return Err(TableError::ColumnLength { column: name.clone(), expected: num_rows, found: cells.len() });
            }
        }
        Ok(Self {
            key, num_rows, columns
        })
    }

    /// Convenience constructor from borrowed strings; the row count comes from the first column.
    /// # Arguments
    /// * `key` - the grouping key values
    /// * `columns` - pairs of (column name, cell values)
    /// # Errors
    /// * if the columns have different lengths or a column is repeated
    pub fn from_columns(key: &[&str], columns: &[(&str, Vec<Option<&str>>)]) -> Result<Self, TableError> {
        let num_rows = columns.first().map(|(_name, cells)| cells.len()).unwrap_or(0);
        let mut lookup: IndexMap<String, Column> = IndexMap::with_capacity(columns.len());
        for (name, cells) in columns.iter() {
            let owned = cells.iter().map(|c| c.map(str::to_string)).collect();
            if lookup.insert(name.to_string(), owned).is_some() {
                return Err(TableError::DuplicateColumn { column: name.to_string() });
            }
        }
        Self::new(
            key.iter().map(|k| k.to_string()).collect(),
            num_rows, lookup
        )
    }

    /// Looks up a column by name
    /// # Errors
    /// * if the column is not part of this group
    pub fn column(&self, name: &str) -> Result<&[Option<String>], TableError> {
        self.columns.get(name)
            .map(|c| c.as_slice())
            .ok_or_else(|| TableError::MissingColumn { column: name.to_string() })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterates over the cells of a column as borrowed strings
    /// # Errors
    /// * if the column is not part of this group
    pub fn cells(&self, name: &str) -> Result<impl Iterator<Item = Option<&str>> + '_, TableError> {
        Ok(self.column(name)?.iter().map(|c| c.as_deref()))
    }

    /// Key values joined into a single label, e.g. "chr1|fam2".
    /// A `|` or `\` inside a key value is backslash-escaped so distinct keys never share a label.
    pub fn key_label(&self) -> String {
        self.key.iter()
            .map(|k| k.replace('\\', "\\\\").replace('|', "\\|"))
            .collect::<Vec<String>>()
            .join("|")
    }

    // getters
    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns() {
        let group = Group::from_columns(
            &["chr1", "fam2"],
            &[
                ("founder", vec![Some("B"), None, Some("D")]),
                ("expand_type", vec![Some("expan"), Some("contr"), None]),
            ]
        ).unwrap();
        assert_eq!(group.len(), 3);
        assert!(!group.is_empty());
        assert_eq!(group.key_label(), "chr1|fam2");
        assert_eq!(group.column_names().collect::<Vec<_>>(), vec!["founder", "expand_type"]);
        assert_eq!(group.column("founder").unwrap()[0].as_deref(), Some("B"));
        assert_eq!(group.cells("expand_type").unwrap().collect::<Vec<_>>(), vec![Some("expan"), Some("contr"), None]);
    }

    #[test]
    fn test_key_label_escaping() {
        fn label(key: &[&str]) -> String {
            Group::from_columns(key, &[]).unwrap().key_label()
        }
        assert_eq!(label(&["a|b", "c"]), "a\\|b|c");
        assert_eq!(label(&["a", "b|c"]), "a|b\\|c");
        assert_ne!(label(&["a|b", "c"]), label(&["a", "b|c"]));
        assert_eq!(label(&["a\\", "b"]), "a\\\\|b");
        assert_ne!(label(&["a\\", "b"]), label(&["a\\|b"]));
        assert_eq!(label(&["seg1"]), "seg1");
    }

    #[test]
    fn test_bad_columns() {
        let result = Group::from_columns(
            &["k"],
            &[
                ("founder", vec![Some("B"), Some("D")]),
                ("expand_type", vec![Some("expan")]),
            ]
        );
        assert_eq!(result, Err(TableError::ColumnLength { column: "expand_type".to_string(), expected: 2, found: 1 }));

        let result = Group::from_columns(
            &["k"],
            &[
                ("founder", vec![Some("B")]),
                ("founder", vec![Some("D")]),
            ]
        );
        assert_eq!(result, Err(TableError::DuplicateColumn { column: "founder".to_string() }));
    }

    #[test]
    fn test_missing_column() {
        let group = Group::default();
        assert!(group.is_empty());
        assert!(!group.has_column("founder"));
        assert_eq!(group.column("founder"), Err(TableError::MissingColumn { column: "founder".to_string() }));
    }
}
