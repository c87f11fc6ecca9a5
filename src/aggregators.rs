/*!
# Aggregators
Stateless reducers that fold a single [`Group`] into one scalar.
Every named reducer is a thin wrapper over [`count_matching`], and missing or unexpected categorical values never match.

# Example usage
```rust
use mutpat::aggregators::{expansion_fraction, num_bd_founder_chr13, num_expan};
use mutpat::data_types::group::Group;

let group = Group::from_columns(
    &["chr1"],
    &[
        ("expand_type", vec![Some("expan"), Some("expan"), Some("contr"), Some("other")]),
        ("founder", vec![Some("B"), Some("D"), Some("B"), Some("B")]),
        ("fou_gt_chr13", vec![Some("D"), Some("D"), Some("B"), Some("D")]),
    ]
).unwrap();
assert_eq!(num_expan(&group).unwrap(), 2);
assert_eq!(expansion_fraction(&group).unwrap(), Some(0.5));
assert_eq!(num_bd_founder_chr13(&group).unwrap(), 2);
```
*/
use crate::data_types::categories::{ExpandType, FounderStrain, CHR13_GT_COLUMN, EXPAND_TYPE_COLUMN, FOUNDER_COLUMN};
use crate::data_types::group::{Group, TableError};

/// Counts the rows in a group whose `column` cell satisfies `predicate`.
/// # Arguments
/// * `group` - the group to scan
/// * `column` - the column to look up
/// * `predicate` - receives each cell, `None` for missing cells
/// # Errors
/// * if the column is not part of the group
pub fn count_matching<F>(group: &Group, column: &str, predicate: F) -> Result<u64, TableError>
where
    F: Fn(Option<&str>) -> bool
{
    Ok(group.cells(column)?
        .filter(|&cell| predicate(cell))
        .count() as u64)
}

/// Counts the rows in a group where `column` is exactly `value`.
/// # Errors
/// * if the column is not part of the group
pub fn count_equal(group: &Group, column: &str, value: &str) -> Result<u64, TableError> {
    count_matching(group, column, |cell| cell == Some(value))
}

/// Counts the rows in a group where both column/value pairs match exactly.
/// # Arguments
/// * `group` - the group to scan
/// * `first` - the first (column, value) pair
/// * `second` - the second (column, value) pair
/// # Errors
/// * if either column is not part of the group
pub fn count_paired(group: &Group, first: (&str, &str), second: (&str, &str)) -> Result<u64, TableError> {
    let (column_a, value_a) = first;
    let (column_b, value_b) = second;
    let count = group.cells(column_a)?
        .zip(group.cells(column_b)?)
        .filter(|&(a, b)| a == Some(value_a) && b == Some(value_b))
        .count();
    Ok(count as u64)
}

/// Number of rows with the given mutation direction
pub fn expand_type_count(group: &Group, expand_type: ExpandType) -> Result<u64, TableError> {
    count_equal(group, EXPAND_TYPE_COLUMN, expand_type.as_ref())
}

/// Number of rows with the given chromosome 13 founder genotype
pub fn chr13_count(group: &Group, strain: FounderStrain) -> Result<u64, TableError> {
    count_equal(group, CHR13_GT_COLUMN, strain.as_ref())
}

/// Number of rows with the given founder strain
pub fn founder_count(group: &Group, strain: FounderStrain) -> Result<u64, TableError> {
    count_equal(group, FOUNDER_COLUMN, strain.as_ref())
}

/// Number of rows where the founder is `founder` and the chromosome 13 genotype is `chr13`
pub fn founder_chr13_pair_count(group: &Group, founder: FounderStrain, chr13: FounderStrain) -> Result<u64, TableError> {
    count_paired(
        group,
        (FOUNDER_COLUMN, founder.as_ref()),
        (CHR13_GT_COLUMN, chr13.as_ref())
    )
}

pub fn num_expan(group: &Group) -> Result<u64, TableError> {
    expand_type_count(group, ExpandType::Expansion)
}

pub fn num_contr(group: &Group) -> Result<u64, TableError> {
    expand_type_count(group, ExpandType::Contraction)
}

pub fn num_b_chr13(group: &Group) -> Result<u64, TableError> {
    chr13_count(group, FounderStrain::B)
}

pub fn num_d_chr13(group: &Group) -> Result<u64, TableError> {
    chr13_count(group, FounderStrain::D)
}

pub fn num_b_founder(group: &Group) -> Result<u64, TableError> {
    founder_count(group, FounderStrain::B)
}

pub fn num_d_founder(group: &Group) -> Result<u64, TableError> {
    founder_count(group, FounderStrain::D)
}

// pair names are founder value first, then the chr13 value

pub fn num_bb_founder_chr13(group: &Group) -> Result<u64, TableError> {
    founder_chr13_pair_count(group, FounderStrain::B, FounderStrain::B)
}

pub fn num_bd_founder_chr13(group: &Group) -> Result<u64, TableError> {
    founder_chr13_pair_count(group, FounderStrain::B, FounderStrain::D)
}

pub fn num_db_founder_chr13(group: &Group) -> Result<u64, TableError> {
    founder_chr13_pair_count(group, FounderStrain::D, FounderStrain::B)
}

pub fn num_dd_founder_chr13(group: &Group) -> Result<u64, TableError> {
    founder_chr13_pair_count(group, FounderStrain::D, FounderStrain::D)
}

/// Fraction of rows in the group that are expansions.
/// Returns `None` for an empty group, where the fraction is undefined.
/// # Errors
/// * if the group has no `expand_type` column
pub fn expansion_fraction(group: &Group) -> Result<Option<f64>, TableError> {
    let expansions = num_expan(group)?;
    if group.is_empty() {
        Ok(None)
    } else {
        Ok(Some(expansions as f64 / group.len() as f64))
    }
}
