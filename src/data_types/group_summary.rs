
use std::ops::AddAssign;

use crate::aggregators::{chr13_count, expand_type_count, founder_chr13_pair_count, founder_count};
use crate::data_types::categories::{ExpandType, FounderStrain};
use crate::data_types::group::{Group, TableError};

/// Founder / chr13 pair counts, indexed as [founder][chr13] with B=0 and D=1
pub type PairCounts = [[u64; 2]; 2];

/// All of the reducer outputs for a single group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// Number of rows in the group
    pub num_rows: u64,
    /// Rows with expand_type == "expan"
    pub num_expan: u64,
    /// Rows with expand_type == "contr"
    pub num_contr: u64,
    /// Rows with fou_gt_chr13 == B / D
    pub chr13: [u64; 2],
    /// Rows with founder == B / D
    pub founder: [u64; 2],
    /// Rows matching each founder and fou_gt_chr13 pair
    pub founder_chr13: PairCounts
}

impl AddAssign for GroupSummary {
    // Enables += for pooling groups together
    fn add_assign(&mut self, rhs: Self) {
        self.num_rows += rhs.num_rows;
        self.num_expan += rhs.num_expan;
        self.num_contr += rhs.num_contr;
        for i in 0..2 {
            self.chr13[i] += rhs.chr13[i];
            self.founder[i] += rhs.founder[i];
            for j in 0..2 {
                self.founder_chr13[i][j] += rhs.founder_chr13[i][j];
            }
        }
    }
}

/// Maps a strain to its slot in the count arrays
fn strain_index(strain: FounderStrain) -> usize {
    match strain {
        FounderStrain::B => 0,
        FounderStrain::D => 1
    }
}

impl GroupSummary {
    /// Runs every reducer over the group.
    /// # Errors
    /// * if the group is missing any of the expand_type, founder, or fou_gt_chr13 columns
    pub fn from_group(group: &Group) -> Result<Self, TableError> {
        let mut summary = Self {
            num_rows: group.len() as u64,
            num_expan: expand_type_count(group, ExpandType::Expansion)?,
            num_contr: expand_type_count(group, ExpandType::Contraction)?,
            ..Default::default()
        };

        for strain in FounderStrain::ALL {
            let i = strain_index(strain);
            summary.chr13[i] = chr13_count(group, strain)?;
            summary.founder[i] = founder_count(group, strain)?;
            for chr13 in FounderStrain::ALL {
                summary.founder_chr13[i][strain_index(chr13)] = founder_chr13_pair_count(group, strain, chr13)?;
            }
        }
        Ok(summary)
    }

    pub fn chr13_count(&self, strain: FounderStrain) -> u64 {
        self.chr13[strain_index(strain)]
    }

    pub fn founder_count(&self, strain: FounderStrain) -> u64 {
        self.founder[strain_index(strain)]
    }

    pub fn pair_count(&self, founder: FounderStrain, chr13: FounderStrain) -> u64 {
        self.founder_chr13[strain_index(founder)][strain_index(chr13)]
    }

    /// Calculates the expansion fraction if there are any rows
    pub fn expansion_fraction(&self) -> Option<f64> {
        if self.num_rows > 0 {
            Some(self.num_expan as f64 / self.num_rows as f64)
        } else {
            None
        }
    }

    /// Calculates the contraction fraction if there are any rows
    pub fn contraction_fraction(&self) -> Option<f64> {
        if self.num_rows > 0 {
            Some(self.num_contr as f64 / self.num_rows as f64)
        } else {
            None
        }
    }
}
