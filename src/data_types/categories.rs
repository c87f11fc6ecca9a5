
use strum_macros::{AsRefStr, Display, EnumString};

/// Column holding the mutation direction
pub const EXPAND_TYPE_COLUMN: &str = "expand_type";
/// Column holding the founder genotype restricted to chromosome 13
pub const CHR13_GT_COLUMN: &str = "fou_gt_chr13";
/// Column holding the founder strain
pub const FOUNDER_COLUMN: &str = "founder";

/// Direction of a tandem repeat mutation event
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, AsRefStr, Display, EnumString)]
pub enum ExpandType {
    /// Allele length increased relative to the founder
    #[strum(serialize = "expan")]
    Expansion,
    /// Allele length decreased relative to the founder
    #[strum(serialize = "contr")]
    Contraction
}

/// The two founder strains we track; anything else is ignored by the counters
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, AsRefStr, Display, EnumString)]
pub enum FounderStrain {
    #[strum(serialize = "B")]
    B,
    #[strum(serialize = "D")]
    D
}

impl FounderStrain {
    /// Both strains, in output order
    pub const ALL: [FounderStrain; 2] = [FounderStrain::B, FounderStrain::D];
}
