
/// Categorical encodings for the mutation direction and founder strain columns
pub mod categories;
/// Normalizes raw founder genotype calls into allele codes
pub mod founder_call;
/// A column-oriented partition of rows that share a key
pub mod group;
/// Contains every reducer result for a group and pooling across groups
pub mod group_summary;
