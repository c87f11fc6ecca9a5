
/// Reducers that summarize a group into a count or ratio
pub mod aggregators;
/// Applies founder call normalization to a full table column
pub mod call_normalizer;
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
