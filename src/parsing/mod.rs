/*!
# Parsing module
Contains the logic for loading delimited tables and partitioning them into groups.
*/
/// Delimited table loader and the grouping stage
pub mod table;
