/*!
# Writers module
Contains the logic for writing the summary output of the summarize command.
*/
/// Generates the per-group summary file
pub mod summary;
