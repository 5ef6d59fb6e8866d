/// Publication date parsing helpers.
pub mod date_helpers;
/// Country and year derivation from article file paths.
pub mod file_naming;
