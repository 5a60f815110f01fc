pub mod distance_table;
pub mod package_table;
pub mod parser;
