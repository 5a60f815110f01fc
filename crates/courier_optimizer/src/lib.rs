pub mod error;
pub mod json;
pub mod parsers;
pub mod problem;
pub mod reporting;
pub mod solver;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
