pub mod enumeration;
pub mod error;
pub mod json;
pub mod model;
pub mod optimize;
pub mod problem;
pub mod report;
pub mod solver;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
