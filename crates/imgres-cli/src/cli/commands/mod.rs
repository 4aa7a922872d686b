//! CLI command handlers, one per file.

mod catalog;
mod queries;
mod run;

pub use catalog::run_catalog;
pub use queries::run_queries;
pub use run::run_resolution;
