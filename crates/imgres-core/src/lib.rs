pub mod config;
pub mod logging;

pub mod catalog;
pub mod chain;
pub mod driver;
pub mod emit;
pub mod extract;
pub mod filter;
pub mod pacing;
pub mod placeholder;
pub mod query;
pub mod result;
pub mod retry;
pub mod search;
pub mod used;
pub mod validate;
