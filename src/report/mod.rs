//! Reporting utilities: formatted terminal output for requests, results,
//! preset tables, and sampling summaries.

pub mod format;

pub use format::*;
