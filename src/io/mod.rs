//! Input/output helpers.
//!
//! - fit report JSON read/write (`export`)

pub mod export;

pub use export::*;
