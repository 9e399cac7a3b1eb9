//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated problem statement (`FitRequest`) and its errors
//! - solver output (`FitResult`) and knobs (`SolverConfig`)
//! - the named presets (`Preset`)

pub mod types;

pub use types::*;
