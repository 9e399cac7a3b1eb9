//! `sigma-fit` library crate.
//!
//! Solves for the standard deviation of a Gaussian discretized over an integer
//! range so that a chosen share of its mass falls inside a sub-range.
//!
//! The binary (`sigma`) is a thin wrapper around this library so that:
//!
//! - the solver is testable without spawning processes
//! - the numeric core (`model`, `solve`) can be reused without the CLI

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod model;
pub mod plot;
pub mod preset;
pub mod report;
pub mod sample;
pub mod solve;
