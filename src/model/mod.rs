//! Discretized Gaussian model.
//!
//! Implemented as small, pure functions of a request and a sigma so the solver
//! can stay generic.

pub mod distribution;

pub use distribution::*;
