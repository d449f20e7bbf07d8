//! Procsim Core - Shared types
//!
//! This crate defines the pieces used by both the simulation engine and its CLI:
//! - SimConfig (experiment parameters, defaults and validation)
//! - Summary (mean / standard deviation over sojourn times)
//! - Error types

pub mod types;
pub mod stats;
pub mod error;

pub use types::*;
pub use stats::*;
pub use error::*;
