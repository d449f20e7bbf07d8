//! Error types for Procsim

use thiserror::Error;

/// Result type for procsim operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Core error type for procsim operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration value was rejected before the simulation started
    #[error("Invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
