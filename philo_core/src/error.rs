//! Error taxonomy for setting up a dinner.
//!
//! Only setup can fail. A philosopher starving or the meal goal being met
//! are normal outcomes reported through [`crate::Termination`].

use thiserror::Error;

/// Rejected command-line configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid number of arguments: expected 4 or 5, got {0}")]
    ArgumentCount(usize),

    #[error("Arguments must be positive integers ({name} = {value})")]
    NotPositive { name: &'static str, value: i64 },

    #[error("Optional argument must be a positive integer (got {0})")]
    GoalNotPositive(i64),

    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },
}

/// Errors that abort a dinner before any philosopher runs.
#[derive(Debug, Error)]
pub enum DinnerError {
    #[error("Resource initialization failed: {0}")]
    ResourceInit(String),
}
