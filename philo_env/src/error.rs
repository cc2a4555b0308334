//! Error types for the dining table environment.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Writing a status line failed (closed pipe, full disk, ...)
    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),
}
