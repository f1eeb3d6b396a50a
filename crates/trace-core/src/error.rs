//! Error types for Trace.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using Trace's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Trace operations.
///
/// The view derivations (sorting, grouping, filtering, location trees) are
/// total and never produce errors; this type covers the surfaces around them.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A background recomputation task is no longer running
    #[error("Deferred task closed: {0}")]
    TaskClosed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
