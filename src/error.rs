//! Error types
//!
//! Hub operations never fail; only the server surface (binding, serving)
//! and frame encoding return these.

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket bind or serve failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An activity message could not be serialized
    #[error("failed to encode activity message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
