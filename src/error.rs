//! Error types for accessor calls

use thiserror::Error;

use crate::schema::ValidationError;
use crate::store::StoreError;

/// Result type alias for accessor and registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of queries and mutations
#[derive(Error, Debug)]
pub enum Error {
    /// Arguments did not match the declared shape; the handler never ran
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Failure reported by the document store, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{path} is a {actual}, not a {expected}")]
    WrongFunctionKind {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A uniqueness rule of a collection was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
