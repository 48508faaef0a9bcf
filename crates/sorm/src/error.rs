//! Error types for sorm

use std::time::Duration;
use thiserror::Error;

/// Result type alias for sorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for entity persistence operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Statement execution failed inside the executor
    #[error("Query error: {0}")]
    Query(String),

    /// Error reported by the tokio-postgres driver
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (bad identifiers, misuse of the API)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The entity has no usable primary field
    #[error("Invalid primary: `{0}` has no integer primary field")]
    InvalidPrimary(&'static str),

    /// The operation requires an entity that has been persisted
    #[error("`{0}` has not been persisted")]
    NotPersisted(&'static str),

    /// Dirty tracking was requested before any load or save
    #[error("`{0}` has no snapshot; load or save it first")]
    MissingSnapshot(&'static str),

    /// The entity was deleted and can no longer be saved
    #[error("`{0}` was deleted")]
    Deleted(&'static str),

    /// Relation cascade went deeper than the configured bound
    #[error("Relation depth {depth} exceeded while saving `{entity}`")]
    DepthExceeded { entity: &'static str, depth: usize },

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a query error from any displayable driver error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if the error came from the database or the executor
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_) | Self::Postgres(_) | Self::Timeout(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
