//! Error types for snapshot construction.

use std::error::Error as StdError;

/// Boxed source error carried by [`ProviderError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure inside a [`MetadataProvider`](crate::provider::MetadataProvider).
///
/// Covers transport and query failures alike. Always fatal to the build.
#[derive(Debug, thiserror::Error)]
#[error("Metadata provider failed during {operation}: {source}")]
pub struct ProviderError {
    /// The provider operation that failed (e.g. `list_columns`).
    pub operation: &'static str,
    /// The underlying driver error.
    #[source]
    pub source: BoxError,
}

impl ProviderError {
    /// Wraps a driver error raised while running `operation`.
    #[must_use]
    pub fn new(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

/// Errors that abort a snapshot build.
///
/// No partial graph is ever returned alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The metadata provider failed.
    #[error(transparent)]
    Connectivity(#[from] ProviderError),

    /// A foreign key names a table that the table phase did not produce.
    #[error("Could not find table {table} for column {column}")]
    ReferentialIntegrity {
        /// The missing table.
        table: String,
        /// The key column that referenced it.
        column: String,
    },

    /// A key-sequence or ordinal position cannot be placed.
    #[error("Invalid column position {position} in {object}: {reason}")]
    InvalidColumnPosition {
        /// Primary key or index being assembled, as `table.name`.
        object: String,
        /// The offending 1-based position.
        position: i32,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;
