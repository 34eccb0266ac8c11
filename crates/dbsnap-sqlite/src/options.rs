//! Provider options.

use serde::{Deserialize, Serialize};

/// Tables the migration tool keeps for itself by default.
pub const DEFAULT_BOOKKEEPING_TABLES: &[&str] = &["DATABASECHANGELOG", "DATABASECHANGELOGLOCK"];

/// Options of a [`SqliteMetadata`](crate::SqliteMetadata) provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteProviderOptions {
    /// Bookkeeping table names, matched case-insensitively.
    pub bookkeeping_tables: Vec<String>,
    /// Label used in progress messages.
    pub label: String,
}

impl Default for SqliteProviderOptions {
    fn default() -> Self {
        Self {
            bookkeeping_tables: DEFAULT_BOOKKEEPING_TABLES
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            label: "sqlite".to_string(),
        }
    }
}

impl SqliteProviderOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bookkeeping table name.
    #[must_use]
    pub fn bookkeeping_table(mut self, name: impl Into<String>) -> Self {
        self.bookkeeping_tables.push(name.into());
        self
    }

    /// Sets the label used in progress messages.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
