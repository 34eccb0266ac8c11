//! Snapshot configuration.

use serde::{Deserialize, Serialize};

/// Scope and labelling of one snapshot build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Catalog to read; `None` reads whatever the provider defaults to.
    pub catalog: Option<String>,
    /// Schema to read; `None` reads whatever the provider defaults to.
    pub schema: Option<String>,
    /// Overrides [`MetadataProvider::database_label`](crate::provider::MetadataProvider::database_label)
    /// in progress messages and logs.
    pub label: Option<String>,
}

impl SnapshotConfig {
    /// Creates an unrestricted configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the snapshot to `catalog`.
    #[must_use]
    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Restricts the snapshot to `schema`.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the label used in progress messages.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods() {
        let config = SnapshotConfig::new().schema("public").label("reporting");
        assert_eq!(config.catalog, None);
        assert_eq!(config.schema.as_deref(), Some("public"));
        assert_eq!(config.label.as_deref(), Some("reporting"));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: SnapshotConfig = serde_json::from_str(r#"{"schema": "app"}"#).unwrap();
        assert_eq!(config, SnapshotConfig::new().schema("app"));
    }
}
