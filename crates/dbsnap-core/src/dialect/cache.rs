//! InterSystems Caché default-value policy.
//!
//! Caché renders string defaults in double quotes and ObjectScript
//! expressions with a leading `$`. Both are rewritten to the portable
//! forms: a single-quoted SQL literal, and an `OBJECTSCRIPT '...'` marker.

use super::DialectPolicy;

/// InterSystems Caché default-value policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheDialect;

impl CacheDialect {
    /// Creates a new Caché dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl DialectPolicy for CacheDialect {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn is_auto_increment_default(&self, _raw_default: Option<&str>) -> bool {
        false
    }

    fn normalize_default_value(&self, raw_default: Option<&str>) -> Option<String> {
        let raw = raw_default?;
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Some(quote_literal(&raw[1..raw.len() - 1]));
        }
        if raw.starts_with('$') {
            return Some(format!("OBJECTSCRIPT {}", quote_literal(raw)));
        }
        Some(raw.to_string())
    }
}
