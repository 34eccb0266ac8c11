//! H2 default-value policy.
//!
//! H2 fills `IDENTITY`/`AUTO_INCREMENT` columns from an internal system
//! sequence, and reports that as the column default.

use super::DialectPolicy;

/// Prefix of the default H2 renders for auto-increment columns.
const SYSTEM_SEQUENCE_PREFIX: &str = "(NEXT VALUE FOR PUBLIC.SYSTEM_SEQUENCE_";

/// H2 default-value policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl H2Dialect {
    /// Creates a new H2 dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn is_system_sequence(raw_default: Option<&str>) -> bool {
    raw_default.is_some_and(|raw| raw.trim().starts_with(SYSTEM_SEQUENCE_PREFIX))
}

impl DialectPolicy for H2Dialect {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn is_auto_increment_default(&self, raw_default: Option<&str>) -> bool {
        is_system_sequence(raw_default)
    }

    fn normalize_default_value(&self, raw_default: Option<&str>) -> Option<String> {
        // The auto-increment flag carries this default.
        if is_system_sequence(raw_default) {
            return None;
        }
        raw_default.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY_DEFAULT: &str =
        "(NEXT VALUE FOR PUBLIC.SYSTEM_SEQUENCE_5D2A5B8E_9C1F_4A6B_B2E1_0F6A3C2D1E7B)";

    #[test]
    fn detects_system_sequence() {
        let dialect = H2Dialect::new();
        assert!(dialect.is_auto_increment_default(Some(IDENTITY_DEFAULT)));
        assert_eq!(dialect.normalize_default_value(Some(IDENTITY_DEFAULT)), None);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let padded = format!("  {IDENTITY_DEFAULT}\n");
        assert!(H2Dialect::new().is_auto_increment_default(Some(&padded)));
    }

    #[test]
    fn user_sequences_are_plain_defaults() {
        let dialect = H2Dialect::new();
        let raw = "(NEXT VALUE FOR PUBLIC.ORDER_SEQ)";
        assert!(!dialect.is_auto_increment_default(Some(raw)));
        assert_eq!(dialect.normalize_default_value(Some(raw)), Some(raw.to_string()));
    }

    #[test]
    fn missing_default() {
        let dialect = H2Dialect::new();
        assert!(!dialect.is_auto_increment_default(None));
        assert_eq!(dialect.normalize_default_value(None), None);
    }
}
