//! Per-product default-value policies.
//!
//! Databases disagree on how a column default is rendered by their
//! introspection surface. A [`DialectPolicy`] is picked once for the target
//! product and turns the raw text into the portable form used by the rest
//! of the snapshot.

mod cache;
mod h2;

pub use cache::CacheDialect;
pub use h2::H2Dialect;

/// Default-value interpretation for one database product.
pub trait DialectPolicy: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Whether `raw_default` marks an auto-increment column.
    fn is_auto_increment_default(&self, raw_default: Option<&str>) -> bool;

    /// Translates `raw_default` into portable form.
    fn normalize_default_value(&self, raw_default: Option<&str>) -> Option<String>;
}

/// Policy for products whose defaults are already portable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DialectPolicy for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn is_auto_increment_default(&self, _raw_default: Option<&str>) -> bool {
        false
    }

    fn normalize_default_value(&self, raw_default: Option<&str>) -> Option<String> {
        raw_default.map(str::to_string)
    }
}

/// Selects the policy for a database product name.
///
/// Matching is case-insensitive; unknown products get [`GenericDialect`].
#[must_use]
pub fn dialect_for_product(product: &str) -> Box<dyn DialectPolicy> {
    match product.trim().to_lowercase().as_str() {
        "h2" => Box::new(H2Dialect::new()),
        "cache" | "intersystems cache" | "caché" | "intersystems caché" => {
            Box::new(CacheDialect::new())
        }
        _ => Box::new(GenericDialect::new()),
    }
}
