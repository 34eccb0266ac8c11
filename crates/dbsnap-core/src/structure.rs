//! Schema entity types held by a [`DatabaseSnapshot`](crate::DatabaseSnapshot).
//!
//! Entities are plain owned values. Cross references are by name, so a
//! finished snapshot has no interior pointers and can be shared freely
//! between threads.

use serde::{Deserialize, Serialize};

/// Tri-state column nullability as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nullability {
    /// `NOT NULL`.
    NotNull,
    /// Accepts `NULL`.
    Nullable,
    /// The provider could not tell.
    Unknown,
}

impl Nullability {
    /// Decodes a JDBC-style `NULLABLE` code (0 = no nulls, 1 = nullable).
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::NotNull,
            1 => Self::Nullable,
            _ => Self::Unknown,
        }
    }

    /// Returns `Some(true)` for nullable, `Some(false)` for not-null.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::NotNull => Some(false),
            Self::Nullable => Some(true),
            Self::Unknown => None,
        }
    }
}

/// Foreign key deferrability.
///
/// A missing value on [`ForeignKey::deferrability`] means unknown: either
/// the database does not report it or the code was unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Deferrability {
    /// Checked immediately, cannot be deferred.
    NotDeferrable,
    /// `DEFERRABLE INITIALLY DEFERRED`.
    InitiallyDeferred,
    /// `DEFERRABLE INITIALLY IMMEDIATE`.
    InitiallyImmediate,
}

impl Deferrability {
    /// Decodes a JDBC `DEFERRABILITY` code (5, 6 or 7).
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            5 => Some(Self::InitiallyDeferred),
            6 => Some(Self::InitiallyImmediate),
            7 => Some(Self::NotDeferrable),
            _ => None,
        }
    }

    /// Whether the constraint may be deferred at all.
    #[must_use]
    pub const fn is_deferrable(self) -> bool {
        !matches!(self, Self::NotDeferrable)
    }

    /// Whether checking starts out deferred.
    #[must_use]
    pub const fn is_initially_deferred(self) -> bool {
        matches!(self, Self::InitiallyDeferred)
    }
}

/// The container a column belongs to.
///
/// A column has exactly one owner, so both and neither are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnOwner {
    /// Column of a base table.
    Table(String),
    /// Column of a view.
    View(String),
}

impl ColumnOwner {
    /// Name of the owning table or view.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Table(name) | Self::View(name) => name,
        }
    }

    /// Returns the owning table name, if the owner is a table.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Table(name) => Some(name),
            Self::View(_) => None,
        }
    }

    /// Returns the owning view name, if the owner is a view.
    #[must_use]
    pub fn view(&self) -> Option<&str> {
        match self {
            Self::View(name) => Some(name),
            Self::Table(_) => None,
        }
    }
}

/// A table or view column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Owning table or view.
    pub owner: ColumnOwner,
    /// Declared `java.sql.Types` code.
    pub data_type: i32,
    /// Column size (length or precision).
    pub size: i32,
    /// Decimal digits (scale).
    pub decimal_digits: i32,
    /// Database-specific type name.
    pub type_name: String,
    /// Nullability.
    pub nullability: Nullability,
    /// Whether the column is filled from an implicit sequence or identity.
    pub auto_increment: bool,
    /// Default value, translated into portable form.
    pub default_value: Option<String>,
}

impl Column {
    /// `container.column`, the key used for column lookup.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner.name(), self.name)
    }
}

/// A base table and its columns in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in the order they were read.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A view, its definition text, and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: String,
    /// The dialect-specific query text, when the database exposes it.
    pub definition: Option<String>,
    /// Columns in the order they were read.
    pub columns: Vec<Column>,
}

impl View {
    /// Creates a view with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: Option<String>) -> Self {
        Self {
            name: name.into(),
            definition,
            columns: Vec::new(),
        }
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Owning table.
    pub table_name: String,
    /// Columns in key-sequence order.
    pub column_names: Vec<String>,
    /// Constraint name, when the database names primary keys.
    pub name: Option<String>,
}

/// One column pair of a foreign key.
///
/// Composite keys appear as one entity per column pair sharing a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: Option<String>,
    /// Referenced (primary key side) table.
    pub primary_key_table: String,
    /// Referenced column.
    pub primary_key_column: String,
    /// Referencing (foreign key side) table.
    pub foreign_key_table: String,
    /// Referencing column.
    pub foreign_key_column: String,
    /// Deferrability; `None` when unknown.
    pub deferrability: Option<Deferrability>,
}

/// A secondary index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Owning table.
    pub table_name: String,
    /// Index name.
    pub name: String,
    /// Columns in ordinal order.
    pub column_names: Vec<String>,
}

impl Index {
    /// Whether this index is the one backing `pk`.
    ///
    /// Table names compare case-insensitively; column lists compare
    /// exactly, since quoted identifiers are case-sensitive.
    #[must_use]
    pub fn implements(&self, pk: &PrimaryKey) -> bool {
        self.table_name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(pk.table_name.chars().flat_map(char::to_lowercase))
            && self.column_names == pk.column_names
    }
}

/// A sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(table: &str, columns: &[&str]) -> PrimaryKey {
        PrimaryKey {
            table_name: table.into(),
            column_names: columns.iter().map(|c| (*c).to_string()).collect(),
            name: None,
        }
    }

    fn index(table: &str, columns: &[&str]) -> Index {
        Index {
            table_name: table.into(),
            name: "idx".into(),
            column_names: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn nullability_codes() {
        assert_eq!(Nullability::from_code(0), Nullability::NotNull);
        assert_eq!(Nullability::from_code(1), Nullability::Nullable);
        assert_eq!(Nullability::from_code(2), Nullability::Unknown);
        assert_eq!(Nullability::from_code(-1), Nullability::Unknown);
        assert_eq!(Nullability::Unknown.as_bool(), None);
    }

    #[test]
    fn deferrability_codes() {
        let deferred = Deferrability::from_code(5).unwrap();
        assert!(deferred.is_deferrable());
        assert!(deferred.is_initially_deferred());

        let immediate = Deferrability::from_code(6).unwrap();
        assert!(immediate.is_deferrable());
        assert!(!immediate.is_initially_deferred());

        let never = Deferrability::from_code(7).unwrap();
        assert!(!never.is_deferrable());

        assert_eq!(Deferrability::from_code(0), None);
    }

    #[test]
    fn owner_accessors() {
        let owner = ColumnOwner::View("active_users".into());
        assert_eq!(owner.name(), "active_users");
        assert_eq!(owner.view(), Some("active_users"));
        assert_eq!(owner.table(), None);
    }

    #[test]
    fn index_implements_pk_ignoring_table_case() {
        assert!(index("Users", &["ID"]).implements(&pk("USERS", &["ID"])));
        assert!(index("Ärzte", &["ID"]).implements(&pk("ÄRZTE", &["ID"])));
        assert!(!index("USERS_X", &["ID"]).implements(&pk("USERS", &["ID"])));
    }

    #[test]
    fn index_does_not_implement_pk_with_differently_cased_columns() {
        assert!(!index("USERS", &["id"]).implements(&pk("USERS", &["ID"])));
    }

    #[test]
    fn index_column_order_matters() {
        assert!(!index("t", &["b", "a"]).implements(&pk("t", &["a", "b"])));
    }
}
