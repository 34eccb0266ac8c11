//! Metadata provider trait.
//!
//! Driver crates (dbsnap-sqlite, etc.) implement [`MetadataProvider`] over a
//! database's introspection surface. The rows mirror what a JDBC-style
//! `DatabaseMetaData` returns: names, loosely-typed codes and optional
//! fields. Interpreting the codes is left to the snapshot builder.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// `TYPE` code of an index-info row that carries table statistics rather
/// than an index column.
pub const INDEX_TYPE_STATISTIC: i16 = 0;
/// `TYPE` code of any other index.
pub const INDEX_TYPE_OTHER: i16 = 3;

/// Kind of a catalog object listed by [`MetadataProvider::list_tables_and_views`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A base table.
    Table,
    /// A view.
    View,
    /// Anything else the provider reports (`SYSTEM TABLE`, `SYNONYM`, ...).
    Other(String),
}

impl ObjectKind {
    /// Parses a JDBC `TABLE_TYPE` string, ignoring ASCII case.
    #[must_use]
    pub fn from_table_type(table_type: &str) -> Self {
        if table_type.eq_ignore_ascii_case("TABLE") {
            Self::Table
        } else if table_type.eq_ignore_ascii_case("VIEW") {
            Self::View
        } else {
            Self::Other(table_type.to_string())
        }
    }
}

/// One row of the table/view listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Object kind.
    pub kind: ObjectKind,
    /// Object name.
    pub name: String,
    /// Schema the object lives in.
    pub schema: Option<String>,
    /// Catalog the object lives in.
    pub catalog: Option<String>,
}

/// One row of the column listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    /// Owning table or view name.
    pub table: String,
    /// Schema of the owner.
    pub schema: Option<String>,
    /// Catalog of the owner.
    pub catalog: Option<String>,
    /// Column name.
    pub column: String,
    /// `java.sql.Types` code.
    pub data_type: i32,
    /// Column size.
    pub size: i32,
    /// Decimal digits.
    pub decimal_digits: i32,
    /// Database type name.
    pub type_name: String,
    /// Raw default text exactly as the database renders it.
    pub raw_default: Option<String>,
    /// `NULLABLE` code: 0 no nulls, 1 nullable, 2 unknown.
    pub nullable_code: i32,
}

/// One column pair of a foreign key, seen from the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedKeyRow {
    /// Referenced table.
    pub pk_table: String,
    /// Referenced column.
    pub pk_column: String,
    /// Referencing table.
    pub fk_table: String,
    /// Referencing column.
    pub fk_column: String,
    /// Constraint name.
    pub constraint_name: Option<String>,
    /// `DEFERRABILITY` code.
    pub deferrability_code: i16,
}

/// One row of index information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfoRow {
    /// Index name; statistics rows usually have none.
    pub index_name: Option<String>,
    /// `TYPE` code, see the `INDEX_TYPE_*` constants.
    pub type_code: i16,
    /// Owning table.
    pub table: String,
    /// Indexed column; absent for expression columns.
    pub column: Option<String>,
    /// 1-based position of the column within the index.
    pub ordinal_position: i32,
}

/// One column of a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    /// Owning table.
    pub table: String,
    /// Key column.
    pub column: String,
    /// 1-based position of the column within the key.
    pub key_sequence: i32,
    /// Constraint name.
    pub constraint_name: Option<String>,
}

/// Introspection surface of one database.
///
/// `catalog` and `schema` are the scope configured on the builder; `None`
/// means "not restricted".
pub trait MetadataProvider {
    /// Human-readable label of the target database, used in progress messages.
    fn database_label(&self) -> String {
        "database".to_string()
    }

    /// Lists tables and views (and possibly other object kinds).
    fn list_tables_and_views(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ProviderResult<Vec<TableRow>>;

    /// Returns the definition text of a view.
    fn view_definition(&self, name: &str) -> ProviderResult<Option<String>>;

    /// Lists every column of every object in scope.
    fn list_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ProviderResult<Vec<ColumnRow>>;

    /// Lists foreign key column pairs that reference `table`.
    fn list_exported_foreign_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<ExportedKeyRow>>;

    /// Lists index information rows of `table`.
    fn list_index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<IndexInfoRow>>;

    /// Lists primary key columns of `table`.
    fn list_primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<PrimaryKeyRow>>;

    /// Whether the database has sequences.
    fn supports_sequences(&self) -> bool;

    /// Lists sequence names. Only called when [`Self::supports_sequences`] is true.
    fn list_sequence_names(&self) -> ProviderResult<Vec<String>>;

    /// Whether the database reports foreign key deferrability.
    fn supports_deferrable_constraints(&self) -> bool;

    /// Whether `name` is a system object of the database.
    fn is_system_object(&self, catalog: Option<&str>, schema: Option<&str>, name: &str) -> bool;

    /// Whether `name` is one of the migration tool's own bookkeeping tables.
    fn is_bookkeeping_object(&self, name: &str) -> bool;
}
