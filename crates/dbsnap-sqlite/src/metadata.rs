//! In-memory SQLite catalog implementing [`MetadataProvider`].

use std::collections::BTreeMap;

use dbsnap_core::provider::INDEX_TYPE_OTHER;
use dbsnap_core::{
    ColumnRow, ExportedKeyRow, IndexInfoRow, MetadataProvider, ObjectKind, PrimaryKeyRow,
    ProviderError, ProviderResult, TableRow,
};
use sqlx::sqlite::SqlitePool;
use tracing::{debug, warn};

use crate::options::SqliteProviderOptions;
use crate::types::{size_and_digits, type_code};

/// The only schema read by this provider.
pub const MAIN_SCHEMA: &str = "main";

const OBJECTS_SQL: &str = r#"
SELECT type, name, sql FROM sqlite_master
WHERE type IN ('table', 'view')
ORDER BY name
"#;

const TABLE_INFO_SQL: &str =
    r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#;

const INDEX_LIST_SQL: &str = "SELECT name FROM pragma_index_list(?1) ORDER BY seq";

const INDEX_INFO_SQL: &str = "SELECT seqno, name FROM pragma_index_info(?1) ORDER BY seqno";

const FOREIGN_KEY_LIST_SQL: &str =
    r#"SELECT seq, "table", "from", "to" FROM pragma_foreign_key_list(?1) ORDER BY id, seq"#;

/// A foreign key column pair as declared on the referencing table.
struct DeclaredForeignKey {
    fk_table: String,
    fk_column: String,
    pk_table: String,
    pk_column: Option<String>,
    seq: i64,
}

/// Structure of one SQLite database, read up front.
///
/// SQLite introspection goes through `sqlx`, which is async. [`load`](Self::load)
/// runs every query once; the [`MetadataProvider`] methods then answer from
/// memory, so a snapshot can be built without blocking inside a runtime.
#[derive(Debug, Clone)]
pub struct SqliteMetadata {
    options: SqliteProviderOptions,
    objects: Vec<TableRow>,
    view_definitions: BTreeMap<String, Option<String>>,
    columns: Vec<ColumnRow>,
    primary_keys: BTreeMap<String, Vec<PrimaryKeyRow>>,
    index_info: BTreeMap<String, Vec<IndexInfoRow>>,
    exported_keys: BTreeMap<String, Vec<ExportedKeyRow>>,
}

impl SqliteMetadata {
    /// Reads the structure of the `main` schema with default options.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] naming the operation whose query failed.
    pub async fn load(pool: &SqlitePool) -> ProviderResult<Self> {
        Self::load_with_options(pool, SqliteProviderOptions::default()).await
    }

    /// Reads the structure of the `main` schema.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] naming the operation whose query failed.
    pub async fn load_with_options(
        pool: &SqlitePool,
        options: SqliteProviderOptions,
    ) -> ProviderResult<Self> {
        let mut metadata = Self {
            options,
            objects: Vec::new(),
            view_definitions: BTreeMap::new(),
            columns: Vec::new(),
            primary_keys: BTreeMap::new(),
            index_info: BTreeMap::new(),
            exported_keys: BTreeMap::new(),
        };

        let objects: Vec<(String, String, Option<String>)> = sqlx::query_as(OBJECTS_SQL)
            .fetch_all(pool)
            .await
            .map_err(|e| ProviderError::new("list_tables_and_views", e))?;

        let mut tables = Vec::new();
        for (kind, name, sql) in objects {
            let kind = ObjectKind::from_table_type(&kind);
            match kind {
                ObjectKind::View => {
                    metadata.view_definitions.insert(name.clone(), sql);
                }
                ObjectKind::Table => tables.push(name.clone()),
                ObjectKind::Other(_) => {}
            }
            metadata.load_columns(pool, &name, &kind).await?;
            metadata.objects.push(TableRow {
                kind,
                name,
                schema: Some(MAIN_SCHEMA.to_string()),
                catalog: None,
            });
        }

        let mut declared = Vec::new();
        for table in &tables {
            metadata.load_indexes(pool, table).await?;
            declared.extend(load_foreign_keys(pool, table).await?);
        }
        metadata.export_foreign_keys(&tables, declared);

        debug!(
            objects = metadata.objects.len(),
            columns = metadata.columns.len(),
            "Loaded SQLite catalog"
        );
        Ok(metadata)
    }

    async fn load_columns(
        &mut self,
        pool: &SqlitePool,
        owner: &str,
        kind: &ObjectKind,
    ) -> ProviderResult<()> {
        let result: Result<Vec<(String, String, i64, Option<String>, i64)>, _> =
            sqlx::query_as(TABLE_INFO_SQL)
                .bind(owner)
                .fetch_all(pool)
                .await;
        let rows = match (result, kind) {
            (Ok(rows), _) => rows,
            // A view over a dropped table survives in sqlite_master but cannot be described.
            (Err(e), ObjectKind::View) => {
                warn!(view = owner, error = %e, "Skipping columns of unreadable view");
                return Ok(());
            }
            (Err(e), _) => return Err(ProviderError::new("list_columns", e)),
        };

        for (column, declared, not_null, raw_default, pk) in rows {
            let (size, decimal_digits) = size_and_digits(&declared);
            let nullable_code = match (kind, not_null) {
                // Views do not carry NOT NULL constraints of their own.
                (ObjectKind::View, _) => 2,
                (_, 0) => 1,
                _ => 0,
            };

            if pk > 0 {
                self.primary_keys
                    .entry(owner.to_string())
                    .or_default()
                    .push(PrimaryKeyRow {
                        table: owner.to_string(),
                        column: column.clone(),
                        key_sequence: i32::try_from(pk).unwrap_or(i32::MAX),
                        constraint_name: None,
                    });
            }

            self.columns.push(ColumnRow {
                table: owner.to_string(),
                schema: Some(MAIN_SCHEMA.to_string()),
                catalog: None,
                column,
                data_type: type_code(&declared),
                size,
                decimal_digits,
                type_name: declared,
                raw_default,
                nullable_code,
            });
        }
        Ok(())
    }

    async fn load_indexes(&mut self, pool: &SqlitePool, table: &str) -> ProviderResult<()> {
        let indexes: Vec<(String,)> = sqlx::query_as(INDEX_LIST_SQL)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(|e| ProviderError::new("list_index_info", e))?;

        let rows = self.index_info.entry(table.to_string()).or_default();
        for (index_name,) in indexes {
            let columns: Vec<(i64, Option<String>)> = sqlx::query_as(INDEX_INFO_SQL)
                .bind(&index_name)
                .fetch_all(pool)
                .await
                .map_err(|e| ProviderError::new("list_index_info", e))?;

            // Expression columns have no name; such an index cannot be described.
            if columns.iter().any(|(_, column)| column.is_none()) {
                debug!(table, index = %index_name, "Skipping index over expressions");
                continue;
            }

            for (seqno, column) in columns {
                rows.push(IndexInfoRow {
                    index_name: Some(index_name.clone()),
                    type_code: INDEX_TYPE_OTHER,
                    table: table.to_string(),
                    column,
                    ordinal_position: i32::try_from(seqno + 1).unwrap_or(i32::MAX),
                });
            }
        }
        Ok(())
    }

    /// Files every declared foreign key under the table it references.
    fn export_foreign_keys(&mut self, tables: &[String], declared: Vec<DeclaredForeignKey>) {
        for fk in declared {
            // SQLite keeps the referenced name as written in the DDL.
            let canonical = tables
                .iter()
                .find(|t| t.eq_ignore_ascii_case(&fk.pk_table))
                .cloned();
            // A dangling reference is filed under the referencing table so
            // the snapshot sees it and rejects it.
            let listed_under = canonical.clone().unwrap_or_else(|| fk.fk_table.clone());
            let pk_table = canonical.unwrap_or(fk.pk_table);

            let pk_column = fk
                .pk_column
                .or_else(|| self.primary_key_column(&pk_table, fk.seq + 1))
                .unwrap_or_else(|| "rowid".to_string());

            self.exported_keys
                .entry(listed_under)
                .or_default()
                .push(ExportedKeyRow {
                    pk_table,
                    pk_column,
                    fk_table: fk.fk_table,
                    fk_column: fk.fk_column,
                    constraint_name: None,
                    // importedKeyNotDeferrable
                    deferrability_code: 7,
                });
        }
    }

    fn primary_key_column(&self, table: &str, key_sequence: i64) -> Option<String> {
        self.primary_keys
            .get(table)?
            .iter()
            .find(|pk| i64::from(pk.key_sequence) == key_sequence)
            .map(|pk| pk.column.clone())
    }

    fn in_scope(schema: Option<&str>) -> bool {
        schema.is_none_or(|s| s.eq_ignore_ascii_case(MAIN_SCHEMA))
    }
}

async fn load_foreign_keys(
    pool: &SqlitePool,
    table: &str,
) -> ProviderResult<Vec<DeclaredForeignKey>> {
    let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(FOREIGN_KEY_LIST_SQL)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| ProviderError::new("list_exported_foreign_keys", e))?;

    Ok(rows
        .into_iter()
        .map(|(seq, pk_table, fk_column, pk_column)| DeclaredForeignKey {
            fk_table: table.to_string(),
            fk_column,
            pk_table,
            pk_column,
            seq,
        })
        .collect())
}

impl MetadataProvider for SqliteMetadata {
    fn database_label(&self) -> String {
        self.options.label.clone()
    }

    fn list_tables_and_views(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ProviderResult<Vec<TableRow>> {
        if !Self::in_scope(schema) {
            return Ok(Vec::new());
        }
        Ok(self.objects.clone())
    }

    fn view_definition(&self, name: &str) -> ProviderResult<Option<String>> {
        Ok(self.view_definitions.get(name).cloned().flatten())
    }

    fn list_columns(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ProviderResult<Vec<ColumnRow>> {
        if !Self::in_scope(schema) {
            return Ok(Vec::new());
        }
        Ok(self.columns.clone())
    }

    fn list_exported_foreign_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<ExportedKeyRow>> {
        Ok(self.exported_keys.get(table).cloned().unwrap_or_default())
    }

    fn list_index_info(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<IndexInfoRow>> {
        Ok(self.index_info.get(table).cloned().unwrap_or_default())
    }

    fn list_primary_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> ProviderResult<Vec<PrimaryKeyRow>> {
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn list_sequence_names(&self) -> ProviderResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn supports_deferrable_constraints(&self) -> bool {
        false
    }

    fn is_system_object(&self, _catalog: Option<&str>, _schema: Option<&str>, name: &str) -> bool {
        name.get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sqlite_"))
    }

    fn is_bookkeeping_object(&self, name: &str) -> bool {
        self.options
            .bookkeeping_tables
            .iter()
            .any(|t| t.eq_ignore_ascii_case(name))
    }
}
