//! Snapshot builder.
//!
//! Reads a database's structure through a [`MetadataProvider`] in six
//! phases, each depending on the entities produced by the ones before it:
//!
//! 1. tables and views
//! 2. columns
//! 3. foreign keys
//! 4. primary keys
//! 5. indexes
//! 6. sequences

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, info_span, warn};

use crate::config::SnapshotConfig;
use crate::dialect::DialectPolicy;
use crate::error::{Result, SnapshotError};
use crate::graph::{DatabaseSnapshot, SnapshotWarning};
use crate::listener::{StatusListener, notify};
use crate::provider::{ColumnRow, INDEX_TYPE_STATISTIC, MetadataProvider, ObjectKind};
use crate::staging::{IndexStaging, PrimaryKeyStaging};
use crate::structure::{
    Column, ColumnOwner, Deferrability, ForeignKey, Index, Nullability, PrimaryKey, Sequence,
    Table, View,
};

/// Builds a [`DatabaseSnapshot`] with the default configuration.
pub fn build_snapshot(
    provider: &dyn MetadataProvider,
    dialect: &dyn DialectPolicy,
    listeners: &[&dyn StatusListener],
) -> Result<DatabaseSnapshot> {
    let mut builder = SnapshotBuilder::new(provider, dialect);
    for listener in listeners {
        builder = builder.listener(*listener);
    }
    builder.build()
}

/// Reads one snapshot from a metadata provider.
///
/// The builder is consumed by [`build`](Self::build), so every snapshot
/// comes from a fresh run.
pub struct SnapshotBuilder<'a> {
    provider: &'a dyn MetadataProvider,
    dialect: &'a dyn DialectPolicy,
    config: SnapshotConfig,
    listeners: Vec<&'a dyn StatusListener>,
}

impl<'a> SnapshotBuilder<'a> {
    /// Creates a builder reading from `provider`, interpreting defaults with `dialect`.
    #[must_use]
    pub fn new(provider: &'a dyn MetadataProvider, dialect: &'a dyn DialectPolicy) -> Self {
        Self {
            provider,
            dialect,
            config: SnapshotConfig::default(),
            listeners: Vec::new(),
        }
    }

    /// Sets the catalog/schema scope and label.
    #[must_use]
    pub fn config(mut self, config: SnapshotConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a progress listener.
    #[must_use]
    pub fn listener(mut self, listener: &'a dyn StatusListener) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Runs all read phases and returns the finished snapshot.
    ///
    /// # Errors
    ///
    /// Fails on the first provider error, on a foreign key naming a table
    /// outside the snapshot, or on an invalid key or index column position.
    pub fn build(self) -> Result<DatabaseSnapshot> {
        let label = self
            .config
            .label
            .clone()
            .unwrap_or_else(|| self.provider.database_label());
        let span = info_span!("snapshot", database = %label, dialect = self.dialect.name());
        let _enter = span.enter();

        let mut run = Run {
            provider: self.provider,
            dialect: self.dialect,
            catalog: self.config.catalog.as_deref(),
            schema: self.config.schema.as_deref(),
            listeners: &self.listeners,
            label: &label,
            tables: BTreeMap::new(),
            views: BTreeMap::new(),
            warnings: Vec::new(),
        };

        run.read_tables_and_views()?;
        run.read_columns()?;
        let foreign_keys = run.read_foreign_keys()?;
        let primary_keys = run.read_primary_keys()?;
        let indexes = run.read_indexes(&primary_keys)?;
        let sequences = run.read_sequences()?;

        let snapshot = DatabaseSnapshot {
            label: label.clone(),
            catalog: self.config.catalog.clone(),
            schema: self.config.schema.clone(),
            tables: run.tables,
            views: run.views,
            foreign_keys,
            indexes,
            primary_keys,
            sequences,
            warnings: run.warnings,
        };

        info!(
            tables = snapshot.tables.len(),
            views = snapshot.views.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            indexes = snapshot.indexes.len(),
            primary_keys = snapshot.primary_keys.len(),
            sequences = snapshot.sequences.len(),
            warnings = snapshot.warnings.len(),
            "Snapshot complete"
        );

        Ok(snapshot)
    }
}

/// State of one builder run.
struct Run<'r> {
    provider: &'r dyn MetadataProvider,
    dialect: &'r dyn DialectPolicy,
    catalog: Option<&'r str>,
    schema: Option<&'r str>,
    listeners: &'r [&'r dyn StatusListener],
    label: &'r str,
    tables: BTreeMap<String, Table>,
    views: BTreeMap<String, View>,
    warnings: Vec<SnapshotWarning>,
}

impl Run<'_> {
    fn status(&self, what: &str) {
        notify(self.listeners, &format!("Reading {what} for {} ...", self.label));
    }

    fn is_excluded(&self, catalog: Option<&str>, schema: Option<&str>, name: &str) -> bool {
        self.provider.is_system_object(catalog, schema, name)
            || self.provider.is_bookkeeping_object(name)
    }

    fn warn(&mut self, warning: SnapshotWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn read_tables_and_views(&mut self) -> Result<()> {
        self.status("tables");

        let rows = self
            .provider
            .list_tables_and_views(self.catalog, self.schema)?;
        for row in rows {
            if self.is_excluded(row.catalog.as_deref(), row.schema.as_deref(), &row.name) {
                debug!(name = %row.name, "Skipping system or bookkeeping object");
                continue;
            }

            match row.kind {
                ObjectKind::Table => {
                    if self.views.contains_key(&row.name) {
                        self.warn(SnapshotWarning::NameClaimedTwice { name: row.name });
                        continue;
                    }
                    self.tables
                        .entry(row.name.clone())
                        .or_insert_with(|| Table::new(row.name));
                }
                ObjectKind::View => {
                    if self.tables.contains_key(&row.name) {
                        self.warn(SnapshotWarning::NameClaimedTwice { name: row.name });
                        continue;
                    }
                    if self.views.contains_key(&row.name) {
                        continue;
                    }
                    let definition = self.provider.view_definition(&row.name)?;
                    self.views
                        .insert(row.name.clone(), View::new(row.name, definition));
                }
                ObjectKind::Other(kind) => {
                    debug!(name = %row.name, kind = %kind, "Ignoring object of unsupported kind");
                }
            }
        }

        debug!(
            tables = self.tables.len(),
            views = self.views.len(),
            "Read tables and views"
        );
        Ok(())
    }

    fn read_columns(&mut self) -> Result<()> {
        self.status("columns");

        let rows = self.provider.list_columns(self.catalog, self.schema)?;
        for row in rows {
            if self.is_excluded(row.catalog.as_deref(), row.schema.as_deref(), &row.table) {
                continue;
            }

            let owner = if self.tables.contains_key(&row.table) {
                ColumnOwner::Table(row.table.clone())
            } else if self.views.contains_key(&row.table) {
                ColumnOwner::View(row.table.clone())
            } else {
                self.warn(SnapshotWarning::UnresolvedColumnOwner {
                    owner: row.table,
                    column: row.column,
                });
                continue;
            };

            let column = self.column_from_row(owner, row);
            let columns = match &column.owner {
                ColumnOwner::Table(name) => self.tables.get_mut(name).map(|t| &mut t.columns),
                ColumnOwner::View(name) => self.views.get_mut(name).map(|v| &mut v.columns),
            };
            let Some(columns) = columns else {
                continue;
            };

            if let Some(existing) = columns.iter_mut().find(|c| c.name == column.name) {
                let warning = SnapshotWarning::DuplicateColumn {
                    owner: column.owner.name().to_string(),
                    column: column.name.clone(),
                };
                *existing = column;
                self.warn(warning);
            } else {
                columns.push(column);
            }
        }
        Ok(())
    }

    fn column_from_row(&self, owner: ColumnOwner, row: ColumnRow) -> Column {
        let raw_default = row.raw_default.as_deref();
        Column {
            auto_increment: self.dialect.is_auto_increment_default(raw_default),
            default_value: self.dialect.normalize_default_value(raw_default),
            name: row.column,
            owner,
            data_type: row.data_type,
            size: row.size,
            decimal_digits: row.decimal_digits,
            type_name: row.type_name,
            nullability: Nullability::from_code(row.nullable_code),
        }
    }

    fn read_foreign_keys(&self) -> Result<BTreeSet<ForeignKey>> {
        self.status("foreign keys");

        let deferrable = self.provider.supports_deferrable_constraints();
        let mut foreign_keys = BTreeSet::new();

        for table in self.tables.keys() {
            let rows =
                self.provider
                    .list_exported_foreign_keys(self.catalog, self.schema, table)?;
            for row in rows {
                self.require_table(&row.pk_table, &row.pk_column)?;
                self.require_table(&row.fk_table, &row.fk_column)?;

                let deferrability = if deferrable {
                    Deferrability::from_code(row.deferrability_code)
                } else {
                    None
                };

                foreign_keys.insert(ForeignKey {
                    name: row.constraint_name,
                    primary_key_table: row.pk_table,
                    primary_key_column: row.pk_column,
                    foreign_key_table: row.fk_table,
                    foreign_key_column: row.fk_column,
                    deferrability,
                });
            }
        }
        Ok(foreign_keys)
    }

    fn require_table(&self, table: &str, column: &str) -> Result<()> {
        if self.tables.contains_key(table) {
            Ok(())
        } else {
            Err(SnapshotError::ReferentialIntegrity {
                table: table.to_string(),
                column: column.to_string(),
            })
        }
    }

    fn read_primary_keys(&self) -> Result<BTreeSet<PrimaryKey>> {
        self.status("primary keys");

        let mut staging = PrimaryKeyStaging::default();
        for table in self.tables.keys() {
            let rows = self
                .provider
                .list_primary_keys(self.catalog, self.schema, table)?;
            for row in rows {
                staging.add(&row.table, row.column, row.key_sequence, row.constraint_name)?;
            }
        }
        Ok(staging.finish()?.into_iter().collect())
    }

    fn read_indexes(&self, primary_keys: &BTreeSet<PrimaryKey>) -> Result<BTreeSet<Index>> {
        self.status("indexes");

        let mut indexes = Vec::new();
        for table in self.tables.keys() {
            let rows = self
                .provider
                .list_index_info(self.catalog, self.schema, table)?;
            let mut staging = IndexStaging::default();
            for row in rows {
                if row.type_code == INDEX_TYPE_STATISTIC {
                    continue;
                }
                let (Some(index_name), Some(column)) = (row.index_name, row.column) else {
                    debug!(table = %row.table, "Skipping index row without index or column name");
                    continue;
                };
                staging.add(&row.table, &index_name, column, row.ordinal_position)?;
            }
            indexes.extend(staging.finish()?);
        }

        Ok(indexes
            .into_iter()
            .filter(|index| {
                let backs_pk = primary_keys.iter().any(|pk| index.implements(pk));
                if backs_pk {
                    debug!(table = %index.table_name, index = %index.name, "Dropping primary key index");
                }
                !backs_pk
            })
            .collect())
    }

    fn read_sequences(&self) -> Result<BTreeSet<Sequence>> {
        self.status("sequences");

        if !self.provider.supports_sequences() {
            return Ok(BTreeSet::new());
        }
        Ok(self
            .provider
            .list_sequence_names()?
            .into_iter()
            .map(|name| Sequence { name })
            .collect())
    }
}
