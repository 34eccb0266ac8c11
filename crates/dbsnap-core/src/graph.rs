//! The finished, read-only entity graph.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::structure::{Column, ForeignKey, Index, PrimaryKey, Sequence, Table, View};

/// A recoverable anomaly met while reading metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SnapshotWarning {
    /// A column row named a table or view that is not in the snapshot.
    UnresolvedColumnOwner {
        /// The owner named by the row.
        owner: String,
        /// The column that was dropped.
        column: String,
    },
    /// A column was reported twice for the same owner; the later row won.
    DuplicateColumn {
        /// Table or view name.
        owner: String,
        /// Column name.
        column: String,
    },
    /// A table and a view were reported under the same name; the first kept it.
    NameClaimedTwice {
        /// The contested name.
        name: String,
    },
}

impl fmt::Display for SnapshotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedColumnOwner { owner, column } => {
                write!(f, "Could not find table or view {owner} for column {column}")
            }
            Self::DuplicateColumn { owner, column } => {
                write!(f, "Column {owner}.{column} was reported more than once")
            }
            Self::NameClaimedTwice { name } => {
                write!(f, "{name} was reported as both a table and a view")
            }
        }
    }
}

/// A point-in-time structural snapshot of one database.
///
/// Built by [`SnapshotBuilder`](crate::SnapshotBuilder); immutable afterwards.
/// Collections iterate in sorted order, so two snapshots of the same schema
/// compare and serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSnapshot {
    pub(crate) label: String,
    pub(crate) catalog: Option<String>,
    pub(crate) schema: Option<String>,
    pub(crate) tables: BTreeMap<String, Table>,
    pub(crate) views: BTreeMap<String, View>,
    pub(crate) foreign_keys: BTreeSet<ForeignKey>,
    pub(crate) indexes: BTreeSet<Index>,
    pub(crate) primary_keys: BTreeSet<PrimaryKey>,
    pub(crate) sequences: BTreeSet<Sequence>,
    pub(crate) warnings: Vec<SnapshotWarning>,
}

impl DatabaseSnapshot {
    /// Label of the database this snapshot was read from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Catalog the snapshot was restricted to.
    #[must_use]
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Schema the snapshot was restricted to.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// All tables, by name.
    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.values()
    }

    /// All views, by name.
    pub fn views(&self) -> impl ExactSizeIterator<Item = &View> + '_ {
        self.views.values()
    }

    /// Every column of every table, then every column of every view.
    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.tables
            .values()
            .flat_map(|t| t.columns.iter())
            .chain(self.views.values().flat_map(|v| v.columns.iter()))
    }

    /// All foreign key column pairs.
    #[must_use]
    pub fn foreign_keys(&self) -> &BTreeSet<ForeignKey> {
        &self.foreign_keys
    }

    /// All indexes, minus those backing a primary key.
    #[must_use]
    pub fn indexes(&self) -> &BTreeSet<Index> {
        &self.indexes
    }

    /// All primary keys.
    #[must_use]
    pub fn primary_keys(&self) -> &BTreeSet<PrimaryKey> {
        &self.primary_keys
    }

    /// All sequences.
    #[must_use]
    pub fn sequences(&self) -> &BTreeSet<Sequence> {
        &self.sequences
    }

    /// Recoverable anomalies recorded during the build.
    #[must_use]
    pub fn warnings(&self) -> &[SnapshotWarning] {
        &self.warnings
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Looks up a view by name.
    #[must_use]
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    /// Looks up a column by its table-or-view name and column name.
    #[must_use]
    pub fn column(&self, container: &str, column: &str) -> Option<&Column> {
        match self.tables.get(container) {
            Some(table) => table.column(column),
            None => self.views.get(container)?.column(column),
        }
    }

    /// Finds this snapshot's counterpart of a column, e.g. one taken from
    /// another snapshot.
    #[must_use]
    pub fn matching_column(&self, column: &Column) -> Option<&Column> {
        self.column(column.owner.name(), &column.name)
    }

    /// The primary key of `table`, if it has one.
    #[must_use]
    pub fn primary_key(&self, table: &str) -> Option<&PrimaryKey> {
        self.primary_keys.iter().find(|pk| pk.table_name == table)
    }

    /// Indexes declared on `table`.
    pub fn indexes_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Index> + 'a {
        self.indexes.iter().filter(move |i| i.table_name == table)
    }

    /// Foreign keys whose referencing side is `table`.
    pub fn foreign_keys_from<'a>(
        &'a self,
        table: &'a str,
    ) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.foreign_key_table == table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ColumnOwner, Nullability};

    fn column(owner: ColumnOwner, name: &str) -> Column {
        Column {
            name: name.into(),
            owner,
            data_type: 4,
            size: 10,
            decimal_digits: 0,
            type_name: "INTEGER".into(),
            nullability: Nullability::NotNull,
            auto_increment: false,
            default_value: None,
        }
    }

    fn sample() -> DatabaseSnapshot {
        let mut users = Table::new("USERS");
        users.columns.push(column(ColumnOwner::Table("USERS".into()), "ID"));
        let mut active = View::new("ACTIVE_USERS", Some("SELECT ID FROM USERS".into()));
        active
            .columns
            .push(column(ColumnOwner::View("ACTIVE_USERS".into()), "ID"));

        DatabaseSnapshot {
            label: "test".into(),
            catalog: None,
            schema: Some("APP".into()),
            tables: BTreeMap::from([("USERS".to_string(), users)]),
            views: BTreeMap::from([("ACTIVE_USERS".to_string(), active)]),
            foreign_keys: BTreeSet::new(),
            indexes: BTreeSet::from([Index {
                table_name: "USERS".into(),
                name: "IDX_ID".into(),
                column_names: vec!["ID".into()],
            }]),
            primary_keys: BTreeSet::new(),
            sequences: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn column_lookup_covers_tables_and_views() {
        let snapshot = sample();
        assert!(snapshot.column("USERS", "ID").unwrap().owner.table().is_some());
        assert!(snapshot.column("ACTIVE_USERS", "ID").unwrap().owner.view().is_some());
        assert!(snapshot.column("USERS", "id").is_none());
        assert!(snapshot.column("MISSING", "ID").is_none());
    }

    #[test]
    fn columns_iterates_tables_then_views() {
        let snapshot = sample();
        let names: Vec<String> = snapshot.columns().map(Column::qualified_name).collect();
        assert_eq!(names, vec!["USERS.ID", "ACTIVE_USERS.ID"]);
    }

    #[test]
    fn matching_column_uses_owner_and_name() {
        let snapshot = sample();
        let probe = column(ColumnOwner::View("ACTIVE_USERS".into()), "ID");
        assert_eq!(snapshot.matching_column(&probe), Some(&probe));
    }

    #[test]
    fn indexes_of_filters_by_table() {
        let snapshot = sample();
        assert_eq!(snapshot.indexes_of("USERS").count(), 1);
        assert_eq!(snapshot.indexes_of("ORDERS").count(), 0);
    }

    #[test]
    fn warnings_render_as_messages() {
        let warning = SnapshotWarning::UnresolvedColumnOwner {
            owner: "LEGACY_TMP".into(),
            column: "ID".into(),
        };
        assert_eq!(
            warning.to_string(),
            "Could not find table or view LEGACY_TMP for column ID"
        );
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["schema"], "APP");
        assert_eq!(json["tables"]["USERS"]["columns"][0]["name"], "ID");
        assert_eq!(json["views"]["ACTIVE_USERS"]["definition"], "SELECT ID FROM USERS");
    }
}
