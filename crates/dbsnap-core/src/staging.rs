//! Mutable accumulators for entities whose identity depends on a column
//! list that grows row by row.
//!
//! Primary keys and indexes are assembled here and only turned into their
//! final, hashable form once every row has been consumed.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{Result, SnapshotError};
use crate::structure::{Index, PrimaryKey};

/// Column names placed by 1-based position.
///
/// Rows may arrive in any order. A slot may be claimed once, and the
/// finished list must have no gaps.
#[derive(Debug, Default)]
pub(crate) struct PositionedColumns {
    slots: BTreeMap<i32, String>,
}

impl PositionedColumns {
    pub(crate) fn place(&mut self, object: &str, position: i32, column: String) -> Result<()> {
        if position < 1 {
            return Err(SnapshotError::InvalidColumnPosition {
                object: object.to_string(),
                position,
                reason: "positions start at 1".to_string(),
            });
        }
        match self.slots.entry(position) {
            Entry::Occupied(taken) => Err(SnapshotError::InvalidColumnPosition {
                object: object.to_string(),
                position,
                reason: format!("slot already holds column {}", taken.get()),
            }),
            Entry::Vacant(slot) => {
                slot.insert(column);
                Ok(())
            }
        }
    }

    pub(crate) fn finish(self, object: &str) -> Result<Vec<String>> {
        for (expected, &position) in (1..).zip(self.slots.keys()) {
            if position != expected {
                return Err(SnapshotError::InvalidColumnPosition {
                    object: object.to_string(),
                    position: expected,
                    reason: format!("no column at this position (next is {position})"),
                });
            }
        }
        Ok(self.slots.into_values().collect())
    }
}

/// A primary key whose columns are still streaming in.
#[derive(Debug, Default)]
struct StagedPrimaryKey {
    name: Option<String>,
    columns: PositionedColumns,
}

/// Primary keys under construction, keyed by table name.
#[derive(Debug, Default)]
pub(crate) struct PrimaryKeyStaging {
    keys: BTreeMap<String, StagedPrimaryKey>,
}

impl PrimaryKeyStaging {
    pub(crate) fn add(
        &mut self,
        table: &str,
        column: String,
        key_sequence: i32,
        constraint_name: Option<String>,
    ) -> Result<()> {
        let staged = self.keys.entry(table.to_string()).or_default();
        if staged.name.is_none() {
            staged.name = constraint_name;
        }
        staged
            .columns
            .place(&format!("{table} primary key"), key_sequence, column)
    }

    pub(crate) fn finish(self) -> Result<Vec<PrimaryKey>> {
        self.keys
            .into_iter()
            .map(|(table_name, staged)| {
                let column_names = staged.columns.finish(&format!("{table_name} primary key"))?;
                Ok(PrimaryKey {
                    table_name,
                    column_names,
                    name: staged.name,
                })
            })
            .collect()
    }
}

/// Indexes of one table under construction, keyed by index name.
#[derive(Debug, Default)]
pub(crate) struct IndexStaging {
    indexes: BTreeMap<String, (String, PositionedColumns)>,
}

impl IndexStaging {
    pub(crate) fn add(
        &mut self,
        table: &str,
        index_name: &str,
        column: String,
        ordinal_position: i32,
    ) -> Result<()> {
        let (_, columns) = self
            .indexes
            .entry(index_name.to_string())
            .or_insert_with(|| (table.to_string(), PositionedColumns::default()));
        columns.place(&format!("{table}.{index_name}"), ordinal_position, column)
    }

    pub(crate) fn finish(self) -> Result<Vec<Index>> {
        self.indexes
            .into_iter()
            .map(|(name, (table_name, columns))| {
                let column_names = columns.finish(&format!("{table_name}.{name}"))?;
                Ok(Index {
                    table_name,
                    name,
                    column_names,
                })
            })
            .collect()
    }
}
