//! # dbsnap-core
//!
//! Builds a normalized, in-memory snapshot of a relational database's
//! structure: tables, views, columns, primary keys, foreign keys, indexes
//! and sequences.
//!
//! The engine itself performs no I/O. A [`MetadataProvider`] implemented for
//! a database product (see `dbsnap-sqlite`) supplies the raw introspection
//! rows, a [`DialectPolicy`] interprets product-specific column defaults, and
//! the [`SnapshotBuilder`] reconciles everything into a cross-referenced
//! [`DatabaseSnapshot`]. Snapshots are immutable, `Send + Sync`, and meant to
//! be compared against each other by a diff engine.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dbsnap_core::{GenericDialect, SnapshotBuilder, SnapshotConfig, TracingListener};
//!
//! let snapshot = SnapshotBuilder::new(&provider, &GenericDialect::new())
//!     .config(SnapshotConfig::new().schema("public"))
//!     .listener(&TracingListener)
//!     .build()?;
//!
//! for table in snapshot.tables() {
//!     println!("{} ({} columns)", table.name, table.columns.len());
//! }
//! ```

pub mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod graph;
pub mod listener;
pub mod provider;
mod staging;
pub mod structure;

pub use builder::{SnapshotBuilder, build_snapshot};
pub use config::SnapshotConfig;
pub use dialect::{CacheDialect, DialectPolicy, GenericDialect, H2Dialect, dialect_for_product};
pub use error::{ProviderError, Result, SnapshotError};
pub use graph::{DatabaseSnapshot, SnapshotWarning};
pub use listener::{StatusListener, TracingListener};
pub use provider::{
    ColumnRow, ExportedKeyRow, IndexInfoRow, MetadataProvider, ObjectKind, PrimaryKeyRow,
    ProviderResult, TableRow,
};
pub use structure::{
    Column, ColumnOwner, Deferrability, ForeignKey, Index, Nullability, PrimaryKey, Sequence,
    Table, View,
};
