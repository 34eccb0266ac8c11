//! # dbsnap-sqlite
//!
//! SQLite metadata provider for `dbsnap-core`.
//!
//! # How SQLite maps onto the snapshot model
//!
//! - **Schemas**: only `main` is read. Asking for any other schema
//!   yields an empty snapshot.
//! - **[Type affinity]**: declared types are mapped to type codes by
//!   affinity, see [`types`].
//! - **Primary keys**: read from the `pk` column of
//!   [`pragma_table_info`]. SQLite never names them.
//! - **Foreign keys**: [`pragma_foreign_key_list`] lists keys from the
//!   referencing side. They are regrouped under the referenced table,
//!   with names matched case-insensitively and an omitted target
//!   column resolved to the referenced primary key.
//! - **Indexes**: the automatic index behind a composite primary key
//!   is reported like any other, and the snapshot drops it as a
//!   duplicate. Indexes over expressions are not reported.
//! - **Sequences** and **deferrable constraints** are not reported.
//!   Internal `sqlite_*` tables are system objects.
//!
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//! [`pragma_table_info`]: https://www.sqlite.org/pragma.html#pragma_table_info
//! [`pragma_foreign_key_list`]: https://www.sqlite.org/pragma.html#pragma_foreign_key_list
//!
//! ## Example
//!
//! ```rust,ignore
//! use dbsnap_core::{build_snapshot, GenericDialect};
//! use dbsnap_sqlite::SqliteMetadata;
//!
//! let pool = SqlitePool::connect("sqlite:app.db").await?;
//! let metadata = SqliteMetadata::load(&pool).await?;
//! let snapshot = build_snapshot(&metadata, &GenericDialect, &[])?;
//! ```

mod metadata;
pub mod options;
pub mod types;

pub use metadata::{SqliteMetadata, MAIN_SCHEMA};
pub use options::SqliteProviderOptions;
