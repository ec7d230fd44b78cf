// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Lazy query views over relational tables.
//!
//! ```no_run
//! use dbtable::{col, memory};
//!
//! # fn main() -> dbtable::Result<()> {
//! let db = memory()?;
//! let people = db.table("people")?;
//! let adults = people.filter(col("age").ge(25))?.sort("age", false)?;
//! let adults = adults.derive("decade", adults.column("age")? / 10)?;
//! for row in adults.rows()? {
//! 	println!("{:?}", row);
//! }
//! # Ok(())
//! # }
//! ```

pub mod logging;

use std::path::Path;

pub use dbtable_core::{Database, LazyView, Rows, Store};
pub use dbtable_export as export;
pub use dbtable_export::{Array, Table};
pub use dbtable_query::{AddColumns, Aggregate, BinaryOp, Chain, Expr, Operation, Plan, SortDirection, add, col, div, lit, mul, sub};
pub use dbtable_store_sqlite::{SqliteConfig, SqliteStore};
pub use dbtable_type::{ColumnDef, Error, Frame, Result, Row, Schema, TableDef, Type, Value};

/// Opens (or creates) the SQLite database file at `path`.
pub fn open(path: impl AsRef<Path>) -> Result<Database> {
	open_with(SqliteConfig::file(path))
}

/// A fresh in-memory SQLite database.
pub fn memory() -> Result<Database> {
	open_with(SqliteConfig::in_memory())
}

pub fn open_with(config: SqliteConfig) -> Result<Database> {
	Database::open(SqliteStore::new(config)?)
}
