// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Adapters turning a materialized view into plain in-memory structures,
//! and back into a stored table.

mod array;
mod table;

pub use array::Array;
use dbtable_core::{Database, LazyView};
use dbtable_type::{Frame, Result};
pub use table::{Column, ColumnData, Table};
use tracing::instrument;

/// Structures that can be written back to a store.
pub trait IntoFrame {
	fn to_frame(&self) -> Result<Frame>;
}

impl IntoFrame for Frame {
	fn to_frame(&self) -> Result<Frame> {
		Ok(self.clone())
	}
}

/// Stores `data` as table `name` and returns a view over it.
#[instrument(name = "export::persist", level = "debug", skip(db, data))]
pub fn persist<T: IntoFrame + ?Sized>(db: &Database, name: &str, data: &T) -> Result<LazyView> {
	db.create_table(name, &data.to_frame()?)
}

/// Materializes `view` as a numeric array.
pub fn to_array(view: &LazyView) -> Result<Array> {
	Array::from_frame(view.frame()?.as_ref())
}

/// Materializes `view` as a column-major table.
pub fn to_table(view: &LazyView) -> Result<Table> {
	Table::from_frame(view.frame()?.as_ref())
}

#[cfg(test)]
mod tests {
	use dbtable_query::col;
	use dbtable_store_sqlite::SqliteStore;
	use dbtable_testing::{counting::CountingStore, fixture::people};
	use dbtable_type::Value;

	use super::*;

	fn db() -> Database {
		let db = Database::open(SqliteStore::in_memory().unwrap()).unwrap();
		db.create_table("people", &people().unwrap()).unwrap();
		db
	}

	#[test]
	fn test_view_to_table() {
		let db = db();
		let view = db.table("people").unwrap().filter(col("age").gt(25)).unwrap();
		let table = to_table(&view).unwrap();
		assert_eq!(table.len(), 2);
		assert_eq!(table.row(1).unwrap()[0], Value::utf8("Cy"));
	}

	#[test]
	fn test_view_to_array() {
		let db = db();
		let view = db.table("people").unwrap().select(["age"]).unwrap();
		assert_eq!(to_array(&view).unwrap().into_vec(), vec![30.0, 20.0, 30.0]);

		let text = db.table("people").unwrap();
		assert!(to_array(&text).is_err());
	}

	#[test]
	fn test_exports_share_materialized_frame() {
		let store = CountingStore::new(SqliteStore::in_memory().unwrap());
		let executed = store.counter();
		let db = Database::open(store).unwrap();
		db.create_table("people", &people().unwrap()).unwrap();

		let view = db.table("people").unwrap().select(["age"]).unwrap();
		let table = to_table(&view).unwrap();
		let array = to_array(&view).unwrap();
		assert_eq!(executed.get(), 1);
		assert_eq!(table.len(), 3);
		assert_eq!(array.shape(), (3, 1));
	}

	#[test]
	fn test_persist_table() {
		let db = db();
		let table = to_table(&db.table("people").unwrap().sort("age", false).unwrap()).unwrap();

		let saved = persist(&db, "by_age", &table).unwrap();
		assert_eq!(to_table(&saved).unwrap(), table);
		assert!(db.tables().unwrap().contains(&"by_age".to_string()));
	}

	#[test]
	fn test_persist_array() {
		let db = db();
		let array = Array::new(vec!["x".into(), "y".into()], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
		let saved = persist(&db, "points", &array).unwrap();
		assert_eq!(to_array(&saved).unwrap(), array);
	}
}
