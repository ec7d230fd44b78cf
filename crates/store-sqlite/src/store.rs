// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable_core::Store;
use dbtable_query::{AddColumns, Plan};
use dbtable_type::{ColumnDef, Error, Frame, Result, Row, Schema, TableDef};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::{debug, instrument};

use crate::{
	SqliteConfig,
	connection::connect,
	mapping::{SqlParam, column_type, declared_type, read_value},
};

fn quote(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite-backed store. One connection, serialized behind a mutex.
pub struct SqliteStore {
	conn: Mutex<Connection>,
}

impl SqliteStore {
	#[instrument(name = "store::sqlite::new", level = "info", skip(config), fields(
		db_path = ?config.path,
		journal_mode = %config.journal_mode.as_str()
	))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		Ok(Self {
			conn: Mutex::new(connect(&config)?),
		})
	}

	pub fn in_memory() -> Result<Self> {
		Self::new(SqliteConfig::in_memory())
	}

	/// Runs a batch of statements, for seeding and migrations.
	#[instrument(name = "store::sqlite::execute_batch", level = "debug", skip_all)]
	pub fn execute_batch(&self, sql: &str) -> Result<()> {
		self.conn.lock().execute_batch(sql).map_err(|e| Error::store_with("batch failed", e))
	}

	fn table_names(conn: &Connection) -> Result<Vec<String>> {
		let mut stmt = conn
			.prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
			.map_err(|e| Error::store_with("failed to list tables", e))?;
		let names = stmt
			.query_map([], |row| row.get::<_, String>(0))
			.and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
			.map_err(|e| Error::store_with("failed to list tables", e))?;
		Ok(names)
	}

	fn table_def(conn: &Connection, name: &str) -> Result<TableDef> {
		let mut stmt = conn
			.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
			.map_err(|e| Error::store_with(format!("failed to read columns of {name}"), e))?;
		let columns = stmt
			.query_map(params![name], |row| {
				let column: String = row.get(0)?;
				let declared: String = row.get(1)?;
				Ok(ColumnDef::new(column, column_type(&declared)))
			})
			.and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
			.map_err(|e| Error::store_with(format!("failed to read columns of {name}"), e))?;
		Ok(TableDef::new(name, Schema::new(columns)))
	}

	fn exists(conn: &Connection, name: &str) -> Result<bool> {
		conn.query_row("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1", params![name], |_| Ok(()))
			.optional()
			.map(|found| found.is_some())
			.map_err(|e| Error::store_with(format!("failed to look up table {name}"), e))
	}
}

impl Store for SqliteStore {
	#[instrument(name = "store::sqlite::execute", level = "debug", skip(self, plan), fields(params = plan.params.len()))]
	fn execute(&self, plan: &Plan) -> Result<Frame> {
		debug!(sql = %plan.sql, "executing");

		let conn = self.conn.lock();
		let mut stmt = conn.prepare(&plan.sql).map_err(|e| Error::store_with(format!("failed to prepare: {}", plan.sql), e))?;
		if stmt.column_count() != plan.schema.len() {
			return Err(Error::store(format!(
				"statement returns {} columns, expected {}",
				stmt.column_count(),
				plan.schema.len()
			)));
		}

		let mut rows = stmt
			.query(params_from_iter(plan.params.iter().map(SqlParam)))
			.map_err(|e| Error::store_with("failed to execute", e))?;

		let mut result = Vec::new();
		while let Some(row) = rows.next().map_err(|e| Error::store_with("failed to read row", e))? {
			let mut values = Vec::with_capacity(plan.schema.len());
			for (idx, column) in plan.schema.iter().enumerate() {
				let value = row.get_ref(idx).map_err(|e| Error::store_with("failed to read value", e))?;
				values.push(read_value(value, column.ty, &column.name)?);
			}
			result.push(Row::new(values));
		}

		debug!(rows = result.len(), "executed");
		Frame::new(plan.schema.clone(), result)
	}

	#[instrument(name = "store::sqlite::tables", level = "debug", skip(self))]
	fn tables(&self) -> Result<Vec<TableDef>> {
		let conn = self.conn.lock();
		Self::table_names(&conn)?.iter().map(|name| Self::table_def(&conn, name)).collect()
	}

	#[instrument(name = "store::sqlite::persist", level = "debug", skip(self, frame), fields(rows = frame.len()))]
	fn persist(&self, name: &str, frame: &Frame) -> Result<TableDef> {
		if name.is_empty() {
			return Err(Error::invalid_operation("table name must not be empty"));
		}
		if frame.schema().is_empty() {
			return Err(Error::invalid_operation(format!("cannot create table {name} without columns")));
		}

		let columns: Vec<String> =
			frame.schema().iter().map(|c| format!("{} {}", quote(&c.name), declared_type(c.ty))).collect();
		let create = format!("CREATE TABLE {} ({})", quote(name), columns.join(", "));
		let placeholders = vec!["?"; frame.schema().len()].join(", ");
		let insert = format!("INSERT INTO {} VALUES ({})", quote(name), placeholders);
		debug!(sql = %create, "creating table");

		let mut conn = self.conn.lock();
		let tx = conn.transaction().map_err(|e| Error::store_with("failed to begin transaction", e))?;
		tx.execute(&create, []).map_err(|e| Error::store_with(format!("failed to create table {name}"), e))?;
		{
			let mut stmt = tx.prepare(&insert).map_err(|e| Error::store_with("failed to prepare insert", e))?;
			for row in frame {
				stmt.execute(params_from_iter(row.iter().map(SqlParam)))
					.map_err(|e| Error::store_with(format!("failed to insert into {name}"), e))?;
			}
		}
		tx.commit().map_err(|e| Error::store_with("failed to commit", e))?;

		Ok(TableDef::new(name, frame.schema().clone()))
	}

	#[instrument(name = "store::sqlite::drop_table", level = "debug", skip(self))]
	fn drop_table(&self, name: &str) -> Result<bool> {
		let conn = self.conn.lock();
		if !Self::exists(&conn, name)? {
			return Ok(false);
		}
		conn.execute(&format!("DROP TABLE {}", quote(name)), [])
			.map_err(|e| Error::store_with(format!("failed to drop table {name}"), e))?;
		Ok(true)
	}

	#[instrument(name = "store::sqlite::add_columns", level = "debug", skip(self, change), fields(table = %change.table, columns = change.columns.len()))]
	fn add_columns(&self, change: &AddColumns) -> Result<TableDef> {
		let name = &change.table;
		let mut conn = self.conn.lock();
		if !Self::exists(&conn, name)? {
			return Err(Error::unknown_table(name));
		}

		let tx = conn.transaction().map_err(|e| Error::store_with("failed to begin transaction", e))?;
		for column in &change.columns {
			let alter = format!("ALTER TABLE {} ADD COLUMN {} {}", quote(name), quote(&column.name), declared_type(column.ty));
			debug!(sql = %alter, "adding column");
			tx.execute(&alter, [])
				.map_err(|e| Error::store_with(format!("failed to add column {} to {name}", column.name), e))?;
		}

		debug!(sql = %change.fill.sql, "filling columns");
		let updated = tx
			.execute(&change.fill.sql, params_from_iter(change.fill.params.iter().map(SqlParam)))
			.map_err(|e| Error::store_with(format!("failed to fill new columns of {name}"), e))?;
		let table = Self::table_def(&tx, name)?;
		tx.commit().map_err(|e| Error::store_with("failed to commit", e))?;

		debug!(rows = updated, "columns added");
		Ok(table)
	}
}

#[cfg(test)]
mod tests {
	use dbtable_core::Database;
	use dbtable_query::col;
	use dbtable_testing::tempdir::temp_dir;
	use dbtable_type::{Type, Value};

	use super::*;

	fn seeded() -> SqliteStore {
		let store = SqliteStore::in_memory().unwrap();
		store.execute_batch(
			"CREATE TABLE people (name TEXT, age INTEGER, active BOOLEAN, score REAL);
			 INSERT INTO people VALUES ('Ana', 30, 1, 1.5), ('Bo', 20, 0, NULL), ('Cy', 30, 1, 3.0);",
		)
		.unwrap();
		store
	}

	#[test]
	fn test_tables_map_declared_types() {
		let tables = seeded().tables().unwrap();
		assert_eq!(tables.len(), 1);
		assert_eq!(tables[0].schema.to_string(), "{name: UTF8, age: INT8, active: BOOLEAN, score: FLOAT8}");
	}

	#[test]
	fn test_execute_reads_typed_values() {
		let db = Database::open(seeded()).unwrap();
		let view = db.table("people").unwrap().filter(col("active").eq(true)).unwrap().sort("age", true).unwrap();

		let frame = view.frame().unwrap();
		assert_eq!(frame.len(), 2);
		assert_eq!(frame[0][0], Value::utf8("Ana"));
		assert_eq!(frame[0][2], Value::Boolean(true));
		assert_eq!(frame[1][3], Value::float8(3.0));
	}

	#[test]
	fn test_null_reads_undefined() {
		let db = Database::open(seeded()).unwrap();
		let scores = db.table("people").unwrap().column_values("score").unwrap();
		assert_eq!(scores, vec![Value::float8(1.5), Value::Undefined, Value::float8(3.0)]);
	}

	#[test]
	fn test_persist_and_reload() {
		let store = SqliteStore::in_memory().unwrap();
		let frame = Frame::new(
			Schema::new(vec![ColumnDef::new("flag", Type::Boolean), ColumnDef::new("label", Type::Utf8)]),
			vec![
				Row::new(vec![Value::Boolean(true), Value::utf8("a \"quoted\" label")]),
				Row::new(vec![Value::Boolean(false), Value::Undefined]),
			],
		)
		.unwrap();

		let table = store.persist("flags", &frame).unwrap();
		assert_eq!(store.tables().unwrap(), vec![table.clone()]);

		let plan = dbtable_query::compile(&table, &dbtable_query::Chain::new()).unwrap();
		assert_eq!(store.execute(&plan).unwrap(), frame);
	}

	#[test]
	fn test_persist_existing_table_fails() {
		let store = seeded();
		let frame = Frame::new(Schema::new(vec![ColumnDef::new("x", Type::Int8)]), vec![]).unwrap();
		assert!(matches!(store.persist("people", &frame).unwrap_err(), Error::Store { .. }));
	}

	#[test]
	fn test_persist_without_columns_fails() {
		let store = SqliteStore::in_memory().unwrap();
		assert!(matches!(
			store.persist("empty", &Frame::default()).unwrap_err(),
			Error::InvalidOperation { .. }
		));
	}

	#[test]
	fn test_drop_table() {
		let store = seeded();
		assert!(store.drop_table("people").unwrap());
		assert!(!store.drop_table("people").unwrap());
		assert!(store.tables().unwrap().is_empty());
	}

	#[test]
	fn test_add_columns_fills_every_row() {
		let store = seeded();
		let table = store.tables().unwrap().remove(0);
		let chain = dbtable_query::Chain::new()
			.append(dbtable_query::Operation::Filter(col("age").gt(25)))
			.unwrap()
			.append(dbtable_query::Operation::Derive {
				name: "decade".into(),
				expr: col("age") / 10,
			})
			.unwrap();
		let change = dbtable_query::compile_add_columns(&table, &chain).unwrap().unwrap();

		let extended = store.add_columns(&change).unwrap();
		assert_eq!(extended.schema.to_string(), "{name: UTF8, age: INT8, active: BOOLEAN, score: FLOAT8, decade: INT8}");

		let plan = dbtable_query::compile(&extended, &dbtable_query::Chain::new()).unwrap();
		let decades = store.execute(&plan).unwrap().column("decade").unwrap();
		assert_eq!(decades, vec![Value::int8(3), Value::int8(2), Value::int8(3)]);
	}

	#[test]
	fn test_failed_fill_leaves_table_unchanged() {
		let store = seeded();
		let before = store.tables().unwrap();
		let change = AddColumns {
			table: "people".into(),
			columns: vec![ColumnDef::new("broken", Type::Int8)],
			fill: Plan {
				sql: "UPDATE \"people\" SET \"broken\" = \"missing\"".into(),
				params: vec![],
				schema: Schema::default(),
			},
		};

		assert!(matches!(store.add_columns(&change).unwrap_err(), Error::Store { .. }));
		assert_eq!(store.tables().unwrap(), before);
	}

	#[test]
	fn test_add_columns_to_missing_table() {
		let store = SqliteStore::in_memory().unwrap();
		let change = AddColumns {
			table: "ghosts".into(),
			columns: vec![ColumnDef::new("x", Type::Int8)],
			fill: Plan {
				sql: "UPDATE \"ghosts\" SET \"x\" = 1".into(),
				params: vec![],
				schema: Schema::default(),
			},
		};
		assert!(matches!(store.add_columns(&change).unwrap_err(), Error::UnknownTable { .. }));
	}

	#[test]
	fn test_execute_error_is_store_error() {
		let store = SqliteStore::in_memory().unwrap();
		let table = TableDef::new("missing", Schema::new(vec![ColumnDef::new("x", Type::Int8)]));
		let plan = dbtable_query::compile(&table, &dbtable_query::Chain::new()).unwrap();
		assert!(matches!(store.execute(&plan).unwrap_err(), Error::Store { .. }));
	}

	#[test]
	fn test_file_database_survives_reopen() {
		temp_dir(|dir| {
			let path = dir.join("nested").join("people.db");
			{
				let store = SqliteStore::new(SqliteConfig::file(&path)).unwrap();
				store.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);").unwrap();
			}

			let db = Database::open(SqliteStore::new(SqliteConfig::file(&path)).unwrap()).unwrap();
			assert_eq!(db.table("t").unwrap().column_values("x").unwrap(), vec![Value::int8(7)]);
			Ok(())
		})
		.unwrap();
	}
}
