// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared setup for the end-to-end suites.

use dbtable::{Database, Result, SqliteStore};
use dbtable_testing::{
	counting::{Counter, CountingStore},
	fixture::people,
};

/// In-memory database holding the `people` table.
pub fn people_db() -> Result<Database> {
	let db = dbtable::memory()?;
	db.create_table("people", &people()?)?;
	Ok(db)
}

/// Like [`people_db`], with a counter of executed plans.
pub fn counted_people_db() -> Result<(Database, Counter)> {
	let store = CountingStore::new(SqliteStore::in_memory()?);
	let counter = store.counter();
	let db = Database::open(store)?;
	db.create_table("people", &people()?)?;
	Ok((db, counter))
}
