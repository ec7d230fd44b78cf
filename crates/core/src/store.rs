// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dbtable_query::{AddColumns, Plan};
use dbtable_type::{Frame, Result, TableDef};

/// The relational store views are materialized against.
///
/// Implementations must be safe to share between threads; views hold the
/// store behind an `Arc` and may materialize concurrently.
pub trait Store: Send + Sync {
	/// Runs a compiled plan and returns its rows typed by `plan.schema`.
	fn execute(&self, plan: &Plan) -> Result<Frame>;

	/// Every table in the store with its columns.
	fn tables(&self) -> Result<Vec<TableDef>>;

	/// Creates table `name` holding `frame`. Fails if the table exists.
	fn persist(&self, name: &str, frame: &Frame) -> Result<TableDef>;

	/// Returns false when there was no such table.
	fn drop_table(&self, name: &str) -> Result<bool>;

	/// Adds `change.columns` to an existing table and fills them by running
	/// `change.fill`, all or nothing. Returns the extended table.
	fn add_columns(&self, change: &AddColumns) -> Result<TableDef>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
	fn execute(&self, plan: &Plan) -> Result<Frame> {
		(**self).execute(plan)
	}

	fn tables(&self) -> Result<Vec<TableDef>> {
		(**self).tables()
	}

	fn persist(&self, name: &str, frame: &Frame) -> Result<TableDef> {
		(**self).persist(name, frame)
	}

	fn drop_table(&self, name: &str) -> Result<bool> {
		(**self).drop_table(name)
	}

	fn add_columns(&self, change: &AddColumns) -> Result<TableDef> {
		(**self).add_columns(change)
	}
}
