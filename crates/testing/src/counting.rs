// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use dbtable_core::Store;
use dbtable_query::{AddColumns, Plan};
use dbtable_type::{Frame, Result, TableDef};

/// Wraps a store and counts the plans it executes.
pub struct CountingStore<S> {
	inner: S,
	executed: Arc<AtomicUsize>,
}

impl<S: Store> CountingStore<S> {
	pub fn new(inner: S) -> Self {
		Self {
			inner,
			executed: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Handle to the counter that stays valid after the store is moved
	/// into a database.
	pub fn counter(&self) -> Counter {
		Counter(self.executed.clone())
	}

	pub fn executed(&self) -> usize {
		self.executed.load(Ordering::SeqCst)
	}
}

#[derive(Clone, Debug)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}

impl<S: Store> Store for CountingStore<S> {
	fn execute(&self, plan: &Plan) -> Result<Frame> {
		self.executed.fetch_add(1, Ordering::SeqCst);
		self.inner.execute(plan)
	}

	fn tables(&self) -> Result<Vec<TableDef>> {
		self.inner.tables()
	}

	fn persist(&self, name: &str, frame: &Frame) -> Result<TableDef> {
		self.inner.persist(name, frame)
	}

	fn drop_table(&self, name: &str) -> Result<bool> {
		self.inner.drop_table(name)
	}

	fn add_columns(&self, change: &AddColumns) -> Result<TableDef> {
		self.inner.add_columns(change)
	}
}
