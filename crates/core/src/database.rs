// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dbtable_type::{Error, Frame, Result, TableDef};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::{LazyView, Store};

/// Table definitions by name, shared with the views a database hands out
/// so tables they write are visible to later lookups.
pub(crate) type TableCatalog = Arc<RwLock<IndexMap<String, Arc<TableDef>>>>;

/// Entry point over a store: looks up tables and hands out views.
pub struct Database {
	store: Arc<dyn Store>,
	catalog: TableCatalog,
}

impl Database {
	pub fn open(store: impl Store + 'static) -> Result<Self> {
		Self::from_store(Arc::new(store))
	}

	#[instrument(name = "core::database::open", level = "debug", skip(store))]
	pub fn from_store(store: Arc<dyn Store>) -> Result<Self> {
		let db = Self {
			store,
			catalog: Arc::new(RwLock::new(IndexMap::new())),
		};
		db.refresh()?;
		Ok(db)
	}

	pub fn store(&self) -> &Arc<dyn Store> {
		&self.store
	}

	/// Reloads the table catalog from the store.
	#[instrument(name = "core::database::refresh", level = "debug", skip(self))]
	pub fn refresh(&self) -> Result<()> {
		let tables = self.store.tables()?;
		debug!(tables = tables.len(), "catalog loaded");

		let mut catalog = self.catalog.write();
		catalog.clear();
		for table in tables {
			catalog.insert(table.name.clone(), Arc::new(table));
		}
		Ok(())
	}

	/// Names of the tables in the store.
	pub fn tables(&self) -> Result<Vec<String>> {
		self.refresh()?;
		Ok(self.catalog.read().keys().cloned().collect())
	}

	pub fn schema(&self, name: &str) -> Result<Arc<TableDef>> {
		if let Some(table) = self.catalog.read().get(name) {
			return Ok(table.clone());
		}

		// tables may have been created behind our back
		self.refresh()?;
		self.catalog.read().get(name).cloned().ok_or_else(|| Error::unknown_table(name))
	}

	/// A view over every row and column of table `name`.
	pub fn table(&self, name: &str) -> Result<LazyView> {
		Ok(self.view(self.schema(name)?))
	}

	/// Stores `frame` as a new table and returns a view over it.
	#[instrument(name = "core::database::create_table", level = "debug", skip(self, frame), fields(rows = frame.len()))]
	pub fn create_table(&self, name: &str, frame: &Frame) -> Result<LazyView> {
		let table = Arc::new(self.store.persist(name, frame)?);
		self.catalog.write().insert(table.name.clone(), table.clone());
		Ok(self.view(table))
	}

	fn view(&self, table: Arc<TableDef>) -> LazyView {
		LazyView::new(self.store.clone(), table).with_catalog(self.catalog.clone())
	}

	#[instrument(name = "core::database::drop_table", level = "debug", skip(self))]
	pub fn drop_table(&self, name: &str) -> Result<bool> {
		let dropped = self.store.drop_table(name)?;
		self.catalog.write().shift_remove(name);
		Ok(dropped)
	}
}
