// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use dbtable_query::{
	Aggregate, Chain, Expr, Operation, Plan, SortDirection, col, compile, compile_add_columns, compile_aggregate,
	visible_schema,
};
use dbtable_type::{Error, Frame, Result, Row, Schema, TableDef, Value};
use once_cell::sync::OnceCell;
use rand::{Rng, seq::index};
use tracing::{debug, instrument, trace};

use crate::{Store, database::TableCatalog};

/// A deferred query over one table of a store.
///
/// Every chainable operation returns a new view with the operation appended
/// and an empty cache; nothing is read from the store until the rows are
/// needed. The first materialization compiles the chain into a single plan,
/// executes it once and caches the rows. A failed materialization leaves the
/// cache empty, so the call can be retried.
#[derive(Clone)]
pub struct LazyView {
	store: Arc<dyn Store>,
	table: Arc<TableDef>,
	chain: Chain,
	cache: OnceCell<Arc<Frame>>,
	catalog: Option<TableCatalog>,
}

impl LazyView {
	pub fn new(store: Arc<dyn Store>, table: impl Into<Arc<TableDef>>) -> Self {
		Self {
			store,
			table: table.into(),
			chain: Chain::new(),
			cache: OnceCell::new(),
			catalog: None,
		}
	}

	pub(crate) fn with_catalog(mut self, catalog: TableCatalog) -> Self {
		self.catalog = Some(catalog);
		self
	}

	/// A fresh view over `table` that shares this view's store and catalog.
	fn over(&self, table: TableDef) -> LazyView {
		let table = Arc::new(table);
		if let Some(catalog) = &self.catalog {
			catalog.write().insert(table.name.clone(), table.clone());
		}
		LazyView {
			store: self.store.clone(),
			table,
			chain: Chain::new(),
			cache: OnceCell::new(),
			catalog: self.catalog.clone(),
		}
	}

	/// Name of the base table.
	pub fn name(&self) -> &str {
		&self.table.name
	}

	pub fn table(&self) -> &TableDef {
		&self.table
	}

	pub fn chain(&self) -> &Chain {
		&self.chain
	}

	/// True when both views read the same table of the same store.
	pub fn same_source(&self, other: &LazyView) -> bool {
		Arc::ptr_eq(&self.store, &other.store) && self.table.name == other.table.name
	}

	pub fn is_cached(&self) -> bool {
		self.cache.get().is_some()
	}

	fn extend(&self, op: Operation) -> Result<LazyView> {
		Ok(LazyView {
			store: self.store.clone(),
			table: self.table.clone(),
			chain: self.chain.append(op)?,
			cache: OnceCell::new(),
			catalog: self.catalog.clone(),
		})
	}

	pub fn select<I, S>(&self, names: I) -> Result<LazyView>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extend(Operation::Project(names.into_iter().map(Into::into).collect()))
	}

	pub fn drop<I, S>(&self, names: I) -> Result<LazyView>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extend(Operation::Drop(names.into_iter().map(Into::into).collect()))
	}

	pub fn filter(&self, predicate: Expr) -> Result<LazyView> {
		self.extend(Operation::Filter(predicate))
	}

	/// Adds column `name`, or replaces it when it is already visible.
	pub fn derive(&self, name: impl Into<String>, expr: impl Into<Expr>) -> Result<LazyView> {
		self.extend(Operation::Derive {
			name: name.into(),
			expr: expr.into(),
		})
	}

	/// Orders by `key`. Later sorts break ties left by earlier ones.
	pub fn sort(&self, key: impl Into<String>, descending: bool) -> Result<LazyView> {
		self.extend(Operation::Sort {
			key: key.into(),
			direction: SortDirection::descending(descending),
		})
	}

	pub fn group(&self, key: Expr) -> Result<LazyView> {
		self.extend(Operation::Group(key))
	}

	pub fn take(&self, n: usize) -> Result<LazyView> {
		self.extend(Operation::Take(n))
	}

	/// Expression referencing a visible column, checked against the
	/// current visible schema.
	pub fn column(&self, name: &str) -> Result<Expr> {
		let schema = self.columns()?;
		if schema.find(name).is_none() {
			return Err(Error::unknown_column(name, schema.names()));
		}
		Ok(col(name))
	}

	/// Visible columns after the whole chain. Does not touch the store.
	pub fn columns(&self) -> Result<Schema> {
		visible_schema(&self.table, &self.chain)
	}

	pub fn plan(&self) -> Result<Plan> {
		compile(&self.table, &self.chain)
	}

	/// The materialized rows, executing the plan on first use.
	#[instrument(name = "core::view::frame", level = "debug", skip(self), fields(table = %self.table.name, operations = self.chain.len()))]
	pub fn frame(&self) -> Result<Arc<Frame>> {
		if let Some(frame) = self.cache.get() {
			trace!("cache hit");
			return Ok(frame.clone());
		}

		self.cache
			.get_or_try_init(|| {
				let plan = self.plan()?;
				let frame = self.store.execute(&plan)?;
				debug!(rows = frame.len(), "materialized");
				Ok::<_, Error>(Arc::new(frame))
			})
			.cloned()
	}

	pub fn rows(&self) -> Result<Rows> {
		Ok(Rows {
			frame: self.frame()?,
			index: 0,
		})
	}

	pub fn len(&self) -> Result<usize> {
		Ok(self.frame()?.len())
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.frame()?.is_empty())
	}

	pub fn row(&self, index: usize) -> Result<Option<Row>> {
		Ok(self.frame()?.row(index).cloned())
	}

	/// Values of one visible column, in row order.
	pub fn column_values(&self, name: &str) -> Result<Vec<Value>> {
		self.frame()?.column(name)
	}

	/// Computes `aggregates` per group, or over all rows when the view is
	/// not grouped. Executes on every call.
	#[instrument(name = "core::view::aggregate", level = "debug", skip(self, aggregates), fields(table = %self.table.name, aggregates = aggregates.len()))]
	pub fn aggregate(&self, aggregates: &[Aggregate]) -> Result<Frame> {
		let plan = compile_aggregate(&self.table, &self.chain, aggregates)?;
		self.store.execute(&plan)
	}

	/// Up to `n` distinct rows drawn at random, in view order.
	pub fn sample(&self, n: usize) -> Result<Vec<Row>> {
		self.sample_with(n, &mut rand::rng())
	}

	pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Row>> {
		let frame = self.frame()?;
		if frame.len() <= n {
			return Ok(frame.rows().to_vec());
		}

		let mut picked = index::sample(rng, frame.len(), n).into_vec();
		picked.sort_unstable();
		Ok(picked.into_iter().map(|idx| frame[idx].clone()).collect())
	}

	/// First `n` rows rendered as a text table under a short header.
	#[instrument(name = "core::view::preview", level = "debug", skip(self), fields(table = %self.table.name))]
	pub fn preview(&self, n: usize) -> Result<String> {
		let frame = self.frame()?;
		let head = frame.head(n);

		Ok(format!("Table {}: showing {} of {} rows\n{}", self.table.name, head.len(), frame.len(), head))
	}

	/// Materializes this view into a new table and returns a view over it.
	#[instrument(name = "core::view::save_as", level = "debug", skip(self), fields(table = %self.table.name))]
	pub fn save_as(&self, name: &str) -> Result<LazyView> {
		let frame = self.frame()?;
		let table = self.store.persist(name, &frame)?;
		Ok(self.over(table))
	}

	/// Writes the columns this view derives into its base table, computed
	/// for every stored row, and returns a view over the extended table.
	/// Filters, sorts and takes do not restrict which rows are filled.
	/// Grouped views, views that rewrite a stored column and views that
	/// filter or sort after a take fail with `InvalidOperation`; use
	/// [`save_as`](Self::save_as) for those.
	#[instrument(name = "core::view::save", level = "debug", skip(self), fields(table = %self.table.name, operations = self.chain.len()))]
	pub fn save(&self) -> Result<LazyView> {
		match compile_add_columns(&self.table, &self.chain)? {
			Some(change) => {
				let table = self.store.add_columns(&change)?;
				debug!(columns = change.columns.len(), "saved derived columns");
				Ok(self.over(table))
			}
			None => {
				trace!("nothing to save");
				Ok(self.over(self.table.as_ref().clone()))
			}
		}
	}
}

impl Debug for LazyView {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyView")
			.field("table", &self.table.name)
			.field("chain", &self.chain.to_string())
			.field("cached", &self.is_cached())
			.finish()
	}
}

/// Owning iterator over the rows of a materialized view.
pub struct Rows {
	frame: Arc<Frame>,
	index: usize,
}

impl Iterator for Rows {
	type Item = Row;

	fn next(&mut self) -> Option<Row> {
		let row = self.frame.row(self.index)?.clone();
		self.index += 1;
		Some(row)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.frame.len().saturating_sub(self.index);
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for Rows {}
