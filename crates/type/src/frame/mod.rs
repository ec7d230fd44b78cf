// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::{Deref, Index};

use crate::{Error, Result, Schema, Value};

mod display;

/// One materialized row; values follow the frame's schema order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row(Vec<Value>);

impl Row {
	pub fn new(values: Vec<Value>) -> Self {
		Self(values)
	}
}

impl Deref for Row {
	type Target = [Value];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<Value>> for Row {
	fn from(values: Vec<Value>) -> Self {
		Self(values)
	}
}

/// The materialized (rows, schema) result of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
	schema: Schema,
	rows: Vec<Row>,
}

impl Frame {
	/// Builds a frame, rejecting rows whose arity differs from the schema.
	pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
		if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != schema.len()) {
			return Err(Error::invalid_operation(format!(
				"row {} has {} values but the schema has {} columns",
				idx,
				row.len(),
				schema.len()
			)));
		}
		Ok(Self {
			schema,
			rows,
		})
	}

	pub fn empty(schema: Schema) -> Self {
		Self {
			schema,
			rows: Vec::new(),
		}
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn row(&self, index: usize) -> Option<&Row> {
		self.rows.get(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Row> {
		self.rows.iter()
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.schema.index_of(name)
	}

	/// All values of one column, in row order.
	pub fn column(&self, name: &str) -> Result<Vec<Value>> {
		let idx = self.column_index(name).ok_or_else(|| Error::unknown_column(name, self.schema.names()))?;
		Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
	}

	/// The first `n` rows as a new frame.
	pub fn head(&self, n: usize) -> Frame {
		Frame {
			schema: self.schema.clone(),
			rows: self.rows.iter().take(n).cloned().collect(),
		}
	}
}

impl Index<usize> for Frame {
	type Output = Row;

	fn index(&self, index: usize) -> &Self::Output {
		&self.rows[index]
	}
}

impl<'a> IntoIterator for &'a Frame {
	type Item = &'a Row;
	type IntoIter = std::slice::Iter<'a, Row>;

	fn into_iter(self) -> Self::IntoIter {
		self.rows.iter()
	}
}
