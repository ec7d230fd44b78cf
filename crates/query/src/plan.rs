// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use dbtable_type::{ColumnDef, Schema, Value};

/// A single parameterised statement ready for the store.
///
/// `params` bind to the `?` placeholders of `sql` in order of appearance and
/// `schema` describes the columns the statement returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
	pub sql: String,
	pub params: Vec<Value>,
	pub schema: Schema,
}

impl Plan {
	pub fn new(sql: String, params: Vec<Value>, schema: Schema) -> Self {
		Self {
			sql,
			params,
			schema,
		}
	}
}

/// New columns for a stored table and the `UPDATE` that fills them.
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumns {
	pub table: String,
	pub columns: Vec<ColumnDef>,
	pub fill: Plan,
}

impl Display for Plan {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.sql)
	}
}
