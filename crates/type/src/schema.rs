// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, ops::Deref};

use crate::Type;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDef {
	pub name: String,
	pub ty: Type,
}

impl ColumnDef {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// Ordered list of named, typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<ColumnDef>);

impl Deref for Schema {
	type Target = [ColumnDef];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Schema {
	pub fn new(columns: Vec<ColumnDef>) -> Self {
		Self(columns)
	}

	pub fn find(&self, name: &str) -> Option<&ColumnDef> {
		self.0.iter().find(|c| c.name == name)
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.0.iter().position(|c| c.name == name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|c| c.name.as_str())
	}

	pub fn push(&mut self, column: ColumnDef) {
		self.0.push(column);
	}
}

impl FromIterator<ColumnDef> for Schema {
	fn from_iter<I: IntoIterator<Item = ColumnDef>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Schema {
	type Item = &'a ColumnDef;
	type IntoIter = std::slice::Iter<'a, ColumnDef>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl fmt::Display for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.0.iter().map(|c| format!("{}: {}", c.name, c.ty)).collect();
		write!(f, "{{{}}}", parts.join(", "))
	}
}

/// A named table in the backing store together with its column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
	pub name: String,
	pub schema: Schema,
}

impl TableDef {
	pub fn new(name: impl Into<String>, schema: Schema) -> Self {
		Self {
			name: name.into(),
			schema,
		}
	}
}
