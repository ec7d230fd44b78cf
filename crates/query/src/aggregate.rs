// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use dbtable_type::{Error, Result};

/// Summary computed over the rows of a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Aggregate {
	/// `None` counts rows, `Some(column)` counts defined values.
	Count(Option<String>),
	Sum(String),
	Avg(String),
	Min(String),
	Max(String),
}

impl Aggregate {
	pub fn count() -> Self {
		Aggregate::Count(None)
	}

	pub fn count_of(column: impl Into<String>) -> Self {
		Aggregate::Count(Some(column.into()))
	}

	pub fn sum(column: impl Into<String>) -> Self {
		Aggregate::Sum(column.into())
	}

	pub fn avg(column: impl Into<String>) -> Self {
		Aggregate::Avg(column.into())
	}

	pub fn min(column: impl Into<String>) -> Self {
		Aggregate::Min(column.into())
	}

	pub fn max(column: impl Into<String>) -> Self {
		Aggregate::Max(column.into())
	}

	pub fn function(&self) -> &'static str {
		match self {
			Aggregate::Count(_) => "count",
			Aggregate::Sum(_) => "sum",
			Aggregate::Avg(_) => "avg",
			Aggregate::Min(_) => "min",
			Aggregate::Max(_) => "max",
		}
	}

	pub fn column(&self) -> Option<&str> {
		match self {
			Aggregate::Count(column) => column.as_deref(),
			Aggregate::Sum(column)
			| Aggregate::Avg(column)
			| Aggregate::Min(column)
			| Aggregate::Max(column) => Some(column.as_str()),
		}
	}

	/// Output column name, e.g. `count(*)` or `sum(age)`.
	pub fn display_name(&self) -> String {
		format!("{}({})", self.function(), self.column().unwrap_or("*"))
	}

	pub fn validate(&self) -> Result<()> {
		match self.column() {
			Some("") => Err(Error::invalid_operation(format!("{} requires a column name", self.function()))),
			_ => Ok(()),
		}
	}
}

impl Display for Aggregate {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.display_name())
	}
}
