// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashSet,
	fmt::{self, Display, Formatter},
	sync::Arc,
};

use dbtable_type::{Error, Result};

use crate::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}

impl SortDirection {
	pub fn descending(descending: bool) -> Self {
		if descending {
			SortDirection::Desc
		} else {
			SortDirection::Asc
		}
	}
}

impl Display for SortDirection {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			SortDirection::Asc => f.write_str("asc"),
			SortDirection::Desc => f.write_str("desc"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
	/// Narrow the visible columns to these names, in this order.
	Project(Vec<String>),
	/// Remove these names from the visible columns.
	Drop(Vec<String>),
	Filter(Expr),
	/// Add or replace a visible column.
	Derive {
		name: String,
		expr: Expr,
	},
	Sort {
		key: String,
		direction: SortDirection,
	},
	Group(Expr),
	Take(usize),
}

impl Operation {
	/// Shape checks that need no schema. Everything else waits for compile.
	pub fn validate(&self) -> Result<()> {
		match self {
			Operation::Project(names) => {
				if names.is_empty() {
					return Err(Error::invalid_operation("select requires at least one column"));
				}
				validate_names("select", names)
			}
			Operation::Drop(names) => validate_names("drop", names),
			Operation::Filter(expr) | Operation::Group(expr) => expr.validate(),
			Operation::Derive {
				name,
				expr,
			} => {
				if name.is_empty() {
					return Err(Error::invalid_operation("derived column requires a name"));
				}
				expr.validate()
			}
			Operation::Sort {
				key,
				..
			} => {
				if key.is_empty() {
					return Err(Error::invalid_operation("sort requires a key column"));
				}
				Ok(())
			}
			Operation::Take(_) => Ok(()),
		}
	}
}

fn validate_names(kind: &str, names: &[String]) -> Result<()> {
	let mut seen = HashSet::new();
	for name in names {
		if name.is_empty() {
			return Err(Error::invalid_operation(format!("{kind} contains an empty column name")));
		}
		if !seen.insert(name.as_str()) {
			return Err(Error::invalid_operation(format!("{kind} names column '{name}' twice")));
		}
	}
	Ok(())
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Operation::Project(names) => write!(f, "select [{}]", names.join(", ")),
			Operation::Drop(names) => write!(f, "drop [{}]", names.join(", ")),
			Operation::Filter(expr) => write!(f, "filter {expr}"),
			Operation::Derive {
				name,
				expr,
			} => write!(f, "derive {name} = {expr}"),
			Operation::Sort {
				key,
				direction,
			} => write!(f, "sort {key} {direction}"),
			Operation::Group(expr) => write!(f, "group {expr}"),
			Operation::Take(n) => write!(f, "take {n}"),
		}
	}
}

#[derive(Debug)]
struct Link {
	op: Operation,
	prev: Option<Arc<Link>>,
}

impl Drop for Link {
	// unlink iteratively so long chains do not recurse on drop
	fn drop(&mut self) {
		let mut prev = self.prev.take();
		while let Some(link) = prev {
			match Arc::try_unwrap(link) {
				Ok(mut link) => prev = link.prev.take(),
				Err(_) => break,
			}
		}
	}
}

/// An immutable, append-only list of operations.
///
/// Appending returns a new chain that shares every existing link with the
/// chain it was built from; the original is never touched, so two views can
/// branch off a common prefix safely.
#[derive(Debug, Clone, Default)]
pub struct Chain {
	tail: Option<Arc<Link>>,
	len: usize,
}

impl Chain {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&self, op: Operation) -> Result<Chain> {
		op.validate()?;
		Ok(Chain {
			tail: Some(Arc::new(Link {
				op,
				prev: self.tail.clone(),
			})),
			len: self.len + 1,
		})
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Operations in append order.
	pub fn operations(&self) -> Vec<&Operation> {
		let mut ops = Vec::with_capacity(self.len);
		let mut cursor = self.tail.as_deref();
		while let Some(link) = cursor {
			ops.push(&link.op);
			cursor = link.prev.as_deref();
		}
		ops.reverse();
		ops
	}
}

impl PartialEq for Chain {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len && self.operations() == other.operations()
	}
}

impl Display for Chain {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let ops: Vec<String> = self.operations().iter().map(|op| op.to_string()).collect();
		f.write_str(&ops.join(" | "))
	}
}
