// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::error;

use crate::Type;

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("column '{name}' not found, visible columns: [{visible}]")]
	UnknownColumn {
		name: String,
		visible: String,
	},

	#[error("table '{name}' not found")]
	UnknownTable {
		name: String,
	},

	#[error("type mismatch: {message}")]
	TypeMismatch {
		message: String,
	},

	#[error("invalid operation: {message}")]
	InvalidOperation {
		message: String,
	},

	#[error("store execution failed: {message}")]
	Store {
		message: String,
		#[source]
		source: Option<BoxedSource>,
	},
}

impl Error {
	pub fn unknown_column<'a>(name: impl Into<String>, visible: impl IntoIterator<Item = &'a str>) -> Self {
		Error::UnknownColumn {
			name: name.into(),
			visible: visible.into_iter().collect::<Vec<_>>().join(", "),
		}
	}

	pub fn unknown_table(name: impl Into<String>) -> Self {
		Error::UnknownTable {
			name: name.into(),
		}
	}

	pub fn type_mismatch(message: impl Into<String>) -> Self {
		Error::TypeMismatch {
			message: message.into(),
		}
	}

	/// Operator applied to operand kinds it has no semantics for.
	pub fn operand_mismatch(op: impl AsRef<str>, left: Type, right: Type) -> Self {
		Error::type_mismatch(format!("cannot apply '{}' to {} and {}", op.as_ref(), left, right))
	}

	pub fn invalid_operation(message: impl Into<String>) -> Self {
		Error::InvalidOperation {
			message: message.into(),
		}
	}

	pub fn store(message: impl Into<String>) -> Self {
		Error::Store {
			message: message.into(),
			source: None,
		}
	}

	pub fn store_with<E>(message: impl Into<String>, source: E) -> Self
	where
		E: error::Error + Send + Sync + 'static,
	{
		Error::Store {
			message: message.into(),
			source: Some(Box::new(source)),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as _;

	use super::*;

	#[test]
	fn test_unknown_column_lists_visible() {
		let err = Error::unknown_column("salary", ["name", "age"]);
		assert_eq!(err.to_string(), "column 'salary' not found, visible columns: [name, age]");
	}

	#[test]
	fn test_operand_mismatch_message() {
		let err = Error::operand_mismatch("+", Type::Utf8, Type::Boolean);
		assert_eq!(err.to_string(), "type mismatch: cannot apply '+' to UTF8 and BOOLEAN");
	}

	#[test]
	fn test_store_keeps_source() {
		let io = std::io::Error::other("disk gone");
		let err = Error::store_with("insert failed", io);
		assert_eq!(err.to_string(), "store execution failed: insert failed");
		assert_eq!(err.source().map(|s| s.to_string()), Some("disk gone".to_string()));
	}
}
