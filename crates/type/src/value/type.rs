// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

/// All value types a column can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text.
	Utf8,
	/// Value is not defined (think null in common programming languages)
	Undefined,
}

impl Type {
	pub fn is_numeric(&self) -> bool {
		matches!(self, Type::Int8 | Type::Float8)
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Type::Undefined)
	}

	/// The wider of two numeric types. `Undefined` defers to the other side.
	pub fn promote(self, other: Type) -> Type {
		match (self, other) {
			(Type::Undefined, t) | (t, Type::Undefined) => t,
			(Type::Float8, _) | (_, Type::Float8) => Type::Float8,
			(t, _) => t,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Undefined => f.write_str("UNDEFINED"),
		}
	}
}
