// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

mod ordered_f64;
mod r#type;

pub use ordered_f64::{OrderedF64, OrderedFloatError};
pub use r#type::Type;

/// A single cell value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text.
	Utf8(String),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	/// NaN has no ordered representation and becomes `Undefined`.
	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Numeric view of the value; integers widen to floats.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int8(i) => Some(*i as f64),
			Value::Float8(f) => Some(f.value()),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(s) => Some(s.as_str()),
			_ => None,
		}
	}
}

impl PartialOrd for Value {
	/// Values of the same kind order naturally and `Undefined` sorts first.
	/// Values of different kinds are unordered.
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Value::Undefined, Value::Undefined) => Some(Ordering::Equal),
			(Value::Undefined, _) => Some(Ordering::Less),
			(_, Value::Undefined) => Some(Ordering::Greater),
			(Value::Boolean(l), Value::Boolean(r)) => l.partial_cmp(r),
			(Value::Int8(l), Value::Int8(r)) => l.partial_cmp(r),
			(Value::Float8(l), Value::Float8(r)) => l.partial_cmp(r),
			(Value::Utf8(l), Value::Utf8(r)) => l.partial_cmp(r),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int8(value) => Display::fmt(value, f),
			Value::Float8(value) => Display::fmt(value, f),
			Value::Utf8(value) => Display::fmt(value, f),
			Value::Undefined => f.write_str("undefined"),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int8(v as i64)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Undefined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_nan_is_undefined() {
		assert_eq!(Value::float8(f64::NAN), Value::Undefined);
	}

	#[test]
	fn test_same_kind_ordering() {
		assert_eq!(Value::int8(3).partial_cmp(&Value::int8(2)), Some(Ordering::Greater));
		assert_eq!(Value::float8(3.0).partial_cmp(&Value::float8(3.0)), Some(Ordering::Equal));
	}

	#[test]
	fn test_undefined_sorts_first() {
		assert!(Value::Undefined < Value::int8(-100));
		assert!(Value::utf8("a") > Value::Undefined);
	}

	#[test]
	fn test_different_kinds_are_unordered() {
		assert_eq!(Value::utf8("1").partial_cmp(&Value::int8(1)), None);
		assert_eq!(Value::int8(1).partial_cmp(&Value::float8(1.0)), None);
	}

	#[test]
	fn test_from_option() {
		assert_eq!(Value::from(Some(4i64)), Value::Int8(4));
		assert_eq!(Value::from(None::<&str>), Value::Undefined);
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::bool(true).to_string(), "true");
		assert_eq!(Value::float8(1.5).to_string(), "1.5");
		assert_eq!(Value::Undefined.to_string(), "undefined");
	}
}
