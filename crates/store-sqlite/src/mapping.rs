// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable_type::{Error, Result, Type, Value};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

/// Column type for a declared SQLite type, following SQLite's affinity
/// rules. An empty declaration reads as integer.
pub(crate) fn column_type(declared: &str) -> Type {
	let declared = declared.to_ascii_uppercase();
	let has = |needle: &str| declared.contains(needle);

	if declared.trim().is_empty() {
		Type::Int8
	} else if has("BOOL") {
		Type::Boolean
	} else if has("INT") {
		Type::Int8
	} else if has("CHAR") || has("CLOB") || has("TEXT") {
		Type::Utf8
	} else if has("REAL") || has("FLOA") || has("DOUB") || has("NUM") || has("DEC") {
		Type::Float8
	} else {
		Type::Undefined
	}
}

/// Declared type used when creating a column.
pub(crate) fn declared_type(ty: Type) -> &'static str {
	match ty {
		Type::Boolean => "BOOLEAN",
		Type::Int8 => "INTEGER",
		Type::Float8 => "REAL",
		Type::Utf8 => "TEXT",
		Type::Undefined => "BLOB",
	}
}

/// Reads one SQLite value as a value of the expected column type.
pub(crate) fn read_value(value: ValueRef<'_>, ty: Type, column: &str) -> Result<Value> {
	Ok(match value {
		ValueRef::Null => Value::Undefined,
		ValueRef::Integer(i) => match ty {
			Type::Boolean => Value::Boolean(i != 0),
			Type::Float8 => Value::float8(i as f64),
			_ => Value::Int8(i),
		},
		ValueRef::Real(f) => match ty {
			Type::Boolean => Value::Boolean(f != 0.0),
			_ => Value::float8(f),
		},
		ValueRef::Text(bytes) => {
			let text = std::str::from_utf8(bytes)
				.map_err(|e| Error::store_with(format!("column '{column}' holds invalid UTF-8"), e))?;
			Value::utf8(text)
		}
		ValueRef::Blob(_) => {
			return Err(Error::store(format!("column '{column}' holds a blob, which has no value mapping")));
		}
	})
}

/// Binds a value as a statement parameter. Booleans bind as 0 / 1.
pub(crate) struct SqlParam<'a>(pub(crate) &'a Value);

impl ToSql for SqlParam<'_> {
	fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
		Ok(match self.0 {
			Value::Undefined => ToSqlOutput::Borrowed(ValueRef::Null),
			Value::Boolean(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
			Value::Int8(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
			Value::Float8(f) => ToSqlOutput::Borrowed(ValueRef::Real(f.value())),
			Value::Utf8(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_column_type() {
		assert_eq!(column_type("BOOLEAN"), Type::Boolean);
		assert_eq!(column_type("integer"), Type::Int8);
		assert_eq!(column_type("BIGINT"), Type::Int8);
		assert_eq!(column_type("VARCHAR(20)"), Type::Utf8);
		assert_eq!(column_type("TEXT"), Type::Utf8);
		assert_eq!(column_type("DOUBLE PRECISION"), Type::Float8);
		assert_eq!(column_type("NUMERIC"), Type::Float8);
		assert_eq!(column_type("DECIMAL(10,2)"), Type::Float8);
		assert_eq!(column_type(""), Type::Int8);
		assert_eq!(column_type("BLOB"), Type::Undefined);
	}

	#[test]
	fn test_declared_types_map_back() {
		for ty in [Type::Boolean, Type::Int8, Type::Float8, Type::Utf8, Type::Undefined] {
			assert_eq!(column_type(declared_type(ty)), ty);
		}
	}

	#[test]
	fn test_read_value() {
		assert_eq!(read_value(ValueRef::Integer(1), Type::Boolean, "a").unwrap(), Value::Boolean(true));
		assert_eq!(read_value(ValueRef::Integer(3), Type::Float8, "a").unwrap(), Value::float8(3.0));
		assert_eq!(read_value(ValueRef::Real(2.5), Type::Int8, "a").unwrap(), Value::float8(2.5));
		assert_eq!(read_value(ValueRef::Null, Type::Utf8, "a").unwrap(), Value::Undefined);
		assert_eq!(read_value(ValueRef::Text(b"Ana"), Type::Utf8, "a").unwrap(), Value::utf8("Ana"));
		assert!(matches!(read_value(ValueRef::Blob(&[1]), Type::Undefined, "a"), Err(Error::Store { .. })));
	}
}
