// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable_type::{ColumnDef, Frame, Result, Row, Schema, Type, Value};

/// `people(name text, age int)` with Ana 30, Bo 20, Cy 30.
pub fn people() -> Result<Frame> {
	frame(
		&[("name", Type::Utf8), ("age", Type::Int8)],
		vec![
			vec![Value::utf8("Ana"), Value::int8(30)],
			vec![Value::utf8("Bo"), Value::int8(20)],
			vec![Value::utf8("Cy"), Value::int8(30)],
		],
	)
}

pub fn frame(columns: &[(&str, Type)], rows: Vec<Vec<Value>>) -> Result<Frame> {
	let schema = columns.iter().map(|(name, ty)| ColumnDef::new(*name, *ty)).collect::<Schema>();
	Frame::new(schema, rows.into_iter().map(Row::new).collect())
}
