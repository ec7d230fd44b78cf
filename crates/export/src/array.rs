// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::ops::Index;

use dbtable_type::{ColumnDef, Error, Frame, Result, Row, Schema, Type, Value};

use crate::IntoFrame;

/// Row-major matrix of `f64` with named columns.
///
/// Booleans read as `0.0` / `1.0` and undefined values as `NaN`. Text has no
/// numeric reading, so frames with text columns cannot be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
	columns: Vec<String>,
	rows: usize,
	data: Vec<f64>,
}

impl Array {
	pub fn new(columns: Vec<String>, data: Vec<f64>) -> Result<Self> {
		if columns.is_empty() {
			return Err(Error::invalid_operation("array requires at least one column"));
		}
		if data.len() % columns.len() != 0 {
			return Err(Error::invalid_operation(format!(
				"{} values do not fill rows of {} columns",
				data.len(),
				columns.len()
			)));
		}
		Ok(Self {
			rows: data.len() / columns.len(),
			columns,
			data,
		})
	}

	pub fn from_frame(frame: &Frame) -> Result<Self> {
		let schema = frame.schema();
		if schema.is_empty() {
			return Err(Error::invalid_operation("array requires at least one column"));
		}
		if let Some(text) = schema.iter().find(|c| c.ty == Type::Utf8) {
			return Err(Error::type_mismatch(format!("column '{}' is text and has no numeric value", text.name)));
		}

		let mut data = Vec::with_capacity(frame.len() * schema.len());
		for row in frame {
			for (value, column) in row.iter().zip(schema.iter()) {
				data.push(numeric(value, column)?);
			}
		}

		Ok(Self {
			columns: schema.names().map(str::to_string).collect(),
			rows: frame.len(),
			data,
		})
	}

	/// `(rows, columns)`
	pub fn shape(&self) -> (usize, usize) {
		(self.rows, self.columns.len())
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn get(&self, row: usize, column: usize) -> Option<f64> {
		if column >= self.columns.len() {
			return None;
		}
		self.data.get(row * self.columns.len() + column).copied()
	}

	pub fn row(&self, row: usize) -> Option<&[f64]> {
		let width = self.columns.len();
		self.data.get(row * width..(row + 1) * width)
	}

	pub fn as_slice(&self) -> &[f64] {
		&self.data
	}

	pub fn into_vec(self) -> Vec<f64> {
		self.data
	}
}

fn numeric(value: &Value, column: &ColumnDef) -> Result<f64> {
	match value {
		Value::Undefined => Ok(f64::NAN),
		Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
		Value::Int8(i) => Ok(*i as f64),
		Value::Float8(f) => Ok(f.value()),
		Value::Utf8(_) => Err(Error::type_mismatch(format!(
			"column '{}' holds text and has no numeric value",
			column.name
		))),
	}
}

impl Index<(usize, usize)> for Array {
	type Output = f64;

	fn index(&self, (row, column): (usize, usize)) -> &f64 {
		&self.data[row * self.columns.len() + column]
	}
}

impl IntoFrame for Array {
	/// Every column becomes a float column; `NaN` becomes undefined.
	fn to_frame(&self) -> Result<Frame> {
		let schema: Schema = self.columns.iter().map(|name| ColumnDef::new(name.clone(), Type::Float8)).collect();
		let rows = self
			.data
			.chunks(self.columns.len())
			.map(|chunk| Row::new(chunk.iter().map(|v| Value::float8(*v)).collect()))
			.collect();
		Frame::new(schema, rows)
	}
}
