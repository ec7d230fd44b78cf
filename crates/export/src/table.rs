// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable_type::{ColumnDef, Error, Frame, Result, Row, Schema, Type, Value};
use serde_json::{Map, Number, Value as Json};

use crate::IntoFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
	pub name: String,
	pub data: ColumnData,
}

/// Values of one column. Typed variants carry a validity vector; an
/// invalid slot holds a default value and reads as undefined.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
	// value, is_valid
	Bool(Vec<bool>, Vec<bool>),
	Int8(Vec<i64>, Vec<bool>),
	Float8(Vec<f64>, Vec<bool>),
	Utf8(Vec<String>, Vec<bool>),

	// column without a declared type, values kept as they are
	Undefined(Vec<Value>),
}

impl ColumnData {
	fn with_capacity(ty: Type, capacity: usize) -> Self {
		match ty {
			Type::Boolean => ColumnData::Bool(Vec::with_capacity(capacity), Vec::with_capacity(capacity)),
			Type::Int8 => ColumnData::Int8(Vec::with_capacity(capacity), Vec::with_capacity(capacity)),
			Type::Float8 => ColumnData::Float8(Vec::with_capacity(capacity), Vec::with_capacity(capacity)),
			Type::Utf8 => ColumnData::Utf8(Vec::with_capacity(capacity), Vec::with_capacity(capacity)),
			Type::Undefined => ColumnData::Undefined(Vec::with_capacity(capacity)),
		}
	}

	fn push(&mut self, value: &Value, column: &str) -> Result<()> {
		match (self, value) {
			(ColumnData::Undefined(values), value) => values.push(value.clone()),
			(ColumnData::Bool(values, valid), Value::Undefined) => {
				values.push(false);
				valid.push(false);
			}
			(ColumnData::Int8(values, valid), Value::Undefined) => {
				values.push(0);
				valid.push(false);
			}
			(ColumnData::Float8(values, valid), Value::Undefined) => {
				values.push(0.0);
				valid.push(false);
			}
			(ColumnData::Utf8(values, valid), Value::Undefined) => {
				values.push(String::new());
				valid.push(false);
			}
			(ColumnData::Bool(values, valid), Value::Boolean(b)) => {
				values.push(*b);
				valid.push(true);
			}
			(ColumnData::Int8(values, valid), Value::Int8(i)) => {
				values.push(*i);
				valid.push(true);
			}
			(ColumnData::Float8(values, valid), Value::Float8(f)) => {
				values.push(f.value());
				valid.push(true);
			}
			(ColumnData::Float8(values, valid), Value::Int8(i)) => {
				values.push(*i as f64);
				valid.push(true);
			}
			(ColumnData::Utf8(values, valid), Value::Utf8(s)) => {
				values.push(s.clone());
				valid.push(true);
			}
			(data, value) => {
				return Err(Error::type_mismatch(format!(
					"column '{column}' of type {} holds {} value {value}",
					data.get_type(),
					value.get_type()
				)));
			}
		}
		Ok(())
	}

	pub fn get_type(&self) -> Type {
		match self {
			ColumnData::Bool(..) => Type::Boolean,
			ColumnData::Int8(..) => Type::Int8,
			ColumnData::Float8(..) => Type::Float8,
			ColumnData::Utf8(..) => Type::Utf8,
			ColumnData::Undefined(_) => Type::Undefined,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			ColumnData::Bool(_, valid)
			| ColumnData::Int8(_, valid)
			| ColumnData::Float8(_, valid)
			| ColumnData::Utf8(_, valid) => valid.len(),
			ColumnData::Undefined(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get(&self, index: usize) -> Option<Value> {
		if index >= self.len() {
			return None;
		}
		Some(match self {
			ColumnData::Bool(values, valid) if valid[index] => Value::Boolean(values[index]),
			ColumnData::Int8(values, valid) if valid[index] => Value::Int8(values[index]),
			ColumnData::Float8(values, valid) if valid[index] => Value::float8(values[index]),
			ColumnData::Utf8(values, valid) if valid[index] => Value::Utf8(values[index].clone()),
			ColumnData::Undefined(values) => values[index].clone(),
			_ => Value::Undefined,
		})
	}
}

/// Column-major table with typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	columns: Vec<Column>,
	rows: usize,
}

impl Table {
	pub fn from_frame(frame: &Frame) -> Result<Self> {
		let mut columns: Vec<Column> = frame
			.schema()
			.iter()
			.map(|c| Column {
				name: c.name.clone(),
				data: ColumnData::with_capacity(c.ty, frame.len()),
			})
			.collect();

		for row in frame {
			for (column, value) in columns.iter_mut().zip(row.iter()) {
				column.data.push(value, &column.name)?;
			}
		}

		Ok(Self {
			columns,
			rows: frame.len(),
		})
	}

	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn len(&self) -> usize {
		self.rows
	}

	pub fn is_empty(&self) -> bool {
		self.rows == 0
	}

	pub fn width(&self) -> usize {
		self.columns.len()
	}

	pub fn schema(&self) -> Schema {
		self.columns.iter().map(|c| ColumnDef::new(c.name.clone(), c.data.get_type())).collect()
	}

	pub fn row(&self, index: usize) -> Option<Row> {
		if index >= self.rows {
			return None;
		}
		Some(Row::new(self.columns.iter().map(|c| c.data.get(index).unwrap_or(Value::Undefined)).collect()))
	}

	/// Rows as JSON objects keyed by column name, in column order.
	pub fn to_json(&self) -> Json {
		let rows = (0..self.rows)
			.map(|idx| {
				let object: Map<String, Json> = self
					.columns
					.iter()
					.map(|c| (c.name.clone(), json(c.data.get(idx).unwrap_or(Value::Undefined))))
					.collect();
				Json::Object(object)
			})
			.collect();
		Json::Array(rows)
	}
}

fn json(value: Value) -> Json {
	match value {
		Value::Undefined => Json::Null,
		Value::Boolean(b) => Json::Bool(b),
		Value::Int8(i) => Json::Number(i.into()),
		Value::Float8(f) => Number::from_f64(f.value()).map(Json::Number).unwrap_or(Json::Null),
		Value::Utf8(s) => Json::String(s),
	}
}

impl IntoFrame for Table {
	fn to_frame(&self) -> Result<Frame> {
		Frame::new(self.schema(), (0..self.rows).filter_map(|idx| self.row(idx)).collect())
	}
}
