// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	ops,
	sync::Arc,
};

use dbtable_type::{Error, Result, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	And,
	Or,
}

impl BinaryOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			BinaryOp::Add => "+",
			BinaryOp::Sub => "-",
			BinaryOp::Mul => "*",
			BinaryOp::Div => "/",
			BinaryOp::Eq => "==",
			BinaryOp::NotEq => "!=",
			BinaryOp::Lt => "<",
			BinaryOp::LtEq => "<=",
			BinaryOp::Gt => ">",
			BinaryOp::GtEq => ">=",
			BinaryOp::And => "and",
			BinaryOp::Or => "or",
		}
	}

	pub fn is_arithmetic(&self) -> bool {
		matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
	}

	pub fn is_comparison(&self) -> bool {
		matches!(
			self,
			BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
		)
	}

	pub fn is_logical(&self) -> bool {
		matches!(self, BinaryOp::And | BinaryOp::Or)
	}
}

impl Display for BinaryOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

/// An immutable column expression tree.
///
/// Building an expression never looks at data: column names are checked and
/// operand types inferred only when a chain is compiled against a schema.
/// Subtrees are reference counted, so cloning and composing is cheap and
/// existing expressions are never modified.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Column(String),
	Literal(Value),
	Binary {
		op: BinaryOp,
		left: Arc<Expr>,
		right: Arc<Expr>,
	},
}

/// Reference to a column of the current view.
pub fn col(name: impl Into<String>) -> Expr {
	Expr::Column(name.into())
}

pub fn lit(value: impl Into<Value>) -> Expr {
	Expr::Literal(value.into())
}

pub fn add(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
	Expr::binary(BinaryOp::Add, left, right)
}

pub fn sub(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
	Expr::binary(BinaryOp::Sub, left, right)
}

pub fn mul(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
	Expr::binary(BinaryOp::Mul, left, right)
}

pub fn div(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
	Expr::binary(BinaryOp::Div, left, right)
}

impl Expr {
	pub fn column(name: impl Into<String>) -> Self {
		Expr::Column(name.into())
	}

	pub fn literal(value: impl Into<Value>) -> Self {
		Expr::Literal(value.into())
	}

	pub fn binary(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
		Expr::Binary {
			op,
			left: Arc::new(left.into()),
			right: Arc::new(right.into()),
		}
	}

	/// Create a new predicate `self == other`
	pub fn eq(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::Eq, self, other)
	}

	/// Create a new predicate `self != other`
	pub fn ne(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::NotEq, self, other)
	}

	/// Create a new predicate `self < other`
	pub fn lt(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::Lt, self, other)
	}

	/// Create a new predicate `self <= other`
	pub fn le(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::LtEq, self, other)
	}

	/// Create a new predicate `self > other`
	pub fn gt(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::Gt, self, other)
	}

	/// Create a new predicate `self >= other`
	pub fn ge(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::GtEq, self, other)
	}

	/// Create a new predicate `self AND other`
	pub fn and(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::And, self, other)
	}

	/// Create a new predicate `self OR other`
	pub fn or(self, other: impl Into<Expr>) -> Self {
		Expr::binary(BinaryOp::Or, self, other)
	}

	/// Column names referenced by this expression, first occurrence order.
	pub fn columns(&self) -> Vec<&str> {
		fn walk<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
			match expr {
				Expr::Column(name) => {
					if !out.contains(&name.as_str()) {
						out.push(name.as_str());
					}
				}
				Expr::Literal(_) => {}
				Expr::Binary {
					left,
					right,
					..
				} => {
					walk(left, out);
					walk(right, out);
				}
			}
		}

		let mut out = Vec::new();
		walk(self, &mut out);
		out
	}

	/// Structural checks that need no schema.
	pub fn validate(&self) -> Result<()> {
		if self.columns().iter().any(|name| name.is_empty()) {
			return Err(Error::invalid_operation("column reference with an empty name"));
		}
		Ok(())
	}

	/// Name a result column computed from this expression gets when the
	/// caller does not choose one.
	pub fn display_name(&self) -> String {
		match self {
			Expr::Column(name) => name.clone(),
			_ => self.to_string(),
		}
	}
}

impl Display for Expr {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expr::Column(name) => f.write_str(name),
			Expr::Literal(Value::Utf8(s)) => write!(f, "'{s}'"),
			Expr::Literal(value) => Display::fmt(value, f),
			Expr::Binary {
				op,
				left,
				right,
			} => write!(f, "({left} {op} {right})"),
		}
	}
}

impl From<Value> for Expr {
	fn from(value: Value) -> Self {
		Expr::Literal(value)
	}
}

impl From<&Expr> for Expr {
	fn from(expr: &Expr) -> Self {
		expr.clone()
	}
}

macro_rules! literal_from {
	($($t:ty),*) => {
		$(
			impl From<$t> for Expr {
				fn from(v: $t) -> Self {
					Expr::Literal(Value::from(v))
				}
			}
		)*
	};
}

literal_from!(bool, i32, i64, f64, &str, String);

impl<R: Into<Expr>> ops::Add<R> for Expr {
	type Output = Expr;

	fn add(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::Add, self, rhs)
	}
}

impl<R: Into<Expr>> ops::Sub<R> for Expr {
	type Output = Expr;

	fn sub(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::Sub, self, rhs)
	}
}

impl<R: Into<Expr>> ops::Mul<R> for Expr {
	type Output = Expr;

	fn mul(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::Mul, self, rhs)
	}
}

impl<R: Into<Expr>> ops::Div<R> for Expr {
	type Output = Expr;

	fn div(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::Div, self, rhs)
	}
}

impl<R: Into<Expr>> ops::BitAnd<R> for Expr {
	type Output = Expr;

	fn bitand(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::And, self, rhs)
	}
}

impl<R: Into<Expr>> ops::BitOr<R> for Expr {
	type Output = Expr;

	fn bitor(self, rhs: R) -> Expr {
		Expr::binary(BinaryOp::Or, self, rhs)
	}
}

// literal on the left: `2 * col("a")`
macro_rules! reflected_arith {
	($($t:ty),*) => {
		$(
			impl ops::Add<Expr> for $t {
				type Output = Expr;

				fn add(self, rhs: Expr) -> Expr {
					Expr::binary(BinaryOp::Add, self, rhs)
				}
			}

			impl ops::Sub<Expr> for $t {
				type Output = Expr;

				fn sub(self, rhs: Expr) -> Expr {
					Expr::binary(BinaryOp::Sub, self, rhs)
				}
			}

			impl ops::Mul<Expr> for $t {
				type Output = Expr;

				fn mul(self, rhs: Expr) -> Expr {
					Expr::binary(BinaryOp::Mul, self, rhs)
				}
			}

			impl ops::Div<Expr> for $t {
				type Output = Expr;

				fn div(self, rhs: Expr) -> Expr {
					Expr::binary(BinaryOp::Div, self, rhs)
				}
			}
		)*
	};
}

// one integer type, so unsuffixed literals infer i64
reflected_arith!(i64, f64);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_operators_build_nodes() {
		let expr = col("age") / 10;
		assert_eq!(expr, div(col("age"), lit(10)));
		assert_eq!(expr.to_string(), "(age / 10)");
	}

	#[test]
	fn test_reflected_operand_order() {
		let expr = 100 - col("age");
		assert_eq!(expr.to_string(), "(100 - age)");
		assert_eq!(2 * col("a"), mul(lit(2i64), col("a")));
		assert_eq!((1.5 / col("a")).to_string(), "(1.5 / a)");
	}

	#[test]
	fn test_comparisons_and_logic() {
		let expr = col("age").ge(25) & col("name").ne("Bo");
		assert_eq!(expr.to_string(), "((age >= 25) and (name != 'Bo'))");
	}

	#[test]
	fn test_composition_leaves_operands_untouched() {
		let age = col("age");
		let doubled = age.clone() * 2;
		let shifted = doubled.clone() + 1;
		assert_eq!(age, Expr::Column("age".into()));
		assert_eq!(doubled.to_string(), "(age * 2)");
		assert_eq!(shifted.to_string(), "((age * 2) + 1)");
	}

	#[test]
	fn test_columns_in_first_occurrence_order() {
		let expr = (col("b") + col("a")) * col("b");
		assert_eq!(expr.columns(), vec!["b", "a"]);
	}

	#[test]
	fn test_validate_rejects_empty_name() {
		let expr = col("") + 1;
		assert!(matches!(expr.validate(), Err(Error::InvalidOperation { .. })));
		assert!(col("a").gt(1).validate().is_ok());
	}

	#[test]
	fn test_display_name() {
		assert_eq!(col("age").display_name(), "age");
		assert_eq!((col("age") / 10).display_name(), "(age / 10)");
	}

	#[test]
	fn test_str_is_text_literal() {
		assert_eq!(Expr::from("age"), Expr::Literal(Value::utf8("age")));
	}
}
