// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dbtable_type::{ColumnDef, Error, Result, Schema, TableDef, Type, Value};
use indexmap::IndexMap;

use crate::{Aggregate, BinaryOp, Chain, Expr, Operation, SortDirection};

/// Statement-level operator. Text `+` text becomes `Concat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
	Add,
	Sub,
	Mul,
	Div,
	Concat,
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	And,
	Or,
}

impl Operator {
	pub(crate) fn sql(&self) -> &'static str {
		match self {
			Operator::Add => "+",
			Operator::Sub => "-",
			Operator::Mul => "*",
			Operator::Div => "/",
			Operator::Concat => "||",
			Operator::Eq => "=",
			Operator::NotEq => "!=",
			Operator::Lt => "<",
			Operator::LtEq => "<=",
			Operator::Gt => ">",
			Operator::GtEq => ">=",
			Operator::And => "AND",
			Operator::Or => "OR",
		}
	}
}

/// An expression bound to base table columns and typed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
	Column {
		name: String,
		ty: Type,
	},
	Literal(Value),
	Binary {
		op: Operator,
		left: Arc<Resolved>,
		right: Arc<Resolved>,
		ty: Type,
	},
}

impl Resolved {
	pub(crate) fn ty(&self) -> Type {
		match self {
			Resolved::Column {
				ty,
				..
			} => *ty,
			Resolved::Literal(value) => value.get_type(),
			Resolved::Binary {
				ty,
				..
			} => *ty,
		}
	}
}

#[derive(Debug)]
pub(crate) struct Sort {
	pub(crate) key: Arc<Resolved>,
	pub(crate) direction: SortDirection,
}

#[derive(Debug)]
pub(crate) struct Group {
	pub(crate) name: String,
	pub(crate) key: Arc<Resolved>,
	/// Columns visible when the group was applied; aggregates resolve here.
	pub(crate) source: IndexMap<String, Arc<Resolved>>,
}

#[derive(Debug)]
pub(crate) struct ResolvedAggregate {
	pub(crate) function: &'static str,
	pub(crate) column: Option<String>,
	pub(crate) argument: Option<Arc<Resolved>>,
	pub(crate) name: String,
	pub(crate) ty: Type,
}

/// Where a stage reads its rows from.
#[derive(Debug)]
pub(crate) enum Source {
	Table(String),
	/// An earlier stage ended by a `take`; its limited rows are the input.
	Stage(Box<Walk>),
}

/// Result of walking a chain against a base table.
///
/// A walk is one statement. Filters, sorts and groups appended after a
/// `take` must not move ahead of the limit, so they start a new stage that
/// reads the previous one as a subquery.
#[derive(Debug)]
pub(crate) struct Walk {
	pub(crate) source: Source,
	pub(crate) depth: usize,
	pub(crate) visible: IndexMap<String, Arc<Resolved>>,
	pub(crate) filters: Vec<Arc<Resolved>>,
	pub(crate) having: Vec<Arc<Resolved>>,
	pub(crate) sorts: Vec<Sort>,
	pub(crate) group: Option<Group>,
	pub(crate) limit: Option<usize>,
	/// Key and hidden columns of a group applied in an earlier stage.
	pub(crate) grouped: Option<(String, Vec<String>)>,
}

impl Walk {
	pub(crate) fn new(table: &TableDef) -> Self {
		let visible = table
			.schema
			.iter()
			.map(|column| {
				(
					column.name.clone(),
					Arc::new(Resolved::Column {
						name: column.name.clone(),
						ty: column.ty,
					}),
				)
			})
			.collect();

		Self::stage(Source::Table(table.name.clone()), 0, visible)
	}

	fn stage(source: Source, depth: usize, visible: IndexMap<String, Arc<Resolved>>) -> Self {
		Self {
			source,
			depth,
			visible,
			filters: Vec::new(),
			having: Vec::new(),
			sorts: Vec::new(),
			group: None,
			limit: None,
			grouped: None,
		}
	}

	pub(crate) fn run(table: &TableDef, chain: &Chain) -> Result<Self> {
		let mut walk = Walk::new(table);
		for op in chain.operations() {
			walk.apply(op)?;
		}
		Ok(walk)
	}

	pub(crate) fn schema(&self) -> Schema {
		self.visible.iter().map(|(name, resolved)| ColumnDef::new(name.clone(), resolved.ty())).collect()
	}

	/// Name column references of this stage are qualified with.
	pub(crate) fn alias(&self) -> String {
		match &self.source {
			Source::Table(name) => name.clone(),
			Source::Stage(_) => format!("stage_{}", self.depth),
		}
	}

	/// Ends the current stage. Its visible columns become the plain columns
	/// of the next one.
	fn close(&mut self) {
		let visible = self
			.visible
			.iter()
			.map(|(name, resolved)| {
				(
					name.clone(),
					Arc::new(Resolved::Column {
						name: name.clone(),
						ty: resolved.ty(),
					}),
				)
			})
			.collect();
		let grouped = match &self.group {
			Some(group) => Some((group.name.clone(), group.source.keys().cloned().collect())),
			None => self.grouped.clone(),
		};

		let placeholder = Walk::stage(Source::Table(String::new()), self.depth + 1, visible);
		let inner = std::mem::replace(self, placeholder);
		self.source = Source::Stage(Box::new(inner));
		self.grouped = grouped;
	}

	fn apply(&mut self, op: &Operation) -> Result<()> {
		if self.limit.is_some() && matches!(op, Operation::Filter(_) | Operation::Sort { .. } | Operation::Group(_)) {
			self.close();
		}

		match op {
			Operation::Project(names) => {
				let mut visible = IndexMap::with_capacity(names.len());
				for name in names {
					let resolved = self.lookup(name)?;
					visible.insert(name.clone(), resolved);
				}
				self.visible = visible;
			}
			Operation::Drop(names) => {
				for name in names {
					self.lookup(name)?;
				}
				self.visible.retain(|name, _| !names.contains(name));
			}
			Operation::Filter(predicate) => {
				let resolved = self.resolve(predicate)?;
				if !matches!(resolved.ty(), Type::Boolean | Type::Undefined) {
					return Err(Error::type_mismatch(format!(
						"filter predicate {predicate} is {}, expected BOOLEAN",
						resolved.ty()
					)));
				}
				if self.group.is_some() {
					self.having.push(resolved);
				} else {
					self.filters.push(resolved);
				}
			}
			Operation::Derive {
				name,
				expr,
			} => {
				let resolved = self.resolve(expr)?;
				// existing names keep their position
				self.visible.insert(name.clone(), resolved);
			}
			Operation::Sort {
				key,
				direction,
			} => {
				let key = self.lookup(key)?;
				self.sorts.push(Sort {
					key,
					direction: *direction,
				});
			}
			Operation::Group(expr) => self.group(expr)?,
			Operation::Take(n) => {
				self.limit = Some(self.limit.map_or(*n, |limit| limit.min(*n)));
			}
		}
		Ok(())
	}

	fn group(&mut self, expr: &Expr) -> Result<()> {
		if self.group.is_some() || self.grouped.is_some() {
			return Err(Error::invalid_operation("a view can only be grouped once"));
		}

		let key = self.resolve(expr)?;
		if let Some(sort) = self.sorts.iter().find(|sort| sort.key != key) {
			return Err(Error::invalid_operation(format!(
				"cannot group by {expr} after sorting by a different column; sort by {} is lost when grouping",
				describe(&sort.key)
			)));
		}

		let name = expr.display_name();
		let source = std::mem::take(&mut self.visible);
		self.visible.insert(name.clone(), key.clone());
		self.group = Some(Group {
			name,
			key,
			source,
		});
		Ok(())
	}

	fn lookup(&self, name: &str) -> Result<Arc<Resolved>> {
		if let Some(resolved) = self.visible.get(name) {
			return Ok(resolved.clone());
		}

		let hidden = match (&self.group, &self.grouped) {
			(Some(group), _) => group.source.contains_key(name).then_some(&group.name),
			(None, Some((key, source))) => source.iter().any(|column| column == name).then_some(key),
			(None, None) => None,
		};
		if let Some(key) = hidden {
			return Err(Error::invalid_operation(format!(
				"column '{name}' is not available after grouping by '{key}'; only the group key and expressions over it are visible"
			)));
		}

		Err(Error::unknown_column(name, self.visible.keys().map(String::as_str)))
	}

	pub(crate) fn resolve(&self, expr: &Expr) -> Result<Arc<Resolved>> {
		match expr {
			Expr::Column(name) => self.lookup(name),
			Expr::Literal(value) => Ok(Arc::new(Resolved::Literal(value.clone()))),
			Expr::Binary {
				op,
				left,
				right,
			} => {
				let left = self.resolve(left)?;
				let right = self.resolve(right)?;
				let (op, ty) = check(*op, left.ty(), right.ty())?;
				Ok(Arc::new(Resolved::Binary {
					op,
					left,
					right,
					ty,
				}))
			}
		}
	}

	pub(crate) fn aggregate(&self, aggregate: &Aggregate) -> Result<ResolvedAggregate> {
		aggregate.validate()?;

		let argument = match aggregate.column() {
			None => None,
			Some(name) => {
				let scope = self.group.as_ref().map(|group| &group.source).unwrap_or(&self.visible);
				match scope.get(name) {
					Some(resolved) => Some(resolved.clone()),
					None => return Err(Error::unknown_column(name, scope.keys().map(String::as_str))),
				}
			}
		};

		let source = argument.as_ref().map(|argument| argument.ty()).unwrap_or(Type::Undefined);
		let ty = match aggregate {
			Aggregate::Count(_) => Type::Int8,
			Aggregate::Avg(_) | Aggregate::Sum(_) if !(source.is_numeric() || source.is_undefined()) => {
				return Err(Error::type_mismatch(format!(
					"{} requires a numeric column, '{}' is {source}",
					aggregate.function(),
					aggregate.column().unwrap_or_default()
				)));
			}
			Aggregate::Avg(_) => Type::Float8,
			Aggregate::Sum(_) | Aggregate::Min(_) | Aggregate::Max(_) => source,
		};

		Ok(ResolvedAggregate {
			function: aggregate.function(),
			column: aggregate.column().map(str::to_string),
			argument,
			name: aggregate.display_name(),
			ty,
		})
	}
}

fn describe(resolved: &Resolved) -> String {
	match resolved {
		Resolved::Column {
			name,
			..
		} => format!("'{name}'"),
		_ => "an expression".to_string(),
	}
}

/// Types the operator against its operand kinds. `Undefined` is compatible
/// with every kind.
fn check(op: BinaryOp, left: Type, right: Type) -> Result<(Operator, Type)> {
	let numeric = |ty: Type| ty.is_numeric() || ty.is_undefined();
	let text = |ty: Type| ty == Type::Utf8 || ty.is_undefined();
	let boolean = |ty: Type| ty == Type::Boolean || ty.is_undefined();
	let mismatch = || Error::operand_mismatch(op.symbol(), left, right);

	match op {
		BinaryOp::Add if numeric(left) && numeric(right) => Ok((Operator::Add, left.promote(right))),
		BinaryOp::Add if text(left) && text(right) => Ok((Operator::Concat, Type::Utf8)),
		BinaryOp::Sub if numeric(left) && numeric(right) => Ok((Operator::Sub, left.promote(right))),
		BinaryOp::Mul if numeric(left) && numeric(right) => Ok((Operator::Mul, left.promote(right))),
		BinaryOp::Div if numeric(left) && numeric(right) => Ok((Operator::Div, left.promote(right))),
		BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => Err(mismatch()),

		BinaryOp::Eq | BinaryOp::NotEq => {
			let comparable = (numeric(left) && numeric(right))
				|| (text(left) && text(right))
				|| (boolean(left) && boolean(right));
			if !comparable {
				return Err(mismatch());
			}
			let op = if op == BinaryOp::Eq {
				Operator::Eq
			} else {
				Operator::NotEq
			};
			Ok((op, Type::Boolean))
		}

		BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
			if !((numeric(left) && numeric(right)) || (text(left) && text(right))) {
				return Err(mismatch());
			}
			let op = match op {
				BinaryOp::Lt => Operator::Lt,
				BinaryOp::LtEq => Operator::LtEq,
				BinaryOp::Gt => Operator::Gt,
				_ => Operator::GtEq,
			};
			Ok((op, Type::Boolean))
		}

		BinaryOp::And | BinaryOp::Or => {
			if !(boolean(left) && boolean(right)) {
				return Err(mismatch());
			}
			let op = if op == BinaryOp::And {
				Operator::And
			} else {
				Operator::Or
			};
			Ok((op, Type::Boolean))
		}
	}
}
