// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dbtable_type::{ColumnDef, Error, Result, Schema, TableDef, Value};

use super::resolve::{Resolved, ResolvedAggregate, Source, Walk};
use crate::{AddColumns, Plan, SortDirection};

/// Hidden column carrying the row order of a stage read as a subquery.
const POSITION: &str = "__dbtable_row";

/// Accumulates statement text and the parameters of its `?` placeholders,
/// which are pushed in the order the placeholders are written.
#[derive(Debug, Default)]
struct Writer {
	sql: String,
	params: Vec<Value>,
}

impl Writer {
	fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	fn ident(&mut self, name: &str) {
		self.sql.push('"');
		self.sql.push_str(&name.replace('"', "\"\""));
		self.sql.push('"');
	}

	fn column(&mut self, qualifier: Option<&str>, name: &str) {
		if let Some(qualifier) = qualifier {
			self.ident(qualifier);
			self.sql.push('.');
		}
		self.ident(name);
	}

	fn expr(&mut self, resolved: &Resolved) {
		self.write(resolved, None);
	}

	/// Column references qualified by `qualifier`. ORDER BY resolves a bare
	/// name to a result column first, which a derive may have rebound.
	fn qualified(&mut self, resolved: &Resolved, qualifier: &str) {
		self.write(resolved, Some(qualifier));
	}

	fn write(&mut self, resolved: &Resolved, qualifier: Option<&str>) {
		match resolved {
			Resolved::Column {
				name,
				..
			} => self.column(qualifier, name),
			Resolved::Literal(value) => {
				self.sql.push('?');
				self.params.push(value.clone());
			}
			Resolved::Binary {
				op,
				left,
				right,
				..
			} => {
				self.sql.push('(');
				self.write(left, qualifier);
				self.push(&format!(" {} ", op.sql()));
				self.write(right, qualifier);
				self.sql.push(')');
			}
		}
	}

	/// `expr AS "name"`, or the bare identifier when it already has that name.
	fn item(&mut self, name: &str, resolved: &Resolved) {
		if let Resolved::Column {
			name: column,
			..
		} = resolved
		{
			if column == name {
				self.ident(name);
				return;
			}
		}
		self.expr(resolved);
		self.push(" AS ");
		self.ident(name);
	}

	fn conjunction(&mut self, keyword: &str, predicates: &[Arc<Resolved>]) {
		if predicates.is_empty() {
			return;
		}
		self.push(keyword);
		for (idx, predicate) in predicates.iter().enumerate() {
			if idx > 0 {
				self.push(" AND ");
			}
			self.expr(predicate);
		}
	}

	fn finish(self, schema: Schema) -> Plan {
		Plan::new(self.sql, self.params, schema)
	}
}

fn direction(direction: SortDirection) -> &'static str {
	match direction {
		SortDirection::Asc => " ASC",
		SortDirection::Desc => " DESC",
	}
}

/// Grouped, sorted and limited stages are ordered, and so is every stage
/// reading an earlier one.
fn ordered(walk: &Walk) -> bool {
	walk.group.is_some() || !walk.sorts.is_empty() || walk.limit.is_some() || matches!(walk.source, Source::Stage(_))
}

/// Sort keys in append order. Ungrouped ties keep the order of the source:
/// `rowid` for a table, the position column for an earlier stage. Groups
/// not already sorted by their key are ordered by it.
fn ordering(out: &mut Writer, walk: &Walk) {
	let alias = walk.alias();
	for (idx, sort) in walk.sorts.iter().enumerate() {
		if idx > 0 {
			out.push(", ");
		}
		out.qualified(&sort.key, &alias);
		out.push(direction(sort.direction));
	}

	let separate = |out: &mut Writer| {
		if !walk.sorts.is_empty() {
			out.push(", ");
		}
	};
	match (&walk.group, &walk.source) {
		(Some(group), _) => {
			if !walk.sorts.iter().any(|sort| sort.key == group.key) {
				separate(out);
				out.qualified(&group.key, &alias);
				out.push(" ASC");
			}
		}
		(None, Source::Table(_)) => {
			separate(out);
			out.ident(&alias);
			out.push(".rowid ASC");
		}
		(None, Source::Stage(_)) => {
			separate(out);
			out.column(Some(&alias), POSITION);
			out.push(" ASC");
		}
	}
}

/// `SELECT .. FROM .. [WHERE] [GROUP BY] [HAVING] [ORDER BY] [LIMIT]` with
/// the visible columns followed by `aggregates` (grouped views only). A stage
/// read by a later one also exposes its row order as [`POSITION`].
fn stage(out: &mut Writer, walk: &Walk, aggregates: &[ResolvedAggregate], position: bool) -> Result<Schema> {
	if walk.visible.is_empty() && aggregates.is_empty() {
		return Err(Error::invalid_operation("view has no visible columns"));
	}

	let mut schema = walk.schema();

	out.push("SELECT ");
	let mut first = true;
	for (name, resolved) in &walk.visible {
		if !first {
			out.push(", ");
		}
		first = false;
		out.item(name, resolved);
	}
	for aggregate in aggregates {
		if !first {
			out.push(", ");
		}
		first = false;
		out.push(aggregate.function);
		out.push("(");
		match &aggregate.argument {
			Some(argument) => out.expr(argument),
			None => out.push("*"),
		}
		out.push(") AS ");
		out.ident(&aggregate.name);
		schema.push(ColumnDef::new(aggregate.name.clone(), aggregate.ty));
	}
	if position {
		out.push(", row_number() OVER (ORDER BY ");
		ordering(out, walk);
		out.push(") AS ");
		out.ident(POSITION);
	}

	out.push(" FROM ");
	match &walk.source {
		Source::Table(name) => out.ident(name),
		Source::Stage(inner) => {
			out.push("(");
			stage(out, inner, &[], true)?;
			out.push(") AS ");
			out.ident(&walk.alias());
		}
	}

	out.conjunction(" WHERE ", &walk.filters);

	if let Some(group) = &walk.group {
		out.push(" GROUP BY ");
		out.expr(&group.key);
		out.conjunction(" HAVING ", &walk.having);
	}

	if ordered(walk) {
		out.push(" ORDER BY ");
		ordering(out, walk);
	}

	if let Some(limit) = walk.limit {
		out.push(&format!(" LIMIT {limit}"));
	}

	Ok(schema)
}

pub(crate) fn select(walk: &Walk) -> Result<Plan> {
	let mut out = Writer::default();
	let schema = stage(&mut out, walk, &[], false)?;
	Ok(out.finish(schema))
}

/// Grouped views compute aggregates per group in the grouped statement.
/// Ungrouped views aggregate over the view's own statement as a subquery.
pub(crate) fn aggregate(walk: &Walk, aggregates: &[ResolvedAggregate]) -> Result<Plan> {
	if aggregates.is_empty() {
		return Err(Error::invalid_operation("aggregate requires at least one aggregate"));
	}

	let mut out = Writer::default();
	if walk.group.is_some() {
		let schema = stage(&mut out, walk, aggregates, false)?;
		return Ok(out.finish(schema));
	}

	let mut schema = Schema::default();
	out.push("SELECT ");
	for (idx, aggregate) in aggregates.iter().enumerate() {
		if idx > 0 {
			out.push(", ");
		}
		out.push(aggregate.function);
		out.push("(");
		match &aggregate.column {
			Some(column) => out.ident(column),
			None => out.push("*"),
		}
		out.push(") AS ");
		out.ident(&aggregate.name);
		schema.push(ColumnDef::new(aggregate.name.clone(), aggregate.ty));
	}
	out.push(" FROM (");
	stage(&mut out, walk, &[], false)?;
	out.push(")");

	Ok(out.finish(schema))
}

/// Derived columns of a single row-wise stage, added to `table` and filled
/// for every row. Returns `None` when the view derives nothing new.
pub(crate) fn add_columns(walk: &Walk, table: &TableDef) -> Result<Option<AddColumns>> {
	if walk.group.is_some() || matches!(walk.source, Source::Stage(_)) {
		return Err(Error::invalid_operation(format!(
			"only row-wise derived columns can be saved into {}; use save_as",
			table.name
		)));
	}

	let mut out = Writer::default();
	let mut columns = Vec::new();
	for (name, resolved) in &walk.visible {
		if let Some(existing) = table.schema.find(name) {
			let unchanged = matches!(resolved.as_ref(), Resolved::Column { name: column, .. } if column == &existing.name);
			if unchanged {
				continue;
			}
			return Err(Error::invalid_operation(format!(
				"column '{name}' already exists in {} and cannot be rewritten; use save_as",
				table.name
			)));
		}

		if columns.is_empty() {
			out.push("UPDATE ");
			out.ident(&table.name);
			out.push(" SET ");
		} else {
			out.push(", ");
		}
		out.ident(name);
		out.push(" = ");
		out.expr(resolved);
		columns.push(ColumnDef::new(name.clone(), resolved.ty()));
	}

	if columns.is_empty() {
		return Ok(None);
	}

	Ok(Some(AddColumns {
		table: table.name.clone(),
		columns,
		fill: out.finish(Schema::default()),
	}))
}
