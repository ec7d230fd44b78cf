// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod emit;
mod resolve;

use dbtable_type::{Result, Schema, TableDef};
use tracing::{debug, instrument};

use crate::{AddColumns, Aggregate, Chain, Plan};
use resolve::Walk;

/// Compiles `chain` applied to `table` into a single statement.
///
/// Operations are applied in append order against the table's schema;
/// unknown names, operand type errors and invalid chain shapes are reported
/// here rather than when the chain was built.
#[instrument(name = "query::compile", level = "debug", skip_all, fields(table = %table.name, operations = chain.len()))]
pub fn compile(table: &TableDef, chain: &Chain) -> Result<Plan> {
	let walk = Walk::run(table, chain)?;
	let plan = emit::select(&walk)?;
	debug!(sql = %plan.sql, params = plan.params.len(), "compiled view");
	Ok(plan)
}

/// Compiles a statement returning `aggregates`, computed per group when the
/// chain is grouped and over all rows of the view otherwise.
#[instrument(name = "query::compile_aggregate", level = "debug", skip_all, fields(table = %table.name, operations = chain.len()))]
pub fn compile_aggregate(table: &TableDef, chain: &Chain, aggregates: &[Aggregate]) -> Result<Plan> {
	let walk = Walk::run(table, chain)?;
	let aggregates = aggregates.iter().map(|aggregate| walk.aggregate(aggregate)).collect::<Result<Vec<_>>>()?;
	let plan = emit::aggregate(&walk, &aggregates)?;
	debug!(sql = %plan.sql, params = plan.params.len(), "compiled aggregate");
	Ok(plan)
}

/// Compiles the columns `chain` derives into additions to `table`, filled
/// for every stored row. Filters, sorts and takes do not restrict the rows.
/// Grouped or staged chains and rewritten stored columns are rejected.
#[instrument(name = "query::compile_add_columns", level = "debug", skip_all, fields(table = %table.name))]
pub fn compile_add_columns(table: &TableDef, chain: &Chain) -> Result<Option<AddColumns>> {
	let walk = Walk::run(table, chain)?;
	let change = emit::add_columns(&walk, table)?;
	if let Some(change) = &change {
		debug!(sql = %change.fill.sql, columns = change.columns.len(), "compiled column additions");
	}
	Ok(change)
}

/// Columns a view over `chain` exposes, without emitting a statement.
#[instrument(name = "query::visible_schema", level = "trace", skip_all, fields(table = %table.name))]
pub fn visible_schema(table: &TableDef, chain: &Chain) -> Result<Schema> {
	Ok(Walk::run(table, chain)?.schema())
}
