// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Deferred query building.
//!
//! A query is described by a [`Chain`] of [`Operation`]s over a base table.
//! Nothing here touches a store: [`compile`] turns a chain into a single
//! [`Plan`] (statement text, ordered parameters, output schema) that a
//! backing store executes.
//!
//! ```text
//! people | filter age >= 25 | sort age | derive decade = age / 10
//!   => SELECT "name", "age", ("age" / ?) AS "decade" FROM "people"
//!      WHERE ("age" >= ?) ORDER BY "people"."age" ASC, "people".rowid ASC
//! ```

pub use aggregate::Aggregate;
pub use chain::{Chain, Operation, SortDirection};
pub use compile::{compile, compile_add_columns, compile_aggregate, visible_schema};
pub use expression::{BinaryOp, Expr, add, col, div, lit, mul, sub};
pub use plan::{AddColumns, Plan};

mod aggregate;
mod chain;
mod compile;
mod expression;
mod plan;
