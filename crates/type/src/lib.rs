// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use error::{Error, Result};
pub use frame::{Frame, Row};
pub use schema::{ColumnDef, Schema, TableDef};
pub use value::{OrderedF64, Type, Value};

pub mod error;
pub mod frame;
pub mod schema;
pub mod value;
