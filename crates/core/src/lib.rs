// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use database::Database;
pub use store::Store;
pub use view::{LazyView, Rows};

mod database;
mod store;
mod view;
