// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! [`Store`](dbtable_core::Store) backed by a single SQLite connection.

mod config;
mod connection;
mod mapping;
mod store;

pub use config::{DbPath, JournalMode, OpenFlags, SqliteConfig, SynchronousMode, TempStore};
pub use store::SqliteStore;
