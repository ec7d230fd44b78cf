// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable_type::{Error, Result};
use rusqlite::Connection;

use crate::{DbPath, OpenFlags, SqliteConfig};

/// Opens a connection and applies the configured pragmas.
pub(crate) fn connect(config: &SqliteConfig) -> Result<Connection> {
	let flags = convert_flags(&config.flags);

	let conn = match &config.path {
		DbPath::Memory => Connection::open_in_memory_with_flags(flags)
			.map_err(|e| Error::store_with("failed to open in-memory database", e))?,
		DbPath::File(path) => {
			if config.flags.create {
				if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
					std::fs::create_dir_all(parent).map_err(|e| {
						Error::store_with(format!("failed to create {}", parent.display()), e)
					})?;
				}
			}
			Connection::open_with_flags(path, flags).map_err(|e| {
				Error::store_with(format!("failed to connect to database at {}", path.display()), e)
			})?
		}
	};

	let pragma = |name: &str, value: &str| {
		conn.pragma_update(None, name, value)
			.map_err(|e| Error::store_with(format!("failed to set pragma {name} = {value}"), e))
	};

	if config.flags.read_write {
		pragma("journal_mode", config.journal_mode.as_str())?;
	}
	pragma("synchronous", config.synchronous_mode.as_str())?;
	pragma("temp_store", config.temp_store.as_str())?;

	Ok(conn)
}

pub(crate) fn convert_flags(flags: &OpenFlags) -> rusqlite::OpenFlags {
	let mut rusqlite_flags = rusqlite::OpenFlags::empty();

	if flags.read_write {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
	} else {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY;
	}
	if flags.create && flags.read_write {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
	}
	if flags.full_mutex {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX;
	}
	if flags.no_mutex {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
	}
	if flags.shared_cache {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_SHARED_CACHE;
	}
	if flags.private_cache {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE;
	}
	if flags.uri {
		rusqlite_flags |= rusqlite::OpenFlags::SQLITE_OPEN_URI;
	}

	rusqlite_flags
}
