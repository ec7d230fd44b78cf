// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::{Path, PathBuf};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	File(PathBuf),
	Memory,
}

/// Connection open flags, converted to `rusqlite::OpenFlags` on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFlags {
	pub read_write: bool,
	pub create: bool,
	pub full_mutex: bool,
	pub no_mutex: bool,
	pub shared_cache: bool,
	pub private_cache: bool,
	pub uri: bool,
}

impl Default for OpenFlags {
	fn default() -> Self {
		Self {
			read_write: true,
			create: true,
			full_mutex: false,
			// the store serializes access itself
			no_mutex: true,
			shared_cache: false,
			private_cache: false,
			uri: false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
	Delete,
	Truncate,
	Persist,
	Memory,
	Wal,
	Off,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Truncate => "TRUNCATE",
			JournalMode::Persist => "PERSIST",
			JournalMode::Memory => "MEMORY",
			JournalMode::Wal => "WAL",
			JournalMode::Off => "OFF",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynchronousMode {
	Off,
	Normal,
	Full,
	Extra,
}

impl SynchronousMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			SynchronousMode::Off => "OFF",
			SynchronousMode::Normal => "NORMAL",
			SynchronousMode::Full => "FULL",
			SynchronousMode::Extra => "EXTRA",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempStore {
	Default,
	File,
	Memory,
}

impl TempStore {
	pub fn as_str(&self) -> &'static str {
		match self {
			TempStore::Default => "DEFAULT",
			TempStore::File => "FILE",
			TempStore::Memory => "MEMORY",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
	pub path: DbPath,
	pub flags: OpenFlags,
	pub journal_mode: JournalMode,
	pub synchronous_mode: SynchronousMode,
	pub temp_store: TempStore,
}

impl SqliteConfig {
	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			flags: OpenFlags::default(),
			journal_mode: JournalMode::Memory,
			synchronous_mode: SynchronousMode::Off,
			temp_store: TempStore::Memory,
		}
	}

	/// A database file; a missing parent directory is created on connect.
	pub fn file(path: impl AsRef<Path>) -> Self {
		Self {
			path: DbPath::File(path.as_ref().to_path_buf()),
			flags: OpenFlags::default(),
			journal_mode: JournalMode::Wal,
			synchronous_mode: SynchronousMode::Normal,
			temp_store: TempStore::Memory,
		}
	}

	pub fn with_flags(mut self, flags: OpenFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn with_journal_mode(mut self, journal_mode: JournalMode) -> Self {
		self.journal_mode = journal_mode;
		self
	}

	pub fn with_synchronous_mode(mut self, synchronous_mode: SynchronousMode) -> Self {
		self.synchronous_mode = synchronous_mode;
		self
	}

	pub fn with_temp_store(mut self, temp_store: TempStore) -> Self {
		self.temp_store = temp_store;
		self
	}

	pub fn read_only(mut self) -> Self {
		self.flags.read_write = false;
		self.flags.create = false;
		self
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self::in_memory()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builders() {
		let config = SqliteConfig::file("/tmp/people.db")
			.with_journal_mode(JournalMode::Delete)
			.with_synchronous_mode(SynchronousMode::Full);

		assert_eq!(config.path, DbPath::File(PathBuf::from("/tmp/people.db")));
		assert_eq!(config.journal_mode.as_str(), "DELETE");
		assert_eq!(config.synchronous_mode.as_str(), "FULL");
		assert_eq!(config.temp_store.as_str(), "MEMORY");
	}

	#[test]
	fn test_read_only() {
		let config = SqliteConfig::file("/tmp/people.db").read_only();
		assert!(!config.flags.read_write);
		assert!(!config.flags.create);
	}

	#[test]
	fn test_default_is_memory() {
		assert_eq!(SqliteConfig::default().path, DbPath::Memory);
	}
}
