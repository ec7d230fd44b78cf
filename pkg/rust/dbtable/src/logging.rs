// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `info`. Does nothing if a global subscriber is already set.
pub fn init() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	install(filter);
}

/// Like [`init`] with an explicit filter, e.g. `"dbtable_query=debug"`.
pub fn init_with(filter: &str) {
	install(EnvFilter::new(filter));
}

fn install(filter: EnvFilter) {
	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_init_twice_is_noop() {
		init_with("dbtable=debug");
		init();
	}
}
