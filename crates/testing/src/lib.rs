// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod counting;
pub mod fixture;
pub mod tempdir;
