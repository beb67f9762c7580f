// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

mod filter_sync;
mod redb_index;

pub use filter_sync::*;
pub use redb_index::*;
