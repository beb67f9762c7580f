// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

mod actor;
mod in_mem_storage;
mod redb_storage;
mod registry;
mod telegram;

pub use actor::*;
pub use in_mem_storage::*;
pub use redb_storage::*;
pub use registry::*;
pub use telegram::*;
