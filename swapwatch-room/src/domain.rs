// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

mod hook;
mod notify;
mod room;
mod sessions;
mod storage;

pub use hook::*;
pub use notify::*;
pub use room::*;
pub use sessions::*;
pub use storage::*;
