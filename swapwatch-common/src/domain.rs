// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

mod address;
mod error;
mod message;
mod room;
mod swap;

pub use address::*;
pub use error::*;
pub use message::*;
pub use room::*;
pub use swap::*;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix epoch time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
