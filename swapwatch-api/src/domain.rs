// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;

/// API abstraction, allowing the application run loop to stay independent of the HTTP stack.
#[trait_variant::make(Send)]
pub trait Api
where
    Self: Send + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    /// Serve the API until shutdown.
    async fn serve(self) -> Result<(), Self::Error>;
}
