// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error as StdError, sync::Arc};
use thiserror::Error;

/// Error kinds surfaced by room operations and validators. The HTTP adapter at the gateway is the
/// only place mapping kinds to status codes.
#[derive(Debug, Clone, Error)]
pub enum RoomError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error")]
    Internal(#[source] Arc<dyn StdError + Send + Sync + 'static>),
}

impl RoomError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Internal(Arc::new(error))
    }
}
