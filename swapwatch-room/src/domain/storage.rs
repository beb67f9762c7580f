// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use std::{collections::BTreeMap, error::Error as StdError};
use swapwatch_common::domain::{RoomConfig, RoomError, WalletAddress};
use thiserror::Error;

/// Per-room mapping from wallet address to human label.
pub type LabelMap = BTreeMap<WalletAddress, String>;

/// Typed key-spaced persistence for a single room. Callers are serialised by the owning actor, so
/// read-modify-write sequences need no further coordination.
#[trait_variant::make(Send)]
pub trait RoomStorage
where
    Self: Clone + Send + Sync + 'static,
{
    /// The tracked wallets in insertion order.
    async fn get_wallets(&self) -> Result<Vec<WalletAddress>, StorageError>;

    async fn put_wallets(&self, wallets: &[WalletAddress]) -> Result<(), StorageError>;

    async fn get_labels(&self) -> Result<LabelMap, StorageError>;

    async fn put_labels(&self, labels: &LabelMap) -> Result<(), StorageError>;

    /// The room config, or `None` if the room has not been created.
    async fn get_config(&self) -> Result<Option<RoomConfig>, StorageError>;

    async fn put_config(&self, config: &RoomConfig) -> Result<(), StorageError>;

    /// Clear all durable state of this room.
    async fn delete_all(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access room storage")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    #[error("cannot (de)serialize room state")]
    Codec(#[from] serde_json::Error),
}

impl StorageError {
    pub fn backend(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}

impl From<StorageError> for RoomError {
    fn from(error: StorageError) -> Self {
        RoomError::internal(error)
    }
}
