// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;
use swapwatch_common::domain::{RoomCode, RoomError, WalletAddress};
use thiserror::Error;

/// The shared bi-directional mapping between wallet addresses and the rooms tracking them. All
/// writes are set-like and idempotent; reads of missing keys return empty sequences. Transient
/// divergence between the two sides is tolerated and heals on subsequent writes.
#[trait_variant::make(Send)]
pub trait WalletIndex
where
    Self: Clone + Send + Sync + 'static,
{
    async fn add_wallet_to_room(
        &self,
        address: &WalletAddress,
        code: &RoomCode,
    ) -> Result<(), IndexError>;

    async fn remove_wallet_from_room(
        &self,
        address: &WalletAddress,
        code: &RoomCode,
    ) -> Result<(), IndexError>;

    async fn rooms_for_wallet(&self, address: &WalletAddress) -> Result<Vec<RoomCode>, IndexError>;

    async fn wallets_for_room(&self, code: &RoomCode) -> Result<Vec<WalletAddress>, IndexError>;

    /// Remove every pairing of the given room and drop its room-side entry.
    async fn cleanup_room(&self, code: &RoomCode) -> Result<(), IndexError>;

    /// Union of all tracked wallets across rooms.
    async fn all_wallets(&self) -> Result<Vec<WalletAddress>, IndexError>;
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot access wallet index")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    #[error("cannot (de)serialize index entry")]
    Codec(#[from] serde_json::Error),
}

impl IndexError {
    pub fn backend(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}

impl From<IndexError> for RoomError {
    fn from(error: IndexError) -> Self {
        RoomError::internal(error)
    }
}
