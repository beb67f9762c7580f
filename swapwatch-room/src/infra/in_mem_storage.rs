// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{LabelMap, RoomStorage, StorageError};
use parking_lot::RwLock;
use std::sync::Arc;
use swapwatch_common::domain::{RoomConfig, WalletAddress};

/// In-memory room storage backing tests and throwaway setups.
#[derive(Default, Clone)]
pub struct InMemRoomStorage {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    wallets: Vec<WalletAddress>,
    labels: LabelMap,
    config: Option<RoomConfig>,
}

impl RoomStorage for InMemRoomStorage {
    async fn get_wallets(&self) -> Result<Vec<WalletAddress>, StorageError> {
        Ok(self.state.read().wallets.clone())
    }

    async fn put_wallets(&self, wallets: &[WalletAddress]) -> Result<(), StorageError> {
        self.state.write().wallets = wallets.to_vec();
        Ok(())
    }

    async fn get_labels(&self) -> Result<LabelMap, StorageError> {
        Ok(self.state.read().labels.clone())
    }

    async fn put_labels(&self, labels: &LabelMap) -> Result<(), StorageError> {
        self.state.write().labels = labels.clone();
        Ok(())
    }

    async fn get_config(&self) -> Result<Option<RoomConfig>, StorageError> {
        Ok(self.state.read().config.clone())
    }

    async fn put_config(&self, config: &RoomConfig) -> Result<(), StorageError> {
        self.state.write().config = Some(config.clone());
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        *self.state.write() = State::default();
        Ok(())
    }
}
