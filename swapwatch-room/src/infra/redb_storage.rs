// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{LabelMap, RoomStorage, StorageError};
use log::warn;
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use swapwatch_common::domain::{RoomCode, RoomConfig, WalletAddress};

const WALLETS: TableDefinition<&str, Vec<u8>> = TableDefinition::new("room-wallets");
const LABELS: TableDefinition<&str, Vec<u8>> = TableDefinition::new("room-labels");
const CONFIGS: TableDefinition<&str, Vec<u8>> = TableDefinition::new("room-configs");

/// redb backed [RoomStorage], scoped to one room code within a shared database. Values are JSON
/// encoded under the room's code as key.
#[derive(Clone)]
pub struct RedbRoomStorage {
    db: Arc<Database>,
    code: RoomCode,
}

impl RedbRoomStorage {
    pub fn new(db: Arc<Database>, code: RoomCode) -> Self {
        Self { db, code }
    }

    /// Create the room tables so that first reads see empty tables instead of missing ones.
    pub fn init(db: &Database) -> Result<(), StorageError> {
        let tx = db.begin_write().map_err(StorageError::backend)?;
        {
            tx.open_table(WALLETS).map_err(StorageError::backend)?;
            tx.open_table(LABELS).map_err(StorageError::backend)?;
            tx.open_table(CONFIGS).map_err(StorageError::backend)?;
        }
        tx.commit().map_err(StorageError::backend)
    }

    fn read<T>(&self, table: TableDefinition<&str, Vec<u8>>) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let tx = self.db.begin_read().map_err(StorageError::backend)?;
        let table = tx.open_table(table).map_err(StorageError::backend)?;
        let value = table
            .get(self.code.as_str())
            .map_err(StorageError::backend)?;

        value
            .map(|value| serde_json::from_slice(&value.value()))
            .transpose()
            .map_err(Into::into)
    }

    fn write<T>(&self, table: TableDefinition<&str, Vec<u8>>, value: &T) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let encoded = serde_json::to_vec(value)?;

        let tx = self.db.begin_write().map_err(StorageError::backend)?;
        {
            let mut table = tx.open_table(table).map_err(StorageError::backend)?;
            table
                .insert(self.code.as_str(), encoded)
                .map_err(StorageError::backend)?;
        }
        tx.commit().map_err(StorageError::backend)
    }
}

impl RoomStorage for RedbRoomStorage {
    async fn get_wallets(&self) -> Result<Vec<WalletAddress>, StorageError> {
        Ok(self.read(WALLETS)?.unwrap_or_default())
    }

    async fn put_wallets(&self, wallets: &[WalletAddress]) -> Result<(), StorageError> {
        self.write(WALLETS, &wallets)
    }

    async fn get_labels(&self) -> Result<LabelMap, StorageError> {
        Ok(self.read(LABELS)?.unwrap_or_default())
    }

    async fn put_labels(&self, labels: &LabelMap) -> Result<(), StorageError> {
        self.write(LABELS, labels)
    }

    async fn get_config(&self) -> Result<Option<RoomConfig>, StorageError> {
        self.read(CONFIGS)
    }

    async fn put_config(&self, config: &RoomConfig) -> Result<(), StorageError> {
        self.write(CONFIGS, config)
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let tx = self.db.begin_write().map_err(StorageError::backend)?;
        {
            for table in [WALLETS, LABELS, CONFIGS] {
                let mut table = tx.open_table(table).map_err(StorageError::backend)?;
                table
                    .remove(self.code.as_str())
                    .map_err(StorageError::backend)?;
            }
        }
        tx.commit().map_err(StorageError::backend)
    }
}

/// All persisted room configs, for startup restoration. Keys that no longer parse as room codes
/// are skipped.
pub fn all_configs(db: &Database) -> Result<Vec<(RoomCode, RoomConfig)>, StorageError> {
    let tx = db.begin_read().map_err(StorageError::backend)?;
    let table = tx.open_table(CONFIGS).map_err(StorageError::backend)?;

    let mut configs = Vec::new();
    for entry in table.iter().map_err(StorageError::backend)? {
        let (key, value) = entry.map_err(StorageError::backend)?;

        let Ok(code) = RoomCode::parse(key.value()) else {
            warn!(key:% = key.value(); "skipping unparsable room code");
            continue;
        };
        let config = serde_json::from_slice(&value.value())?;

        configs.push((code, config));
    }

    Ok(configs)
}
