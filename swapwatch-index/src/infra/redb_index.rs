// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{IndexError, WalletIndex};
use redb::{Database, ReadableTable, Table, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swapwatch_common::domain::{RoomCode, WalletAddress, now_millis};

const WALLET_ROOMS: TableDefinition<&str, Vec<u8>> = TableDefinition::new("wallet-rooms");
const ROOM_WALLETS: TableDefinition<&str, Vec<u8>> = TableDefinition::new("index-room-wallets");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletEntry {
    rooms: Vec<RoomCode>,
    last_updated: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomEntry {
    wallets: Vec<WalletAddress>,
    last_updated: u64,
}

/// redb backed [WalletIndex]. Both sides of a pairing are written within one transaction, but
/// callers must not rely on that: the contract stays eventually consistent.
#[derive(Clone)]
pub struct RedbWalletIndex {
    db: Arc<Database>,
}

impl RedbWalletIndex {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create the index tables so that first reads see empty tables instead of missing ones.
    pub fn init(db: &Database) -> Result<(), IndexError> {
        let tx = db.begin_write().map_err(IndexError::backend)?;
        {
            tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;
            tx.open_table(ROOM_WALLETS).map_err(IndexError::backend)?;
        }
        tx.commit().map_err(IndexError::backend)
    }
}

impl WalletIndex for RedbWalletIndex {
    async fn add_wallet_to_room(
        &self,
        address: &WalletAddress,
        code: &RoomCode,
    ) -> Result<(), IndexError> {
        let now = now_millis();

        let tx = self.db.begin_write().map_err(IndexError::backend)?;
        {
            let mut wallet_rooms = tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;
            let mut entry = get_entry::<WalletEntry>(&wallet_rooms, address.as_str())?;
            if !entry.rooms.contains(code) {
                entry.rooms.push(code.clone());
            }
            entry.last_updated = now;
            put_entry(&mut wallet_rooms, address.as_str(), &entry)?;

            let mut room_wallets = tx.open_table(ROOM_WALLETS).map_err(IndexError::backend)?;
            let mut entry = get_entry::<RoomEntry>(&room_wallets, code.as_str())?;
            if !entry.wallets.contains(address) {
                entry.wallets.push(address.clone());
            }
            entry.last_updated = now;
            put_entry(&mut room_wallets, code.as_str(), &entry)?;
        }
        tx.commit().map_err(IndexError::backend)
    }

    async fn remove_wallet_from_room(
        &self,
        address: &WalletAddress,
        code: &RoomCode,
    ) -> Result<(), IndexError> {
        let now = now_millis();

        let tx = self.db.begin_write().map_err(IndexError::backend)?;
        {
            let mut wallet_rooms = tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;
            let mut entry = get_entry::<WalletEntry>(&wallet_rooms, address.as_str())?;
            entry.rooms.retain(|room| room != code);
            if entry.rooms.is_empty() {
                wallet_rooms
                    .remove(address.as_str())
                    .map_err(IndexError::backend)?;
            } else {
                entry.last_updated = now;
                put_entry(&mut wallet_rooms, address.as_str(), &entry)?;
            }

            let mut room_wallets = tx.open_table(ROOM_WALLETS).map_err(IndexError::backend)?;
            let mut entry = get_entry::<RoomEntry>(&room_wallets, code.as_str())?;
            entry.wallets.retain(|wallet| wallet != address);
            if entry.wallets.is_empty() {
                room_wallets
                    .remove(code.as_str())
                    .map_err(IndexError::backend)?;
            } else {
                entry.last_updated = now;
                put_entry(&mut room_wallets, code.as_str(), &entry)?;
            }
        }
        tx.commit().map_err(IndexError::backend)
    }

    async fn rooms_for_wallet(&self, address: &WalletAddress) -> Result<Vec<RoomCode>, IndexError> {
        let tx = self.db.begin_read().map_err(IndexError::backend)?;
        let table = tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;

        let entry = match table.get(address.as_str()).map_err(IndexError::backend)? {
            Some(value) => serde_json::from_slice::<WalletEntry>(&value.value())?,
            None => WalletEntry::default(),
        };
        Ok(entry.rooms)
    }

    async fn wallets_for_room(&self, code: &RoomCode) -> Result<Vec<WalletAddress>, IndexError> {
        let tx = self.db.begin_read().map_err(IndexError::backend)?;
        let table = tx.open_table(ROOM_WALLETS).map_err(IndexError::backend)?;

        let entry = match table.get(code.as_str()).map_err(IndexError::backend)? {
            Some(value) => serde_json::from_slice::<RoomEntry>(&value.value())?,
            None => RoomEntry::default(),
        };
        Ok(entry.wallets)
    }

    async fn cleanup_room(&self, code: &RoomCode) -> Result<(), IndexError> {
        let tx = self.db.begin_write().map_err(IndexError::backend)?;
        {
            let mut room_wallets = tx.open_table(ROOM_WALLETS).map_err(IndexError::backend)?;
            let entry = get_entry::<RoomEntry>(&room_wallets, code.as_str())?;
            room_wallets
                .remove(code.as_str())
                .map_err(IndexError::backend)?;

            let mut wallet_rooms = tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;
            for address in &entry.wallets {
                let mut entry = get_entry::<WalletEntry>(&wallet_rooms, address.as_str())?;
                entry.rooms.retain(|room| room != code);
                if entry.rooms.is_empty() {
                    wallet_rooms
                        .remove(address.as_str())
                        .map_err(IndexError::backend)?;
                } else {
                    entry.last_updated = now_millis();
                    put_entry(&mut wallet_rooms, address.as_str(), &entry)?;
                }
            }
        }
        tx.commit().map_err(IndexError::backend)
    }

    async fn all_wallets(&self) -> Result<Vec<WalletAddress>, IndexError> {
        let tx = self.db.begin_read().map_err(IndexError::backend)?;
        let table = tx.open_table(WALLET_ROOMS).map_err(IndexError::backend)?;

        let mut wallets = Vec::new();
        for entry in table.iter().map_err(IndexError::backend)? {
            let (key, _) = entry.map_err(IndexError::backend)?;
            if let Ok(address) = WalletAddress::parse(key.value()) {
                wallets.push(address);
            }
        }
        Ok(wallets)
    }
}

fn get_entry<T>(table: &Table<'_, &str, Vec<u8>>, key: &str) -> Result<T, IndexError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match table.get(key).map_err(IndexError::backend)? {
        Some(value) => Ok(serde_json::from_slice(&value.value())?),
        None => Ok(T::default()),
    }
}

fn put_entry<T>(table: &mut Table<'_, &str, Vec<u8>>, key: &str, entry: &T) -> Result<(), IndexError>
where
    T: Serialize,
{
    let encoded = serde_json::to_vec(entry)?;
    table.insert(key, encoded).map_err(IndexError::backend)?;
    Ok(())
}
