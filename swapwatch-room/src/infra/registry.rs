// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    domain::{CleanupHook, CreateRoomRequest, Room, RoomStorage, StorageError, SwapNotifier},
    infra::{
        RedbRoomStorage, RoomActor, RoomHandle,
        actor::MAILBOX_CAPACITY,
        redb_storage::all_configs,
    },
};
use dashmap::DashMap;
use log::info;
use redb::Database;
use std::sync::Arc;
use swapwatch_common::domain::{RoomCode, RoomConfig, RoomError, now_millis};
use tokio::sync::mpsc;

/// Registry of live room actors keyed by room code. Spawns actors over redb storage and drops
/// their entries again when the task ends.
#[derive(Clone)]
pub struct RoomRegistry<N, H> {
    rooms: Arc<DashMap<RoomCode, RoomHandle>>,
    db: Arc<Database>,
    notifier: N,
    hook: H,
}

impl<N, H> RoomRegistry<N, H>
where
    N: SwapNotifier,
    H: CleanupHook,
{
    pub fn new(db: Arc<Database>, notifier: N, hook: H) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            db,
            notifier,
            hook,
        }
    }

    /// Handle of the live room with the given code, if any.
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).map(|handle| handle.clone())
    }

    pub fn live_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Create the room, spawning its actor first if needed. An already created room is rejected
    /// by the actor with a conflict.
    pub async fn create(
        &self,
        code: &RoomCode,
        request: CreateRoomRequest,
    ) -> Result<RoomConfig, RoomError> {
        let handle = self.get_or_spawn(code, None);
        handle.create(request).await
    }

    /// Respawn an armed actor per persisted room; rooms already past their expiry are destroyed.
    /// Returns the number of restored rooms.
    pub async fn restore(&self) -> Result<usize, StorageError> {
        let configs = all_configs(&self.db)?;
        let now = now_millis();

        let mut restored = 0;
        for (code, config) in configs {
            if config.expires_at <= now {
                info!(room:% = code; "destroying expired room at startup");
                RedbRoomStorage::new(self.db.clone(), code.clone())
                    .delete_all()
                    .await?;
                self.hook.room_destroyed(&code).await;
            } else {
                self.get_or_spawn(&code, Some(config.expires_at));
                restored += 1;
            }
        }

        Ok(restored)
    }

    fn get_or_spawn(&self, code: &RoomCode, alarm_at: Option<u64>) -> RoomHandle {
        self.rooms
            .entry(code.clone())
            .or_insert_with(|| self.spawn(code.clone(), alarm_at))
            .clone()
    }

    fn spawn(&self, code: RoomCode, alarm_at: Option<u64>) -> RoomHandle {
        let (commands, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let handle = RoomHandle::new(commands);

        let storage = RedbRoomStorage::new(self.db.clone(), code.clone());
        let room = Room::new(code.clone(), storage, self.notifier.clone());
        let actor = RoomActor::new(room, receiver, self.hook.clone(), alarm_at);

        let rooms = self.rooms.clone();
        let spawned = handle.clone();
        tokio::spawn(async move {
            metrics::gauge!("swapwatch_rooms_active").increment(1.0);
            actor.run().await;
            metrics::gauge!("swapwatch_rooms_active").decrement(1.0);
            // Only drop the entry if it still points at this actor, not at a respawn.
            rooms.remove_if(&code, |_, existing| existing.same_channel(&spawned));
        });

        handle
    }
}
