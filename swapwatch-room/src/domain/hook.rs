// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use swapwatch_common::domain::RoomCode;

/// Invoked after a room has destroyed its durable state, so shared indexes can converge.
#[trait_variant::make(Send)]
pub trait CleanupHook
where
    Self: Clone + Send + Sync + 'static,
{
    async fn room_destroyed(&self, code: &RoomCode);
}

/// Hook for setups without shared indexes.
#[derive(Debug, Clone, Default)]
pub struct NoopCleanupHook;

impl CleanupHook for NoopCleanupHook {
    async fn room_destroyed(&self, _code: &RoomCode) {}
}
