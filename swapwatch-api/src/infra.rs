// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod api;

use log::warn;
use secrecy::SecretString;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use swapwatch_common::domain::RoomCode;
use swapwatch_index::{
    domain::WalletIndex,
    infra::{FilterSync, ProviderConfig, RedbWalletIndex},
};
use swapwatch_room::domain::CleanupHook;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "api")]
    pub api_config: api::Config,

    #[serde(rename = "storage")]
    pub storage_config: StorageConfig,

    #[serde(rename = "webhook")]
    pub webhook_config: WebhookConfig,

    #[serde(rename = "provider", default)]
    pub provider_config: Option<ProviderConfig>,

    #[serde(rename = "outbound", default)]
    pub outbound_config: OutboundConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the embedded database file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Secret used to verify inbound webhook signatures.
    pub secret: SecretString,
}

/// Timeouts for outbound HTTP side effects; both are best-effort calls that are logged and
/// abandoned on expiry.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboundConfig {
    #[serde(with = "humantime_serde", default = "default_outbound_timeout")]
    pub push_timeout: Duration,

    #[serde(with = "humantime_serde", default = "default_outbound_timeout")]
    pub filter_sync_timeout: Duration,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            push_timeout: default_outbound_timeout(),
            filter_sync_timeout: default_outbound_timeout(),
        }
    }
}

fn default_outbound_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Bridges room destruction to the shared wallet index and the provider filter.
#[derive(Clone)]
pub struct IndexCleanupHook {
    index: RedbWalletIndex,
    filter_sync: FilterSync<RedbWalletIndex>,
}

impl IndexCleanupHook {
    pub fn new(index: RedbWalletIndex, filter_sync: FilterSync<RedbWalletIndex>) -> Self {
        Self { index, filter_sync }
    }
}

impl CleanupHook for IndexCleanupHook {
    async fn room_destroyed(&self, code: &RoomCode) {
        if let Err(error) = self.index.cleanup_room(code).await {
            warn!(room:% = code, error:%; "cannot clean up wallet index");
        }
        self.filter_sync.spawn_sync();
    }
}
