// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::WalletIndex;
use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use swapwatch_common::domain::WalletAddress;

const KEY_NAME_HEADER: &str = "X-Provider-Key-Name";

/// Upstream provider credentials and the URL of its webhook configuration resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub webhook_url: String,
    pub key_name: String,
    pub private_key: SecretString,
}

/// Best-effort reconciliation of the upstream provider's webhook address filter with the union of
/// tracked wallets. Failures are logged and never propagated to the triggering operation; the
/// next write converges again.
#[derive(Clone)]
pub struct FilterSync<I> {
    index: I,
    client: reqwest::Client,
    config: Option<ProviderConfig>,
}

impl<I> FilterSync<I>
where
    I: WalletIndex,
{
    pub fn new(
        index: I,
        config: Option<ProviderConfig>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            index,
            client,
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Recompute the union of tracked wallets and PATCH the provider filter. Skips silently when
    /// unconfigured or when the union is empty.
    pub async fn sync(&self) {
        let Some(config) = &self.config else {
            return;
        };

        let addresses = match self.index.all_wallets().await {
            Ok(addresses) => addresses,
            Err(error) => {
                warn!(error:%; "cannot read wallet union for filter sync");
                return;
            }
        };
        if addresses.is_empty() {
            return;
        }

        let result = self
            .client
            .patch(&config.webhook_url)
            .header(KEY_NAME_HEADER, &config.key_name)
            .bearer_auth(config.private_key.expose_secret())
            .json(&filter_payload(&addresses))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(addresses = addresses.len(); "provider filter synced");
            }
            Ok(response) => {
                warn!(status:% = response.status(); "provider rejected filter sync");
            }
            Err(error) => {
                warn!(error:%; "cannot reach provider for filter sync");
            }
        }
    }

    /// Fire-and-forget variant used after index writes.
    pub fn spawn_sync(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            this.sync().await;
        });
    }
}

fn filter_payload(addresses: &[WalletAddress]) -> Value {
    json!({ "filters": { "addresses": addresses } })
}

#[cfg(test)]
mod tests {
    use super::{FilterSync, filter_payload};
    use serde_json::json;
    use std::time::Duration;
    use swapwatch_common::domain::WalletAddress;

    #[test]
    fn test_filter_payload() {
        let addresses = vec![
            WalletAddress::parse("0xabcdef0123456789abcdef0123456789abcdef01").expect("valid"),
            WalletAddress::parse("0x0000000000000000000000000000000000000002").expect("valid"),
        ];

        assert_eq!(
            filter_payload(&addresses),
            json!({
                "filters": {
                    "addresses": [
                        "0xabcdef0123456789abcdef0123456789abcdef01",
                        "0x0000000000000000000000000000000000000002",
                    ],
                },
            })
        );
    }

    #[tokio::test]
    async fn test_unconfigured_sync_is_a_noop() {
        // A recording index would flag any read; the unconfigured sync must return before
        // touching the index at all.
        #[derive(Clone)]
        struct PanickingIndex;

        impl crate::domain::WalletIndex for PanickingIndex {
            async fn add_wallet_to_room(
                &self,
                _: &WalletAddress,
                _: &swapwatch_common::domain::RoomCode,
            ) -> Result<(), crate::domain::IndexError> {
                panic!("index must not be touched")
            }

            async fn remove_wallet_from_room(
                &self,
                _: &WalletAddress,
                _: &swapwatch_common::domain::RoomCode,
            ) -> Result<(), crate::domain::IndexError> {
                panic!("index must not be touched")
            }

            async fn rooms_for_wallet(
                &self,
                _: &WalletAddress,
            ) -> Result<Vec<swapwatch_common::domain::RoomCode>, crate::domain::IndexError>
            {
                panic!("index must not be touched")
            }

            async fn wallets_for_room(
                &self,
                _: &swapwatch_common::domain::RoomCode,
            ) -> Result<Vec<WalletAddress>, crate::domain::IndexError> {
                panic!("index must not be touched")
            }

            async fn cleanup_room(
                &self,
                _: &swapwatch_common::domain::RoomCode,
            ) -> Result<(), crate::domain::IndexError> {
                panic!("index must not be touched")
            }

            async fn all_wallets(&self) -> Result<Vec<WalletAddress>, crate::domain::IndexError> {
                panic!("index must not be touched")
            }
        }

        let sync = FilterSync::new(PanickingIndex, None, Duration::from_secs(1))
            .expect("client can be built");
        assert!(!sync.is_configured());
        sync.sync().await;
    }
}
