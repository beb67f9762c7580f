// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{
    LabelMap, RoomStorage, SessionId, SessionRegistry, SessionSender, SwapNotifier,
    format_swap_message,
};
use log::warn;
use serde::{Deserialize, Serialize};
use swapwatch_common::domain::{
    MAX_TRACKED_WALLETS, RoomCode, RoomConfig, RoomError, RoomMessage, SwapEvent, WalletAddress,
    hours_to_millis, now_millis, validate_extension_hours, validate_label,
    validate_telegram_webhook, validate_threshold,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub config: Option<CreateRoomConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomConfig {
    #[serde(default)]
    pub threshold: Option<f64>,

    #[serde(default)]
    pub telegram_webhook: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendRoomRequest {
    #[serde(default)]
    pub hours: Option<u64>,
}

/// Body of a wallet add request; the address may arrive under `wallet` or `address`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddWalletRequest {
    #[serde(default)]
    pub wallet: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub label: Option<String>,
}

impl AddWalletRequest {
    pub fn address_str(&self) -> &str {
        self.address
            .as_deref()
            .or(self.wallet.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWalletRequest {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    #[serde(default)]
    pub threshold: Option<f64>,

    #[serde(default)]
    pub telegram_webhook: Option<String>,
}

/// A tracked wallet paired with its optional label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletEntry {
    pub address: WalletAddress,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Outcome of a swap RPC: whether the broadcast reached any session and whether the external push
/// went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDelivery {
    pub delivered: bool,
    pub telegram_sent: bool,
}

/// Point-in-time view of a room's state.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    pub wallets: Vec<WalletAddress>,
    pub labels: LabelMap,
    pub presence: usize,
}

/// One room's state machine: wallets, labels, config, and live sessions, all driven through the
/// owning actor so operations are strictly serialised.
pub struct Room<S, N> {
    code: RoomCode,
    storage: S,
    notifier: N,
    sessions: SessionRegistry,
}

impl<S, N> Room<S, N>
where
    S: RoomStorage,
    N: SwapNotifier,
{
    pub fn new(code: RoomCode, storage: S, notifier: N) -> Self {
        Self {
            code,
            storage,
            notifier,
            sessions: SessionRegistry::default(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Create this room: validate the optional config fields, persist the config with the default
    /// lifetime, and return it. Creating an existing room is a conflict.
    pub async fn create(&mut self, request: CreateRoomRequest) -> Result<RoomConfig, RoomError> {
        if self.storage.get_config().await?.is_some() {
            return Err(RoomError::conflict(format!(
                "room {} already exists",
                self.code
            )));
        }

        let (threshold, telegram_webhook) = match &request.config {
            Some(config) => (
                validate_threshold(config.threshold)?,
                validate_telegram_webhook(config.telegram_webhook.as_deref())?,
            ),
            None => (None, None),
        };

        let mut config = RoomConfig::new(now_millis());
        config.created_by = request.created_by;
        config.threshold = threshold;
        config.telegram_webhook = telegram_webhook;

        self.storage.put_config(&config).await?;
        Ok(config)
    }

    /// Move the expiry to `now + hours` and return the updated config.
    pub async fn extend(&mut self, request: ExtendRoomRequest) -> Result<RoomConfig, RoomError> {
        let hours = validate_extension_hours(request.hours)?;

        let mut config = self.require_config().await?;
        config.expires_at = now_millis() + hours_to_millis(hours);
        self.storage.put_config(&config).await?;

        Ok(config)
    }

    /// Tracked wallets with their labels, in insertion order.
    pub async fn wallets(&self) -> Result<Vec<WalletEntry>, RoomError> {
        let wallets = self.storage.get_wallets().await?;
        let mut labels = self.storage.get_labels().await?;

        Ok(wallets
            .into_iter()
            .map(|address| {
                let label = labels.remove(&address);
                WalletEntry { address, label }
            })
            .collect())
    }

    pub async fn add_wallet(&mut self, request: AddWalletRequest) -> Result<WalletEntry, RoomError> {
        let address = WalletAddress::parse(request.address_str())
            .map_err(|error| RoomError::validation(error.to_string()))?;
        let label = validate_label(request.label.as_deref())?;

        let mut wallets = self.storage.get_wallets().await?;
        if wallets.contains(&address) {
            return Err(RoomError::conflict(format!(
                "wallet {address} is already tracked"
            )));
        }
        if wallets.len() >= MAX_TRACKED_WALLETS {
            return Err(RoomError::conflict(format!(
                "room tracks the maximum of {MAX_TRACKED_WALLETS} wallets"
            )));
        }

        wallets.push(address.clone());
        self.storage.put_wallets(&wallets).await?;

        if let Some(label) = &label {
            let mut labels = self.storage.get_labels().await?;
            labels.insert(address.clone(), label.clone());
            self.storage.put_labels(&labels).await?;
        }

        self.sessions.broadcast(&RoomMessage::WalletAdded {
            address: address.clone(),
            label: label.clone(),
        });

        Ok(WalletEntry { address, label })
    }

    pub async fn remove_wallet(&mut self, address: &str) -> Result<(), RoomError> {
        let address = WalletAddress::parse(address)
            .map_err(|error| RoomError::validation(error.to_string()))?;

        let mut wallets = self.storage.get_wallets().await?;
        let Some(position) = wallets.iter().position(|wallet| *wallet == address) else {
            return Err(RoomError::not_found(format!(
                "wallet {address} is not tracked"
            )));
        };
        wallets.remove(position);
        self.storage.put_wallets(&wallets).await?;

        let mut labels = self.storage.get_labels().await?;
        if labels.remove(&address).is_some() {
            self.storage.put_labels(&labels).await?;
        }

        self.sessions
            .broadcast(&RoomMessage::WalletRemoved { address });

        Ok(())
    }

    /// Update the label of a tracked wallet; an absent or empty label removes it.
    pub async fn update_wallet(
        &mut self,
        address: &str,
        request: UpdateWalletRequest,
    ) -> Result<WalletEntry, RoomError> {
        let address = WalletAddress::parse(address)
            .map_err(|error| RoomError::validation(error.to_string()))?;

        let wallets = self.storage.get_wallets().await?;
        if !wallets.contains(&address) {
            return Err(RoomError::not_found(format!(
                "wallet {address} is not tracked"
            )));
        }

        let label = validate_label(request.label.as_deref())?;
        let mut labels = self.storage.get_labels().await?;
        match &label {
            Some(label) => {
                labels.insert(address.clone(), label.clone());
            }
            None => {
                labels.remove(&address);
            }
        }
        self.storage.put_labels(&labels).await?;

        Ok(WalletEntry { address, label })
    }

    pub async fn config(&self) -> Result<Option<RoomConfig>, RoomError> {
        Ok(self.storage.get_config().await?)
    }

    async fn require_config(&self) -> Result<RoomConfig, RoomError> {
        self.storage.get_config().await?.ok_or_else(|| {
            RoomError::not_found(format!("room {} does not exist", self.code))
        })
    }

    /// Merge the given fields into the config, creating a default one with the standard lifetime
    /// if the room has none yet, and broadcast the update with the webhook redacted.
    pub async fn update_config(
        &mut self,
        request: UpdateConfigRequest,
    ) -> Result<RoomConfig, RoomError> {
        let threshold = validate_threshold(request.threshold)?;
        let telegram_webhook = validate_telegram_webhook(request.telegram_webhook.as_deref())?;

        let mut config = match self.storage.get_config().await? {
            Some(config) => config,
            None => RoomConfig::new(now_millis()),
        };
        if let Some(threshold) = threshold {
            config.threshold = Some(threshold);
        }
        if let Some(telegram_webhook) = telegram_webhook {
            config.telegram_webhook = Some(telegram_webhook);
        }
        self.storage.put_config(&config).await?;

        let redacted = config.redacted();
        self.sessions.broadcast(&RoomMessage::ConfigUpdated {
            threshold: redacted.threshold,
            telegram_webhook: redacted.telegram_webhook,
        });

        Ok(config)
    }

    pub fn presence(&self) -> usize {
        self.sessions.count()
    }

    pub async fn has_wallet(&self, address: &WalletAddress) -> Result<bool, RoomError> {
        Ok(self.storage.get_wallets().await?.contains(address))
    }

    /// Broadcast the swap to all sessions and, if a Telegram webhook is configured and the amount
    /// reaches the threshold (absent meaning zero), push it externally. Push failures are logged,
    /// never propagated.
    pub async fn notify_swap(&mut self, event: SwapEvent) -> Result<SwapDelivery, RoomError> {
        let delivered_to = self.sessions.broadcast(&RoomMessage::Swap(event.clone()));
        metrics::counter!("swapwatch_swap_broadcasts_total").increment(1);

        let config = self.storage.get_config().await?;
        let telegram_sent = match config.as_ref().and_then(|config| {
            config
                .telegram_webhook
                .as_deref()
                .map(|webhook| (webhook, config.threshold.unwrap_or(0.0)))
        }) {
            Some((webhook, threshold)) if event.amount_in_usd >= threshold => {
                match self
                    .notifier
                    .notify(webhook, &format_swap_message(&event))
                    .await
                {
                    Ok(()) => {
                        metrics::counter!("swapwatch_telegram_pushes_total").increment(1);
                        true
                    }
                    Err(error) => {
                        warn!(room:% = self.code, error:%; "cannot deliver external push");
                        false
                    }
                }
            }
            _ => false,
        };

        Ok(SwapDelivery {
            delivered: delivered_to > 0,
            telegram_sent,
        })
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        Ok(RoomSnapshot {
            wallets: self.storage.get_wallets().await?,
            labels: self.storage.get_labels().await?,
            presence: self.sessions.count(),
        })
    }

    /// Track a new session and re-broadcast presence.
    pub fn subscribe(&mut self, sender: SessionSender) -> SessionId {
        let id = self.sessions.track(sender);
        self.broadcast_presence();
        id
    }

    /// Untrack a closed or errored session and re-broadcast presence.
    pub fn unsubscribe(&mut self, id: SessionId) {
        self.sessions.untrack(id);
        self.broadcast_presence();
    }

    pub fn send_to(&mut self, id: SessionId, message: &RoomMessage) -> bool {
        self.sessions.send(id, message)
    }

    /// Mass-close all sessions, delete all durable state. Returns the number of sessions closed.
    pub async fn cleanup(&mut self, reason: &str) -> Result<usize, RoomError> {
        let closed = self.sessions.close_all(1000, reason);
        self.storage.delete_all().await?;
        Ok(closed)
    }

    fn broadcast_presence(&mut self) {
        let count = self.sessions.count();
        self.sessions.broadcast(&RoomMessage::Presence { count });
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            AddWalletRequest, CreateRoomConfig, CreateRoomRequest, ExtendRoomRequest, NotifyError,
            Room, SessionEvent, SwapNotifier, UpdateConfigRequest, UpdateWalletRequest,
        },
        infra::InMemRoomStorage,
    };
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use swapwatch_common::domain::{RoomCode, RoomError, SwapEvent, WalletAddress, now_millis};
    use tokio::sync::mpsc;

    const ADDRESS: &str = "0xAbCdEf0123456789aBcDeF0123456789abcdef01";
    const CANONICAL: &str = "0xabcdef0123456789abcdef0123456789abcdef01";
    const WEBHOOK: &str = "https://api.telegram.org/bot123:token/sendMessage";

    /// Notifier recording every delivery attempt.
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        deliveries: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    impl SwapNotifier for RecordingNotifier {
        async fn notify(&self, webhook_url: &str, text: &str) -> Result<(), NotifyError> {
            self.deliveries
                .lock()
                .push((webhook_url.to_owned(), text.to_owned()));
            if self.fail {
                Err(NotifyError::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn room() -> Room<InMemRoomStorage, RecordingNotifier> {
        room_with_notifier(RecordingNotifier::default())
    }

    fn room_with_notifier(
        notifier: RecordingNotifier,
    ) -> Room<InMemRoomStorage, RecordingNotifier> {
        Room::new(
            RoomCode::parse("ABC123").expect("room code is valid"),
            InMemRoomStorage::default(),
            notifier,
        )
    }

    fn add_request(address: &str, label: Option<&str>) -> AddWalletRequest {
        AddWalletRequest {
            wallet: None,
            address: Some(address.to_owned()),
            label: label.map(str::to_owned),
        }
    }

    fn swap(amount_in_usd: f64) -> SwapEvent {
        SwapEvent {
            tx_hash: "0xdeadbeef".to_string(),
            wallet_address: WalletAddress::parse(ADDRESS).expect("address is valid"),
            token_in: None,
            token_out: None,
            amount_in_usd,
            amount_out_usd: None,
            timestamp: None,
            enrichment: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_then_create_conflicts() {
        let mut room = room();

        let config = room
            .create(CreateRoomRequest::default())
            .await
            .expect("room can be created");
        assert!(config.expires_at > config.created_at);

        let result = room.create(CreateRoomRequest::default()).await;
        assert_matches!(result, Err(RoomError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_validates_config() {
        let mut room = room();

        let result = room
            .create(CreateRoomRequest {
                created_by: None,
                config: Some(CreateRoomConfig {
                    threshold: Some(-1.0),
                    telegram_webhook: None,
                }),
            })
            .await;
        assert_matches!(result, Err(RoomError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extend() {
        let mut room = room();
        room.create(CreateRoomRequest::default())
            .await
            .expect("room can be created");

        let config = room
            .extend(ExtendRoomRequest { hours: Some(48) })
            .await
            .expect("room can be extended");
        assert!(config.expires_at >= now_millis() + 47 * 60 * 60 * 1000);

        let result = room.extend(ExtendRoomRequest { hours: Some(49) }).await;
        assert_matches!(result, Err(RoomError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extend_missing_room() {
        let mut room = room();
        let result = room.extend(ExtendRoomRequest::default()).await;
        assert_matches!(result, Err(RoomError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_wallet_canonicalises_and_broadcasts() {
        let mut room = room();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        room.subscribe(sender);
        receiver.try_recv().expect("presence was broadcast on subscribe");

        let entry = room
            .add_wallet(add_request(ADDRESS, Some("whale")))
            .await
            .expect("wallet can be added");
        assert_eq!(entry.address.as_str(), CANONICAL);
        assert_eq!(entry.label.as_deref(), Some("whale"));

        let event = receiver.try_recv().expect("wallet_added was broadcast");
        assert_matches!(
            event,
            SessionEvent::Frame(frame) if frame.contains("wallet_added") && frame.contains(CANONICAL)
        );
    }

    #[tokio::test]
    async fn test_add_wallet_duplicate_conflicts() {
        let mut room = room();
        room.add_wallet(add_request(ADDRESS, None))
            .await
            .expect("wallet can be added");

        // Same address in different case is the same wallet.
        let result = room.add_wallet(add_request(CANONICAL, None)).await;
        assert_matches!(result, Err(RoomError::Conflict(_)));

        let wallets = room.wallets().await.expect("wallets can be read");
        assert_eq!(wallets.len(), 1);
    }

    #[tokio::test]
    async fn test_add_wallet_limit() {
        let mut room = room();
        for i in 0..50 {
            let address = format!("0x{i:040x}");
            room.add_wallet(add_request(&address, None))
                .await
                .expect("wallet can be added");
        }

        let result = room.add_wallet(add_request(ADDRESS, None)).await;
        assert_matches!(result, Err(RoomError::Conflict(_)));

        let wallets = room.wallets().await.expect("wallets can be read");
        assert_eq!(wallets.len(), 50);
    }

    #[tokio::test]
    async fn test_remove_wallet_round_trip() {
        let mut room = room();

        room.add_wallet(add_request(ADDRESS, Some("whale")))
            .await
            .expect("wallet can be added");
        room.remove_wallet(ADDRESS)
            .await
            .expect("wallet can be removed");

        let snapshot = room.snapshot().await.expect("snapshot can be read");
        assert!(snapshot.wallets.is_empty());
        assert!(snapshot.labels.is_empty());

        let result = room.remove_wallet(ADDRESS).await;
        assert_matches!(result, Err(RoomError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_wallet_label() {
        let mut room = room();
        room.add_wallet(add_request(ADDRESS, Some("whale")))
            .await
            .expect("wallet can be added");

        let entry = room
            .update_wallet(
                ADDRESS,
                UpdateWalletRequest {
                    label: Some("shark".to_string()),
                },
            )
            .await
            .expect("label can be updated");
        assert_eq!(entry.label.as_deref(), Some("shark"));

        // Empty label removes the entry.
        let entry = room
            .update_wallet(
                ADDRESS,
                UpdateWalletRequest {
                    label: Some("  ".to_string()),
                },
            )
            .await
            .expect("label can be cleared");
        assert_eq!(entry.label, None);

        let snapshot = room.snapshot().await.expect("snapshot can be read");
        assert!(snapshot.labels.is_empty());

        let result = room
            .update_wallet(
                "0x0000000000000000000000000000000000000099",
                UpdateWalletRequest::default(),
            )
            .await;
        assert_matches!(result, Err(RoomError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_config_merges() {
        let mut room = room();

        let config = room
            .update_config(UpdateConfigRequest {
                threshold: Some(1000.0),
                telegram_webhook: None,
            })
            .await
            .expect("config can be updated");
        assert_eq!(config.threshold, Some(1000.0));

        // An empty update preserves earlier fields.
        let config = room
            .update_config(UpdateConfigRequest::default())
            .await
            .expect("config can be updated");
        assert_eq!(config.threshold, Some(1000.0));

        let config = room
            .update_config(UpdateConfigRequest {
                threshold: None,
                telegram_webhook: Some(WEBHOOK.to_string()),
            })
            .await
            .expect("config can be updated");
        assert_eq!(config.threshold, Some(1000.0));
        assert_eq!(config.telegram_webhook.as_deref(), Some(WEBHOOK));
    }

    #[tokio::test]
    async fn test_update_config_broadcast_redacts_webhook() {
        let mut room = room();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        room.subscribe(sender);
        receiver.try_recv().expect("presence was broadcast");

        room.update_config(UpdateConfigRequest {
            threshold: None,
            telegram_webhook: Some(WEBHOOK.to_string()),
        })
        .await
        .expect("config can be updated");

        let event = receiver.try_recv().expect("config_updated was broadcast");
        assert_matches!(
            event,
            SessionEvent::Frame(frame) if frame.contains("config_updated")
                && frame.contains("***")
                && !frame.contains("api.telegram.org")
        );
    }

    #[tokio::test]
    async fn test_notify_swap_threshold_gating() {
        let notifier = RecordingNotifier::default();
        let mut room = room_with_notifier(notifier.clone());

        room.update_config(UpdateConfigRequest {
            threshold: Some(1000.0),
            telegram_webhook: Some(WEBHOOK.to_string()),
        })
        .await
        .expect("config can be updated");

        let delivery = room.notify_swap(swap(999.0)).await.expect("swap notified");
        assert!(!delivery.telegram_sent);
        assert!(notifier.deliveries.lock().is_empty());

        let delivery = room.notify_swap(swap(1000.0)).await.expect("swap notified");
        assert!(delivery.telegram_sent);
        assert_eq!(notifier.deliveries.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_notify_swap_without_webhook_never_pushes() {
        let notifier = RecordingNotifier::default();
        let mut room = room_with_notifier(notifier.clone());

        room.update_config(UpdateConfigRequest {
            threshold: Some(0.0),
            telegram_webhook: None,
        })
        .await
        .expect("config can be updated");

        let delivery = room.notify_swap(swap(5000.0)).await.expect("swap notified");
        assert!(!delivery.telegram_sent);
        assert!(notifier.deliveries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_notify_swap_push_failure_is_swallowed() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let mut room = room_with_notifier(notifier.clone());

        room.update_config(UpdateConfigRequest {
            threshold: None,
            telegram_webhook: Some(WEBHOOK.to_string()),
        })
        .await
        .expect("config can be updated");

        let delivery = room.notify_swap(swap(1.0)).await.expect("swap notified");
        assert!(!delivery.telegram_sent);
        assert_eq!(notifier.deliveries.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_notify_swap_delivery_reflects_sessions() {
        let mut room = room();

        let delivery = room.notify_swap(swap(1.0)).await.expect("swap notified");
        assert!(!delivery.delivered);

        let (sender, mut receiver) = mpsc::unbounded_channel();
        room.subscribe(sender);
        receiver.try_recv().expect("presence was broadcast");

        let delivery = room.notify_swap(swap(1.0)).await.expect("swap notified");
        assert!(delivery.delivered);
        let event = receiver.try_recv().expect("swap was broadcast");
        assert_matches!(event, SessionEvent::Frame(frame) if frame.contains("\"type\":\"swap\""));
    }

    #[tokio::test]
    async fn test_cleanup_clears_everything() {
        let mut room = room();
        room.create(CreateRoomRequest::default())
            .await
            .expect("room can be created");
        room.add_wallet(add_request(ADDRESS, Some("whale")))
            .await
            .expect("wallet can be added");

        let (sender, mut receiver) = mpsc::unbounded_channel();
        room.subscribe(sender);
        receiver.try_recv().expect("presence was broadcast");

        let closed = room.cleanup("Room expired").await.expect("cleanup runs");
        assert_eq!(closed, 1);
        assert_matches!(
            receiver.try_recv().expect("close was delivered"),
            SessionEvent::Close { code: 1000, reason } if reason == "Room expired"
        );

        let snapshot = room.snapshot().await.expect("snapshot can be read");
        assert!(snapshot.wallets.is_empty());
        assert!(snapshot.labels.is_empty());
        assert_matches!(room.config().await, Ok(None));
    }

    #[tokio::test]
    async fn test_presence_follows_subscriptions() {
        let mut room = room();
        assert_eq!(room.presence(), 0);

        let (sender, _receiver) = mpsc::unbounded_channel();
        let id = room.subscribe(sender);
        assert_eq!(room.presence(), 1);

        room.unsubscribe(id);
        assert_eq!(room.presence(), 0);
    }

    #[tokio::test]
    async fn test_has_wallet() {
        let mut room = room();
        room.add_wallet(add_request(ADDRESS, None))
            .await
            .expect("wallet can be added");

        let wallet = WalletAddress::parse(ADDRESS).expect("address is valid");
        assert!(room.has_wallet(&wallet).await.expect("membership can be read"));

        let other =
            WalletAddress::parse("0x0000000000000000000000000000000000000001").expect("valid");
        assert!(!room.has_wallet(&other).await.expect("membership can be read"));
    }
}
