// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{SwapEvent, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages sent to room subscribers. Every frame serialises as `{"type": …, "data": …}` with a
/// snake_case discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RoomMessage {
    Swap(SwapEvent),

    Presence {
        count: usize,
    },

    WalletAdded {
        address: WalletAddress,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },

    WalletRemoved {
        address: WalletAddress,
    },

    #[serde(rename_all = "camelCase")]
    ConfigUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        telegram_webhook: Option<String>,
    },

    Pong {
        timestamp: u64,
    },

    RoomData {
        wallets: Vec<WalletAddress>,
        labels: BTreeMap<WalletAddress, String>,
        presence: usize,
    },
}

/// Messages received from room subscribers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping {
        #[serde(default)]
        data: PingData,
    },

    GetRoomData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PingData {
    #[serde(default)]
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use crate::domain::{ClientMessage, RoomMessage, WalletAddress};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_room_message_wire_shape() {
        let address =
            WalletAddress::parse("0xabcdef0123456789abcdef0123456789abcdef01").expect("valid");
        let message = RoomMessage::WalletAdded {
            address,
            label: Some("whale".to_string()),
        };

        let wire = serde_json::to_value(&message).expect("message can be serialized");
        assert_eq!(
            wire,
            json!({
                "type": "wallet_added",
                "data": {
                    "address": "0xabcdef0123456789abcdef0123456789abcdef01",
                    "label": "whale",
                },
            })
        );

        let presence = serde_json::to_value(RoomMessage::Presence { count: 3 })
            .expect("message can be serialized");
        assert_eq!(presence, json!({ "type": "presence", "data": { "count": 3 } }));
    }

    #[test]
    fn test_config_updated_redacts_via_camel_case_field() {
        let message = RoomMessage::ConfigUpdated {
            threshold: Some(1000.0),
            telegram_webhook: Some("***".to_string()),
        };
        let wire = serde_json::to_value(&message).expect("message can be serialized");
        assert_eq!(
            wire,
            json!({
                "type": "config_updated",
                "data": { "threshold": 1000.0, "telegramWebhook": "***" },
            })
        );
    }

    #[test]
    fn test_client_message() {
        let ping = serde_json::from_value::<ClientMessage>(
            json!({ "type": "ping", "data": { "timestamp": 42 } }),
        )
        .expect("ping can be deserialized");
        assert_matches!(ping, ClientMessage::Ping { data } if data.timestamp == 42);

        let bare_ping = serde_json::from_value::<ClientMessage>(json!({ "type": "ping" }))
            .expect("bare ping can be deserialized");
        assert_matches!(bare_ping, ClientMessage::Ping { data } if data.timestamp == 0);

        let get_room_data =
            serde_json::from_value::<ClientMessage>(json!({ "type": "get_room_data" }))
                .expect("get_room_data can be deserialized");
        assert_matches!(get_room_data, ClientMessage::GetRoomData);
    }
}
