// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::WalletAddress;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KNOWN_FIELDS: [&str; 7] = [
    "txHash",
    "walletAddress",
    "tokenIn",
    "tokenOut",
    "amountInUsd",
    "amountOutUsd",
    "timestamp",
];

/// A swap event as fanned out to rooms. Transient, never persisted. Produced by the webhook
/// ingress from a provider wallet-activity notification; unknown payload fields are carried
/// through opaquely as enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
    #[serde(default)]
    pub tx_hash: String,

    pub wallet_address: WalletAddress,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_in: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_out: Option<String>,

    #[serde(default)]
    pub amount_in_usd: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_out_usd: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    #[serde(flatten)]
    pub enrichment: Map<String, Value>,
}

impl SwapEvent {
    /// Build a swap event from an arbitrary provider payload and the already extracted wallet
    /// address. Known fields are lifted, everything else remains as enrichment.
    pub fn from_webhook(body: &Value, wallet_address: WalletAddress) -> Self {
        let string_field = |key| body.get(key).and_then(Value::as_str).map(str::to_owned);

        let enrichment = body
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            tx_hash: string_field("txHash").unwrap_or_default(),
            wallet_address,
            token_in: string_field("tokenIn"),
            token_out: string_field("tokenOut"),
            amount_in_usd: body
                .get("amountInUsd")
                .and_then(Value::as_f64)
                .unwrap_or_default(),
            amount_out_usd: body.get("amountOutUsd").and_then(Value::as_f64),
            timestamp: body.get("timestamp").and_then(Value::as_u64),
            enrichment,
        }
    }
}

/// Locate the affected wallet address in a provider payload, probing the known carrier fields in
/// order: `from`, `to`, `walletAddress`, `addresses[0]`.
pub fn extract_wallet(body: &Value) -> Option<&str> {
    body.get("from")
        .and_then(Value::as_str)
        .or_else(|| body.get("to").and_then(Value::as_str))
        .or_else(|| body.get("walletAddress").and_then(Value::as_str))
        .or_else(|| {
            body.get("addresses")
                .and_then(Value::as_array)
                .and_then(|addresses| addresses.first())
                .and_then(Value::as_str)
        })
}
