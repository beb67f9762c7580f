// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::infra::api::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::future;
use log::{debug, error};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use swapwatch_common::{
    domain::{SwapEvent, WalletAddress, extract_wallet},
    signature,
};
use swapwatch_index::domain::WalletIndex;

const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Webhook ingress: verify the HMAC signature, locate the affected wallet, look up the rooms
/// tracking it, and fan the event out to each room in parallel. Per-room failures are recorded in
/// the response details, never turned into an outer failure.
pub async fn ingress(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(presented) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return unauthorized("Missing signature");
    };

    if !signature::verify(
        state.webhook_secret.expose_secret().as_bytes(),
        &body,
        presented,
    ) {
        metrics::counter!("swapwatch_webhook_rejected_total").increment(1);
        return unauthorized("Invalid signature");
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON body" })),
            )
                .into_response();
        }
    };
    metrics::counter!("swapwatch_webhook_events_total").increment(1);

    // A wallet value failing canonicalisation counts as absent.
    let wallet = extract_wallet(&payload).and_then(|raw| WalletAddress::parse(raw).ok());
    let Some(wallet) = wallet else {
        return Json(json!({
            "status": "ignored",
            "message": "No wallet address found",
        }))
        .into_response();
    };

    let rooms = match state.index.rooms_for_wallet(&wallet).await {
        Ok(rooms) => rooms,
        Err(err) => {
            error!(error:% = err; "cannot look up rooms for wallet");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response();
        }
    };
    if rooms.is_empty() {
        return Json(json!({
            "status": "ignored",
            "walletAddress": wallet,
            "message": "No rooms tracking this wallet",
        }))
        .into_response();
    }

    let event = SwapEvent::from_webhook(&payload, wallet.clone());

    let deliveries = rooms.iter().map(|code| {
        let registry = state.registry.clone();
        let event = event.clone();
        async move {
            match registry.get(code) {
                Some(handle) => match handle.notify_swap(event).await {
                    Ok(delivery) => json!({
                        "code": code,
                        "status": "delivered",
                        "delivered": delivery.delivered,
                        "telegramSent": delivery.telegram_sent,
                    }),
                    Err(err) => json!({
                        "code": code,
                        "status": "failed",
                        "error": err.to_string(),
                    }),
                },
                None => json!({
                    "code": code,
                    "status": "failed",
                    "error": "room does not exist",
                }),
            }
        }
    });
    let details = future::join_all(deliveries).await;

    let rooms_notified = details
        .iter()
        .filter(|detail| detail["status"] == "delivered")
        .count();
    debug!(wallet:% = wallet, rooms_notified, total_rooms = rooms.len(); "webhook event fanned out");

    Json(json!({
        "status": "processed",
        "walletAddress": wallet,
        "roomsNotified": rooms_notified,
        "totalRooms": rooms.len(),
        "details": details,
    }))
    .into_response()
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
