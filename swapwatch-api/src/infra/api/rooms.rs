// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::infra::api::{ApiError, ApiResult, AppState, parse_code, parse_json};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use log::warn;
use serde::Deserialize;
use serde_json::{Value, json};
use swapwatch_common::domain::{RoomCode, RoomConfig, RoomError, WalletAddress};
use swapwatch_index::domain::WalletIndex;
use swapwatch_room::{
    domain::{
        AddWalletRequest, CreateRoomConfig, CreateRoomRequest, ExtendRoomRequest, RoomSnapshot,
        UpdateConfigRequest, UpdateWalletRequest,
    },
    infra::RoomHandle,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomBody {
    pub code: String,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub config: Option<CreateRoomConfig>,
}

pub async fn create_room(
    State(state): State<AppState>,
    body: Result<Json<CreateRoomBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let body = parse_json(body)?;
    let code = parse_code(&body.code)?;

    let config = state
        .registry
        .create(
            &code,
            CreateRoomRequest {
                created_by: body.created_by,
                config: body.config,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(config)))
}

/// Composite read: wallets, labels, creation time, presence. An unknown or expired room reads as
/// the empty snapshot.
pub async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Value>> {
    let code = parse_code(&code)?;

    let view = match state.registry.get(&code) {
        Some(handle) => {
            let snapshot = handle.snapshot().await?;
            let config = handle.config().await?;
            room_view(&code, snapshot, config)
        }
        None => room_view(
            &code,
            RoomSnapshot {
                wallets: Vec::new(),
                labels: Default::default(),
                presence: 0,
            },
            None,
        ),
    };

    Ok(Json(view))
}

pub async fn extend_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<ExtendRoomRequest>, JsonRejection>,
) -> ApiResult<Json<RoomConfig>> {
    let body = parse_json(body)?;
    let handle = room_handle(&state, &code)?;

    let config = handle.extend(body).await?;
    Ok(Json(config))
}

pub async fn get_config(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Value>> {
    let handle = room_handle(&state, &code)?;

    let config = handle.config().await?;
    let config = config
        .map(|config| serde_json::to_value(config).unwrap_or_default())
        .unwrap_or_else(|| json!({}));
    Ok(Json(config))
}

pub async fn update_config(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<UpdateConfigRequest>, JsonRejection>,
) -> ApiResult<Json<RoomConfig>> {
    let body = parse_json(body)?;
    let handle = room_handle(&state, &code)?;

    let config = handle.update_config(body).await?;
    Ok(Json(config))
}

pub async fn get_presence(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Value>> {
    let handle = room_handle(&state, &code)?;

    let count = handle.presence().await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn add_wallet(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<AddWalletRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let body = parse_json(body)?;
    let code = parse_code(&code)?;
    let handle = live_room(&state, &code)?;

    let entry = handle.add_wallet(body).await?;

    // The index is only touched after the per-room operation succeeded; a failed index write is
    // healed by the next one.
    match state.index.add_wallet_to_room(&entry.address, &code).await {
        Ok(()) => state.filter_sync.spawn_sync(),
        Err(error) => warn!(room:% = code, error:%; "cannot update wallet index"),
    }

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_wallet(
    State(state): State<AppState>,
    Path((code, address)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let code = parse_code(&code)?;
    let handle = live_room(&state, &code)?;

    handle.remove_wallet(address.clone()).await?;

    match WalletAddress::parse(&address) {
        Ok(address) => match state.index.remove_wallet_from_room(&address, &code).await {
            Ok(()) => state.filter_sync.spawn_sync(),
            Err(error) => warn!(room:% = code, error:%; "cannot update wallet index"),
        },
        Err(error) => warn!(room:% = code, error:%; "cannot canonicalise removed wallet"),
    }

    Ok(Json(json!({})))
}

pub async fn update_wallet(
    State(state): State<AppState>,
    Path((code, address)): Path<(String, String)>,
    body: Result<Json<UpdateWalletRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let body = parse_json(body)?;
    let handle = room_handle(&state, &code)?;

    let entry = handle.update_wallet(address, body).await?;
    Ok(Json(entry))
}

fn room_handle(state: &AppState, code: &str) -> Result<RoomHandle, ApiError> {
    let code = parse_code(code)?;
    live_room(state, &code)
}

fn live_room(state: &AppState, code: &RoomCode) -> Result<RoomHandle, ApiError> {
    state
        .registry
        .get(code)
        .ok_or_else(|| ApiError::from(RoomError::not_found(format!("room {code} does not exist"))))
}

fn room_view(code: &RoomCode, snapshot: RoomSnapshot, config: Option<RoomConfig>) -> Value {
    json!({
        "code": code,
        "wallets": snapshot.wallets,
        "labels": snapshot.labels,
        "createdAt": config.as_ref().map(|config| config.created_at),
        "presence": { "count": snapshot.presence },
    })
}
