// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod rooms;
pub mod webhook;
pub mod ws;

use crate::{domain::Api, infra::IndexCleanupHook};
use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use log::{error, info};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::{io, net::IpAddr, sync::Arc};
use swapwatch_common::domain::{RoomCode, RoomError};
use swapwatch_index::infra::{FilterSync, RedbWalletIndex};
use swapwatch_room::infra::{RoomRegistry, TelegramNotifier};
use thiserror::Error;
use tokio::signal::unix::{SignalKind, signal};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

/// The registry of live rooms as wired by the gateway.
pub type Registry = RoomRegistry<TelegramNotifier, IndexCleanupHook>;

#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub index: RedbWalletIndex,
    pub filter_sync: FilterSync<RedbWalletIndex>,
    pub webhook_secret: Arc<SecretString>,
}

pub struct AxumApi {
    config: Config,
    state: AppState,
}

impl AxumApi {
    pub fn new(config: Config, state: AppState) -> Self {
        Self { config, state }
    }
}

impl Api for AxumApi {
    type Error = AxumApiError;

    async fn serve(self) -> Result<(), Self::Error> {
        let Config {
            address,
            port,
            request_body_limit,
        } = self.config;

        let app = make_app(self.state, request_body_limit as usize);

        let listener = tokio::net::TcpListener::bind((address, port))
            .await
            .map_err(AxumApiError::Bind)?;
        info!(address:?, port; "listening to TCP connections");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AxumApiError::Serve)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,

    #[serde(with = "byte_unit_serde")]
    pub request_body_limit: u64,
}

#[derive(Debug, Error)]
pub enum AxumApiError {
    #[error("cannot bind tcp listener")]
    Bind(#[source] io::Error),

    #[error("cannot serve API")]
    Serve(#[source] io::Error),
}

fn make_app(state: AppState, request_body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/{code}", get(rooms::get_room))
        .route("/rooms/{code}/extend", post(rooms::extend_room))
        .route(
            "/rooms/{code}/config",
            get(rooms::get_config).put(rooms::update_config),
        )
        .route("/rooms/{code}/presence", get(rooms::get_presence))
        .route("/rooms/{code}/wallets", post(rooms::add_wallet))
        .route(
            "/rooms/{code}/wallets/{address}",
            delete(rooms::remove_wallet).patch(rooms::update_wallet),
        )
        .route("/rooms/{code}/ws", get(ws::upgrade))
        .route("/webhook/coinbase", post(webhook::ingress))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(request_body_limit))
                .layer(CorsLayer::permissive()),
        )
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    signal(SignalKind::terminate())
        .expect("SIGTERM handler can be registered")
        .recv()
        .await;
}

/// JSON error response carrying the kind-mapped status code. This is the single place where
/// error kinds become HTTP statuses.
pub struct ApiError(RoomError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<RoomError> for ApiError {
    fn from(error: RoomError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RoomError::Validation(_) => StatusCode::BAD_REQUEST,
            RoomError::Conflict(_) => StatusCode::CONFLICT,
            RoomError::NotFound(_) => StatusCode::NOT_FOUND,
            RoomError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self.0 {
            RoomError::Internal(error) => {
                error!(error:%; "internal error");
                "internal error".to_string()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Unwrap an extracted JSON body, turning any rejection into a 400.
fn parse_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(body)| body)
        .map_err(|rejection| ApiError(RoomError::validation(rejection.body_text())))
}

/// Strict room code extraction for path parameters.
fn parse_code(code: &str) -> Result<RoomCode, ApiError> {
    RoomCode::parse(code).map_err(|error| ApiError(RoomError::validation(error.to_string())))
}
