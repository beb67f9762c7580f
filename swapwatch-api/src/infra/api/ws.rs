// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::infra::api::{ApiError, AppState, parse_code};
use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{CloseFrame, Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use log::debug;
use swapwatch_common::domain::{ClientMessage, RoomError};
use swapwatch_room::{domain::SessionEvent, infra::RoomHandle};
use tokio::{select, sync::mpsc};

/// Upgrade a client to a room subscription. The room must be live; the session ends with the
/// socket or with the room, whichever goes first.
pub async fn upgrade(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let code = parse_code(&code)?;
    let handle = state
        .registry
        .get(&code)
        .ok_or_else(|| ApiError::from(RoomError::not_found(format!("room {code} does not exist"))))?;

    Ok(ws.on_upgrade(move |socket| serve_session(socket, handle)))
}

/// Pump frames from the room to the socket and client messages back to the room. The room side
/// never blocks on this session: it enqueues into an unbounded channel and drops the session when
/// the channel is gone.
async fn serve_session(socket: WebSocket, handle: RoomHandle) {
    let mut socket = socket;

    let (sender, mut events) = mpsc::unbounded_channel();
    let id = match handle.subscribe(sender).await {
        Ok(id) => id,
        Err(_) => {
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    loop {
        select! {
            event = events.recv() => match event {
                Some(SessionEvent::Frame(frame)) => {
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }

                Some(SessionEvent::Close { code, reason }) => {
                    let _ = sink
                        .send(Message::Close(Some(CloseFrame {
                            code,
                            reason: reason.into(),
                        })))
                        .await;
                    // The room is gone; nothing left to untrack.
                    return;
                }

                None => return,
            },

            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => handle.session_message(id, message).await,
                        Err(error) => debug!(error:%; "ignoring malformed client message"),
                    }
                }

                Some(Ok(Message::Close(_))) | None => break,

                Some(Ok(_)) => {}

                Some(Err(_)) => break,
            },
        }
    }

    handle.unsubscribe(id).await;
}
