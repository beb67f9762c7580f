// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use log::warn;
use swapwatch_common::domain::RoomMessage;
use tokio::sync::mpsc;

/// Identifier of one accepted WebSocket session within a room.
pub type SessionId = u64;

/// What a session pump receives from its room.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A serialised frame ready to be sent as a text message.
    Frame(String),

    /// Close the socket with the given code and reason.
    Close { code: u16, reason: String },
}

pub type SessionSender = mpsc::UnboundedSender<SessionEvent>;

/// The live WebSocket sessions of one room. Sends never block; a session whose channel is gone is
/// dropped on the next delivery attempt and finalised by its pump.
#[derive(Default)]
pub struct SessionRegistry {
    next_id: SessionId,
    sessions: Vec<(SessionId, SessionSender)>,
}

impl SessionRegistry {
    pub fn track(&mut self, sender: SessionSender) -> SessionId {
        let id = self.next_id;
        self.next_id += 1;
        self.sessions.push((id, sender));
        id
    }

    pub fn untrack(&mut self, id: SessionId) {
        self.sessions.retain(|(session_id, _)| *session_id != id);
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Serialise the message once and attempt delivery to every session, dropping dead ones.
    /// Returns the number of sessions the frame was handed to.
    pub fn broadcast(&mut self, message: &RoomMessage) -> usize {
        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(error:%; "cannot serialize room message");
                return 0;
            }
        };

        self.sessions
            .retain(|(_, sender)| sender.send(SessionEvent::Frame(frame.clone())).is_ok());
        self.sessions.len()
    }

    /// Targeted delivery to a single session. Returns false if the session is unknown or dead.
    pub fn send(&mut self, id: SessionId, message: &RoomMessage) -> bool {
        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(error:%; "cannot serialize room message");
                return false;
            }
        };

        let delivered = self
            .sessions
            .iter()
            .find(|(session_id, _)| *session_id == id)
            .is_some_and(|(_, sender)| sender.send(SessionEvent::Frame(frame)).is_ok());

        if !delivered {
            self.untrack(id);
        }
        delivered
    }

    /// Best-effort close of every session with the given code. Returns the count closed.
    pub fn close_all(&mut self, code: u16, reason: &str) -> usize {
        let closed = self.sessions.len();
        for (_, sender) in self.sessions.drain(..) {
            let _ = sender.send(SessionEvent::Close {
                code,
                reason: reason.to_owned(),
            });
        }
        closed
    }
}
