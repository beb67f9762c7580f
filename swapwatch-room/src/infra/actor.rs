// This file is part of swapwatch.
// Copyright (C) 2025 SwapWatch Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::domain::{
    AddWalletRequest, CleanupHook, CreateRoomRequest, ExtendRoomRequest, Room, RoomSnapshot,
    RoomStorage, SessionId, SessionSender, SwapDelivery, SwapNotifier, UpdateConfigRequest,
    UpdateWalletRequest, WalletEntry,
};
use log::{info, warn};
use std::time::Duration;
use swapwatch_common::domain::{
    ClientMessage, RoomConfig, RoomError, RoomMessage, SwapEvent, WalletAddress, now_millis,
};
use tokio::{
    select,
    sync::{mpsc, oneshot},
    time::{Instant, sleep_until},
};

pub(crate) const MAILBOX_CAPACITY: usize = 64;

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Commands processed by a room actor, strictly in order of receipt.
pub enum Command {
    Create {
        request: CreateRoomRequest,
        reply: Reply<RoomConfig>,
    },
    Extend {
        request: ExtendRoomRequest,
        reply: Reply<RoomConfig>,
    },
    Wallets {
        reply: Reply<Vec<WalletEntry>>,
    },
    AddWallet {
        request: AddWalletRequest,
        reply: Reply<WalletEntry>,
    },
    RemoveWallet {
        address: String,
        reply: Reply<()>,
    },
    UpdateWallet {
        address: String,
        request: UpdateWalletRequest,
        reply: Reply<WalletEntry>,
    },
    GetConfig {
        reply: Reply<Option<RoomConfig>>,
    },
    UpdateConfig {
        request: UpdateConfigRequest,
        reply: Reply<RoomConfig>,
    },
    Presence {
        reply: Reply<usize>,
    },
    HasWallet {
        address: WalletAddress,
        reply: Reply<bool>,
    },
    NotifySwap {
        event: SwapEvent,
        reply: Reply<SwapDelivery>,
    },
    Snapshot {
        reply: Reply<RoomSnapshot>,
    },
    Subscribe {
        sender: SessionSender,
        reply: Reply<SessionId>,
    },
    Unsubscribe {
        id: SessionId,
    },
    SessionMessage {
        id: SessionId,
        message: ClientMessage,
    },
    Cleanup {
        reply: Reply<()>,
    },
}

/// Cloneable handle addressing one live room actor. Once the actor is gone, every call returns
/// `NotFound`.
#[derive(Clone)]
pub struct RoomHandle {
    commands: mpsc::Sender<Command>,
}

impl RoomHandle {
    pub(crate) fn new(commands: mpsc::Sender<Command>) -> Self {
        Self { commands }
    }

    pub(crate) fn same_channel(&self, other: &RoomHandle) -> bool {
        self.commands.same_channel(&other.commands)
    }

    async fn call<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| room_gone())?;
        receiver.await.map_err(|_| room_gone())?
    }

    pub async fn create(&self, request: CreateRoomRequest) -> Result<RoomConfig, RoomError> {
        self.call(|reply| Command::Create { request, reply }).await
    }

    pub async fn extend(&self, request: ExtendRoomRequest) -> Result<RoomConfig, RoomError> {
        self.call(|reply| Command::Extend { request, reply }).await
    }

    pub async fn wallets(&self) -> Result<Vec<WalletEntry>, RoomError> {
        self.call(|reply| Command::Wallets { reply }).await
    }

    pub async fn add_wallet(&self, request: AddWalletRequest) -> Result<WalletEntry, RoomError> {
        self.call(|reply| Command::AddWallet { request, reply })
            .await
    }

    pub async fn remove_wallet(&self, address: String) -> Result<(), RoomError> {
        self.call(|reply| Command::RemoveWallet { address, reply })
            .await
    }

    pub async fn update_wallet(
        &self,
        address: String,
        request: UpdateWalletRequest,
    ) -> Result<WalletEntry, RoomError> {
        self.call(|reply| Command::UpdateWallet {
            address,
            request,
            reply,
        })
        .await
    }

    pub async fn config(&self) -> Result<Option<RoomConfig>, RoomError> {
        self.call(|reply| Command::GetConfig { reply }).await
    }

    pub async fn update_config(&self, request: UpdateConfigRequest) -> Result<RoomConfig, RoomError> {
        self.call(|reply| Command::UpdateConfig { request, reply })
            .await
    }

    pub async fn presence(&self) -> Result<usize, RoomError> {
        self.call(|reply| Command::Presence { reply }).await
    }

    pub async fn has_wallet(&self, address: WalletAddress) -> Result<bool, RoomError> {
        self.call(|reply| Command::HasWallet { address, reply })
            .await
    }

    pub async fn notify_swap(&self, event: SwapEvent) -> Result<SwapDelivery, RoomError> {
        self.call(|reply| Command::NotifySwap { event, reply }).await
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.call(|reply| Command::Snapshot { reply }).await
    }

    pub async fn subscribe(&self, sender: SessionSender) -> Result<SessionId, RoomError> {
        self.call(|reply| Command::Subscribe { sender, reply }).await
    }

    /// Fire-and-forget; a gone room has no sessions left to untrack.
    pub async fn unsubscribe(&self, id: SessionId) {
        let _ = self.commands.send(Command::Unsubscribe { id }).await;
    }

    pub async fn session_message(&self, id: SessionId, message: ClientMessage) {
        let _ = self
            .commands
            .send(Command::SessionMessage { id, message })
            .await;
    }

    pub async fn cleanup(&self) -> Result<(), RoomError> {
        self.call(|reply| Command::Cleanup { reply }).await
    }
}

fn room_gone() -> RoomError {
    RoomError::not_found("room does not exist")
}

enum Flow {
    Continue,
    Stop,
}

/// Single-writer task owning one room. The mailbox serialises all operations; the armed alarm
/// fires the cleanup and ends the task.
pub struct RoomActor<S, N, H> {
    room: Room<S, N>,
    commands: mpsc::Receiver<Command>,
    hook: H,
    alarm: Option<Instant>,
}

impl<S, N, H> RoomActor<S, N, H>
where
    S: RoomStorage,
    N: SwapNotifier,
    H: CleanupHook,
{
    /// Actor over the given room; `alarm_at` (epoch millis) arms the expiry wake immediately,
    /// which is used when restoring persisted rooms at startup.
    pub fn new(
        room: Room<S, N>,
        commands: mpsc::Receiver<Command>,
        hook: H,
        alarm_at: Option<u64>,
    ) -> Self {
        Self {
            room,
            commands,
            hook,
            alarm: alarm_at.map(deadline_for),
        }
    }

    pub async fn run(mut self) {
        loop {
            let deadline = self.alarm.unwrap_or_else(Instant::now);

            select! {
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if let Flow::Stop = self.handle(command).await {
                            break;
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if self.alarm.is_some() => {
                    self.destroy("Room expired").await;
                    break;
                }
            }
        }
    }

    async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Create { request, reply } => {
                let result = self.room.create(request).await;
                let flow = match &result {
                    Ok(config) => {
                        self.alarm = Some(deadline_for(config.expires_at));
                        Flow::Continue
                    }
                    Err(RoomError::Conflict(_)) => Flow::Continue,
                    // Nothing durable was written; a fresh actor that failed to initialise must
                    // not linger without an alarm.
                    Err(_) => Flow::Stop,
                };
                let _ = reply.send(result);
                flow
            }

            Command::Extend { request, reply } => {
                let result = self.room.extend(request).await;
                if let Ok(config) = &result {
                    self.alarm = Some(deadline_for(config.expires_at));
                }
                let _ = reply.send(result);
                Flow::Continue
            }

            Command::Wallets { reply } => {
                let _ = reply.send(self.room.wallets().await);
                Flow::Continue
            }

            Command::AddWallet { request, reply } => {
                let _ = reply.send(self.room.add_wallet(request).await);
                Flow::Continue
            }

            Command::RemoveWallet { address, reply } => {
                let _ = reply.send(self.room.remove_wallet(&address).await);
                Flow::Continue
            }

            Command::UpdateWallet {
                address,
                request,
                reply,
            } => {
                let _ = reply.send(self.room.update_wallet(&address, request).await);
                Flow::Continue
            }

            Command::GetConfig { reply } => {
                let _ = reply.send(self.room.config().await);
                Flow::Continue
            }

            Command::UpdateConfig { request, reply } => {
                let _ = reply.send(self.room.update_config(request).await);
                Flow::Continue
            }

            Command::Presence { reply } => {
                let _ = reply.send(Ok(self.room.presence()));
                Flow::Continue
            }

            Command::HasWallet { address, reply } => {
                let _ = reply.send(self.room.has_wallet(&address).await);
                Flow::Continue
            }

            Command::NotifySwap { event, reply } => {
                let _ = reply.send(self.room.notify_swap(event).await);
                Flow::Continue
            }

            Command::Snapshot { reply } => {
                let _ = reply.send(self.room.snapshot().await);
                Flow::Continue
            }

            Command::Subscribe { sender, reply } => {
                let _ = reply.send(Ok(self.room.subscribe(sender)));
                Flow::Continue
            }

            Command::Unsubscribe { id } => {
                self.room.unsubscribe(id);
                Flow::Continue
            }

            Command::SessionMessage { id, message } => {
                self.handle_session_message(id, message).await;
                Flow::Continue
            }

            Command::Cleanup { reply } => {
                self.destroy("Room closed").await;
                let _ = reply.send(Ok(()));
                Flow::Stop
            }
        }
    }

    async fn handle_session_message(&mut self, id: SessionId, message: ClientMessage) {
        match message {
            ClientMessage::Ping { .. } => {
                self.room.send_to(
                    id,
                    &RoomMessage::Pong {
                        timestamp: now_millis(),
                    },
                );
            }

            ClientMessage::GetRoomData => match self.room.snapshot().await {
                Ok(snapshot) => {
                    self.room.send_to(
                        id,
                        &RoomMessage::RoomData {
                            wallets: snapshot.wallets,
                            labels: snapshot.labels,
                            presence: snapshot.presence,
                        },
                    );
                }
                Err(error) => {
                    warn!(room:% = self.room.code(), error:%; "cannot read room snapshot");
                }
            },
        }
    }

    async fn destroy(&mut self, reason: &str) {
        match self.room.cleanup(reason).await {
            Ok(closed) => info!(room:% = self.room.code(), closed; "room destroyed"),
            Err(error) => warn!(room:% = self.room.code(), error:%; "cannot clean up room"),
        }
        self.hook.room_destroyed(self.room.code()).await;
        self.alarm = None;
    }
}

fn deadline_for(expires_at: u64) -> Instant {
    let remaining = expires_at.saturating_sub(now_millis());
    Instant::now() + Duration::from_millis(remaining)
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            AddWalletRequest, CreateRoomRequest, ExtendRoomRequest, NoopCleanupHook, NoopNotifier,
            Room, SessionEvent,
        },
        infra::{InMemRoomStorage, RoomActor, RoomHandle, actor::MAILBOX_CAPACITY},
    };
    use assert_matches::assert_matches;
    use std::time::Duration;
    use swapwatch_common::domain::{ClientMessage, PingData, RoomCode, RoomError, WalletAddress};
    use tokio::{
        sync::mpsc,
        time::{advance, sleep},
    };

    const ADDRESS: &str = "0xabcdef0123456789abcdef0123456789abcdef01";

    fn spawn_actor() -> RoomHandle {
        let (commands, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let handle = RoomHandle::new(commands);

        let room = Room::new(
            RoomCode::parse("ABC123").expect("room code is valid"),
            InMemRoomStorage::default(),
            NoopNotifier,
        );
        let actor = RoomActor::new(room, receiver, NoopCleanupHook, None);
        tokio::spawn(actor.run());

        handle
    }

    fn add_request(address: &str) -> AddWalletRequest {
        AddWalletRequest {
            wallet: None,
            address: Some(address.to_owned()),
            label: None,
        }
    }

    #[tokio::test]
    async fn test_operations_in_order() {
        let handle = spawn_actor();

        handle
            .create(CreateRoomRequest::default())
            .await
            .expect("room can be created");
        handle
            .add_wallet(add_request(ADDRESS))
            .await
            .expect("wallet can be added");

        let wallets = handle.wallets().await.expect("wallets can be read");
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].address.as_str(), ADDRESS);

        let wallet = WalletAddress::parse(ADDRESS).expect("address is valid");
        assert_matches!(handle.has_wallet(wallet).await, Ok(true));

        assert_matches!(handle.presence().await, Ok(0));
    }

    #[tokio::test]
    async fn test_session_messages() {
        let handle = spawn_actor();

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let id = handle.subscribe(sender).await.expect("session is tracked");
        assert_matches!(
            receiver.recv().await,
            Some(SessionEvent::Frame(frame)) if frame.contains("presence")
        );

        handle
            .session_message(id, ClientMessage::Ping { data: PingData::default() })
            .await;
        assert_matches!(
            receiver.recv().await,
            Some(SessionEvent::Frame(frame)) if frame.contains("pong")
        );

        handle.session_message(id, ClientMessage::GetRoomData).await;
        assert_matches!(
            receiver.recv().await,
            Some(SessionEvent::Frame(frame)) if frame.contains("room_data")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_destroys_room() {
        let handle = spawn_actor();
        handle
            .create(CreateRoomRequest::default())
            .await
            .expect("room can be created");

        let (sender, mut receiver) = mpsc::unbounded_channel();
        handle.subscribe(sender).await.expect("session is tracked");
        receiver.recv().await.expect("presence was broadcast");

        advance(Duration::from_secs(24 * 60 * 60 + 1)).await;
        sleep(Duration::from_millis(10)).await;

        assert_matches!(
            receiver.recv().await,
            Some(SessionEvent::Close { code: 1000, reason }) if reason == "Room expired"
        );
        assert_matches!(handle.wallets().await, Err(RoomError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_rearms_alarm() {
        let handle = spawn_actor();
        handle
            .create(CreateRoomRequest::default())
            .await
            .expect("room can be created");
        handle
            .extend(ExtendRoomRequest { hours: Some(48) })
            .await
            .expect("room can be extended");

        advance(Duration::from_secs(25 * 60 * 60)).await;
        sleep(Duration::from_millis(10)).await;
        assert_matches!(handle.wallets().await, Ok(_));

        advance(Duration::from_secs(24 * 60 * 60)).await;
        sleep(Duration::from_millis(10)).await;
        assert_matches!(handle.wallets().await, Err(RoomError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_stops_actor() {
        let handle = spawn_actor();
        handle
            .create(CreateRoomRequest::default())
            .await
            .expect("room can be created");

        handle.cleanup().await.expect("cleanup runs");
        assert_matches!(handle.config().await, Err(RoomError::NotFound(_)));
    }
}
