//! Hub: 共有状態を唯一所有するイベントループ
//!
//! メンバーシップ（`Room`）、メッセージ履歴（`MessageStore`）、送信キュー
//! （`MessagePusher`）を所有し、受信箱に届いたコマンドを到着順に一つずつ処理する。
//! 状態に触れるのはこのループだけなので、ロックは使わない。
//!
//! 各コマンドの処理は `connect_participant` / `disconnect_participant` /
//! `broadcast` / `send_message` / `edit_message` / `delete_message` /
//! `update_typing` に分かれて実装されている。

use std::sync::Arc;

use hiroba_shared::time::Clock;
use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    config::HubConfig,
    domain::{ClientId, MessagePusher, MessageStore, Room, Timestamp},
    infrastructure::dto::websocket::UserListMessage,
};

use super::{
    command::{HubCommand, HubSnapshot},
    handle::HubHandle,
};

/// ブロードキャスト 1 回分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 元のイベントを積めたクライアント数
    pub delivered: usize,
    /// 追い出されたクライアント（連鎖したプレゼンス通知で追い出された分を含む）
    pub evicted: Vec<ClientId>,
}

/// Hub が所有する状態
pub struct HubState {
    pub(super) room: Room,
    pub(super) store: MessageStore,
    pub(super) pusher: Box<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    pub(super) replay_limit: usize,
}

impl HubState {
    pub fn new(pusher: Box<dyn MessagePusher>, clock: Arc<dyn Clock>, replay_limit: usize) -> Self {
        Self {
            room: Room::new(),
            store: MessageStore::new(),
            pusher,
            clock,
            replay_limit,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            participants: self.room.participants().to_vec(),
            message_count: self.store.len(),
        }
    }

    pub(super) fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// 現在のメンバー全員のプレゼンスを全員へ通知
    pub(super) fn announce_presence(&mut self) -> BroadcastReport {
        match self.presence_payload() {
            Some(payload) => {
                tracing::debug!("Broadcasting user list: {} users", self.room.len());
                self.broadcast(&payload)
            }
            None => BroadcastReport::default(),
        }
    }

    pub(super) fn presence_payload(&self) -> Option<String> {
        encode(&UserListMessage::from_participants(
            self.room.participants(),
            self.now(),
        ))
    }

    /// コマンドを一つ処理する
    pub fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(registration) => {
                self.register(registration);
            }
            HubCommand::Unregister(client_id) => {
                self.unregister(&client_id);
            }
            HubCommand::Broadcast(payload) => {
                self.broadcast(&payload);
            }
            HubCommand::PostMessage {
                author_id,
                author_name,
                content,
            } => {
                self.post_message(author_id, author_name, content);
            }
            HubCommand::EditMessage {
                message_id,
                requester,
                content,
                reply,
            } => {
                let edited = self.edit_and_notify(message_id, &requester, content);
                let _ = reply.send(edited);
            }
            HubCommand::DeleteMessage {
                message_id,
                requester,
                reply,
            } => {
                let deleted = self.delete_and_notify(message_id, &requester);
                let _ = reply.send(deleted);
            }
            HubCommand::SetTyping {
                client_id,
                is_typing,
            } => {
                self.set_typing(&client_id, is_typing);
            }
            HubCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }
}

/// 送信用に JSON 文字列へシリアライズする
pub(super) fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize outbound event: {}", e);
            None
        }
    }
}

/// Hub のイベントループ
pub struct Hub {
    state: HubState,
    inbox: mpsc::Receiver<HubCommand>,
}

impl Hub {
    /// Hub と、その受信箱へ送るための HubHandle を作成
    pub fn new(
        config: &HubConfig,
        pusher: Box<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> (Self, HubHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let hub = Self {
            state: HubState::new(pusher, clock, config.replay_limit),
            inbox,
        };
        (hub, HubHandle::new(sender))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 全ての HubHandle が drop されるまでコマンドを処理し続ける
    pub async fn run(mut self) {
        tracing::info!("Hub started and running");
        while let Some(command) = self.inbox.recv().await {
            self.state.handle(command);
        }
        tracing::info!(
            "Hub stopped ({} clients, {} messages)",
            self.state.room.len(),
            self.state.store.len()
        );
    }
}
