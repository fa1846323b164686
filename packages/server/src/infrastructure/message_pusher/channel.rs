//! 有界 mpsc チャンネルを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - クライアントごとの送信キュー（`mpsc::Sender`）を管理
//! - `try_send` による非ブロッキング送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! キューの生成は UI 層（`ui/handler/websocket.rs`）で行われ、受信側は Writer ポンプが持つ。
//! この実装は Hub のイベントループからのみ使われるため、内部にロックを持たない。
//! `unregister_client` で Sender を drop するとキューが閉じ、Writer が終了する。

use std::collections::HashMap;

use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{BroadcastOutcome, ClientId, MessagePushError, MessagePusher, PusherChannel};

/// 有界チャンネルを使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let mut pusher = ChannelMessagePusher::new();
/// let (tx, rx) = tokio::sync::mpsc::channel(256);
/// pusher.register_client(client_id.clone(), tx);
///
/// pusher.push_to(&client_id, "{\"type\":\"message\",\"content\":\"Hello\"}")?;
/// ```
#[derive(Debug, Default)]
pub struct ChannelMessagePusher {
    /// Key: ClientId, Value: 送信キュー
    channels: HashMap<ClientId, PusherChannel>,
}

impl ChannelMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    fn try_push(
        channel: &PusherChannel,
        client_id: &ClientId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        channel
            .try_send(content.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => MessagePushError::QueueFull(client_id.to_string()),
                TrySendError::Closed(_) => MessagePushError::QueueClosed(client_id.to_string()),
            })
    }
}

impl MessagePusher for ChannelMessagePusher {
    fn register_client(&mut self, client_id: ClientId, channel: PusherChannel) {
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        self.channels.insert(client_id, channel);
    }

    fn unregister_client(&mut self, client_id: &ClientId) -> bool {
        let removed = self.channels.remove(client_id).is_some();
        if removed {
            tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
        }
        removed
    }

    fn push_to(&mut self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let channel = self
            .channels
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.to_string()))?;
        Self::try_push(channel, client_id, content)
    }

    fn broadcast(&mut self, targets: &[ClientId], content: &str) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        for target in targets {
            let Some(channel) = self.channels.get(target) else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                continue;
            };
            match Self::try_push(channel, target, content) {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to push message: {}", e);
                    outcome.failed.push(target.clone());
                }
            }
        }

        outcome
    }
}
