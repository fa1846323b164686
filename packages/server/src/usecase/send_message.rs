//! UseCase: メッセージ送信処理（PostMessage）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::post_message() / HubState::add_message() メソッド
//! - メッセージの保存と、送信者を含む全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にも自分のメッセージが届くことを保証（クライアントは送信時にローカル表示しない）
//! - 保存されたメッセージが新規参加者へのリプレイ対象になることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - エッジケース：送信者のみが接続している場合

use crate::{
    domain::{ChatMessage, ClientId, MessageContent, Username},
    infrastructure::dto::websocket::ChatMessageDto,
};

use super::hub::{HubState, encode};

impl HubState {
    /// メッセージを履歴に追加する（ブロードキャストはしない）
    pub fn add_message(&mut self, message: ChatMessage) {
        self.store.append(message);
        tracing::debug!("Message stored. Total messages: {}", self.store.len());
    }

    /// メッセージを採番・保存し、全員へブロードキャストする
    pub fn post_message(
        &mut self,
        author_id: ClientId,
        author_name: Username,
        content: MessageContent,
    ) -> ChatMessage {
        let now = self.now();

        // 1. 送信者の last_seen を更新
        self.room.touch(&author_id, now);

        // 2. 履歴に追加
        let message = ChatMessage::new(author_id, author_name, content, now);
        self.add_message(message.clone());

        // 3. 送信者を含む全員へブロードキャスト
        if let Some(payload) = encode(&ChatMessageDto::from(&message)) {
            self.broadcast(&payload);
        }

        message
    }
}
