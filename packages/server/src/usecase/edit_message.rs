//! UseCase: メッセージ編集処理（EditMessage）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::edit_message() / HubState::edit_and_notify() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作者本人だけが編集でき、編集後も ID と並び順が保たれることを保証
//! - 編集に失敗した場合は何も送信されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：作者本人による編集
//! - 異常系：作者以外による編集、存在しないメッセージの編集

use crate::{
    domain::{ClientId, MessageContent, MessageId},
    infrastructure::dto::websocket::MessageEditedMessage,
};

use super::hub::{HubState, encode};

impl HubState {
    /// 作者本人であれば本文を書き換える（通知はしない）
    pub fn edit_message(
        &mut self,
        message_id: &MessageId,
        requester: &ClientId,
        content: MessageContent,
    ) -> bool {
        let edited = self.store.edit(message_id, requester, content);
        if edited {
            tracing::info!("Message {} edited by {}", message_id, requester);
        } else {
            tracing::debug!(
                "Edit of message {} by {} ignored (not found or not the author)",
                message_id,
                requester
            );
        }
        edited
    }

    /// 編集に成功した場合のみ、編集通知を全員へブロードキャストする
    pub fn edit_and_notify(
        &mut self,
        message_id: MessageId,
        requester: &ClientId,
        content: MessageContent,
    ) -> bool {
        let now = self.now();
        self.room.touch(requester, now);

        if !self.edit_message(&message_id, requester, content.clone()) {
            return false;
        }
        if let Some(payload) = encode(&MessageEditedMessage::new(&message_id, &content, now)) {
            self.broadcast(&payload);
        }
        true
    }
}
