//! UseCase: タイピング状態の更新（SetTyping）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::set_typing() メソッド
//!
//! ### なぜこのテストが必要か
//! - タイピング状態の変化がプレゼンスとして全員に届くことを保証
//! - 未登録のクライアントからの更新で何も送信されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：タイピング開始・終了
//! - 異常系：未登録のクライアント

use crate::domain::ClientId;

use super::hub::HubState;

impl HubState {
    /// タイピング状態と last_seen を更新し、プレゼンスを通知する
    ///
    /// 未登録のクライアントの場合は何もせず `false` を返す。
    pub fn set_typing(&mut self, client_id: &ClientId, is_typing: bool) -> bool {
        let now = self.now();
        if !self.room.set_typing(client_id, is_typing, now) {
            tracing::debug!("Typing update from unknown client '{}' ignored", client_id);
            return false;
        }

        tracing::debug!("Client {} typing: {}", client_id, is_typing);
        self.announce_presence();
        true
    }
}
