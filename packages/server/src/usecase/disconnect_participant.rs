//! UseCase: 参加者切断処理（Unregister）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::unregister() メソッド
//! - メンバーシップからの削除、送信キューのクローズ、プレゼンス通知
//!
//! ### なぜこのテストが必要か
//! - 切断時に残りの参加者へプレゼンスが通知されることを保証
//! - 二度目の Unregister が何もしない（冪等）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断
//! - 異常系：既に切断済み・未登録の参加者の切断

use crate::domain::ClientId;

use super::hub::{BroadcastReport, HubState};

impl HubState {
    /// 参加者の登録を解除する
    ///
    /// 登録されていなければ何もせず `None` を返す。
    pub fn unregister(&mut self, client_id: &ClientId) -> Option<BroadcastReport> {
        // 1. メンバーシップから削除
        let Some(participant) = self.room.remove_participant(client_id) else {
            tracing::debug!("Client '{}' is not registered; unregister ignored", client_id);
            return None;
        };

        // 2. 送信キューを閉じる（Writer ポンプが終了を検知する）
        self.pusher.unregister_client(client_id);
        tracing::info!(
            "Client {} ({}) disconnected. Total clients: {}",
            participant.username,
            client_id,
            self.room.len()
        );

        // 3. 残りの参加者にプレゼンスを通知
        Some(self.announce_presence())
    }
}
