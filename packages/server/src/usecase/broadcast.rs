//! UseCase: ブロードキャスト（Broadcast）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::broadcast() メソッド
//! - 非ブロッキングな全員への送信と、追いつけないクライアントの追い出し
//!
//! ### なぜこのテストが必要か
//! - 一人の遅いクライアントが他のクライアントへの配信を止めないことを保証
//! - 追い出されたクライアントがメンバーから外れ、キューが閉じられることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員への配信
//! - 異常系：送信キューが満杯・受信側が終了済みのクライアント
//! - エッジケース：追い出しのプレゼンス通知でさらに追い出しが連鎖する場合

use crate::domain::ClientId;

use super::hub::{BroadcastReport, HubState};

impl HubState {
    /// 全メンバーの送信キューへ非ブロッキングで積む
    ///
    /// 積めなかったクライアントは配信が一巡した後に追い出し、残りのメンバーに
    /// プレゼンスを通知する。その通知でさらに追い出しが起きれば、追い出しが
    /// 無くなるまで繰り返す。
    pub fn broadcast(&mut self, payload: &str) -> BroadcastReport {
        let (delivered, mut failed) = self.fan_out(payload);
        let mut report = BroadcastReport {
            delivered,
            evicted: Vec::new(),
        };

        loop {
            let evicted = self.evict_all(failed);
            if evicted.is_empty() {
                break;
            }
            tracing::info!("Cleaned up {} failed clients", evicted.len());
            report.evicted.extend(evicted);

            let Some(presence) = self.presence_payload() else {
                break;
            };
            failed = self.fan_out(&presence).1;
        }

        report
    }

    fn fan_out(&mut self, payload: &str) -> (usize, Vec<ClientId>) {
        let targets = self.room.client_ids();
        let outcome = self.pusher.broadcast(&targets, payload);
        tracing::debug!(
            "Message sent to {}/{} clients",
            outcome.delivered,
            targets.len()
        );
        (outcome.delivered, outcome.failed)
    }

    fn evict_all(&mut self, failed: Vec<ClientId>) -> Vec<ClientId> {
        failed
            .into_iter()
            .filter(|client_id| self.evict(client_id))
            .collect()
    }

    /// メンバーから外して送信キューを閉じる
    fn evict(&mut self, client_id: &ClientId) -> bool {
        match self.room.remove_participant(client_id) {
            Some(participant) => {
                self.pusher.unregister_client(client_id);
                tracing::warn!(
                    "Evicted client {} ({}): outbound queue saturated",
                    participant.username,
                    client_id
                );
                true
            }
            None => false,
        }
    }
}
