//! UseCase: 参加者接続処理（Register）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::register() メソッド
//! - メンバーシップへの追加、履歴のリプレイ、プレゼンス通知
//!
//! ### なぜこのテストが必要か
//! - 新規参加者にだけ直近の履歴（最大 50 件）が古い順に届くことを保証
//! - リプレイの後にプレゼンスが全員へ届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴なし・履歴ありでの参加
//! - エッジケース：保存件数がリプレイ上限を超える場合
//! - 異常系：リプレイ中に送信キューが満杯になる場合

use crate::{
    domain::{ClientId, Participant},
    infrastructure::dto::websocket::ChatMessageDto,
};

use super::{
    command::ClientRegistration,
    hub::{BroadcastReport, HubState, encode},
};

impl HubState {
    /// 参加者を登録する
    ///
    /// 1. メンバーシップに追加
    /// 2. 送信キューを登録
    /// 3. 新規参加者にだけ直近の履歴をリプレイ
    /// 4. プレゼンスを全員（新規参加者を含む）に通知
    pub fn register(&mut self, registration: ClientRegistration) -> BroadcastReport {
        let ClientRegistration {
            client_id,
            username,
            channel,
        } = registration;

        // 1. メンバーシップに追加（失敗時は channel が drop され、キューが閉じる）
        let participant = Participant::new(client_id.clone(), username.clone(), self.now());
        if let Err(e) = self.room.add_participant(participant) {
            tracing::warn!("Rejected registration of '{}': {}", username, e);
            return BroadcastReport::default();
        }

        // 2. 送信キューを登録
        self.pusher.register_client(client_id.clone(), channel);
        tracing::info!(
            "Client {} ({}) connected. Total clients: {}",
            username,
            client_id,
            self.room.len()
        );

        // 3. 履歴のリプレイ
        let replayed = self.replay_history(&client_id);
        tracing::debug!("Sent {} recent messages to {}", replayed, username);

        // 4. プレゼンス通知
        self.announce_presence()
    }

    /// 直近の履歴を古い順に新規参加者のキューへ積む
    ///
    /// キューが満杯になった時点で打ち切る（追い出しはしない）。
    fn replay_history(&mut self, client_id: &ClientId) -> usize {
        let payloads: Vec<String> = self
            .store
            .recent(self.replay_limit)
            .iter()
            .filter_map(|message| encode(&ChatMessageDto::from(message)))
            .collect();

        let mut replayed = 0;
        for payload in payloads {
            if let Err(e) = self.pusher.push_to(client_id, &payload) {
                tracing::warn!("Stopped history replay: {}", e);
                break;
            }
            replayed += 1;
        }
        replayed
    }
}
