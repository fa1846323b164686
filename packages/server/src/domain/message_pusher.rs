//! MessagePusher trait 定義
//!
//! クライアントの送信キューへのメッセージ投入を抽象化する。
//! 実装は Infrastructure 層が提供する（依存性の逆転）。
//!
//! Hub のイベントループだけが所有・呼び出しを行うため、メソッドは同期的で
//! ロックを必要としない。送信は決してブロックしない。

use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ClientId};

/// クライアントの送信キュー（生産者側）
///
/// Sender を drop するとキューが閉じ、Writer ポンプが終了を検知する。
pub type PusherChannel = mpsc::Sender<String>;

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// キューに積めたクライアント数
    pub delivered: usize,
    /// キューが満杯または閉じていたクライアント
    pub failed: Vec<ClientId>,
}

#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send {
    /// クライアントの送信キューを登録
    fn register_client(&mut self, client_id: ClientId, channel: PusherChannel);

    /// 送信キューを取り除いて閉じる。登録されていなければ `false`
    fn unregister_client(&mut self, client_id: &ClientId) -> bool;

    /// 特定のクライアントへ非ブロッキングで送信
    fn push_to(&mut self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 対象の全クライアントへ非ブロッキングで送信
    ///
    /// 失敗したクライアントは結果に集めるだけで、取り除くのは呼び出し側の責務。
    fn broadcast(&mut self, targets: &[ClientId], content: &str) -> BroadcastOutcome;
}
