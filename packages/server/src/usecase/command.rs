//! Hub が受け付けるコマンド
//!
//! Hub の受信箱に届いたコマンドは到着順に一つずつ処理される。
//! 結果を返す必要があるコマンドは `oneshot` で応答する。

use tokio::sync::oneshot;

use crate::domain::{
    ClientId, MessageContent, MessageId, Participant, PusherChannel, Username,
};

/// Register に渡す新規クライアントの情報
#[derive(Debug)]
pub struct ClientRegistration {
    pub client_id: ClientId,
    pub username: Username,
    /// 送信キュー（生産者側）。Hub が所有する
    pub channel: PusherChannel,
}

/// Hub の状態のスナップショット（診断用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSnapshot {
    pub participants: Vec<Participant>,
    pub message_count: usize,
}

#[derive(Debug)]
pub enum HubCommand {
    /// メンバーに加え、履歴をリプレイし、プレゼンスを全員に通知
    Register(ClientRegistration),
    /// メンバーから外し、送信キューを閉じ、プレゼンスを通知（冪等）
    Unregister(ClientId),
    /// シリアライズ済みイベントを全メンバーへ送信
    Broadcast(String),
    /// メッセージを保存してブロードキャスト
    PostMessage {
        author_id: ClientId,
        author_name: Username,
        content: MessageContent,
    },
    /// 作者本人なら編集し、成功時のみ編集通知をブロードキャスト
    EditMessage {
        message_id: MessageId,
        requester: ClientId,
        content: MessageContent,
        reply: oneshot::Sender<bool>,
    },
    /// 作者本人なら削除し、成功時のみ削除通知をブロードキャスト
    DeleteMessage {
        message_id: MessageId,
        requester: ClientId,
        reply: oneshot::Sender<bool>,
    },
    /// タイピング状態を更新し、プレゼンスを通知
    SetTyping { client_id: ClientId, is_typing: bool },
    /// 現在の状態を返す
    Snapshot { reply: oneshot::Sender<HubSnapshot> },
}
