//! ドメイン層のエラー定義

use thiserror::Error;

use super::connection::ConnectionState;

/// Value Object の生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client id must not be empty")]
    ClientIdEmpty,

    #[error("message id must not be empty")]
    MessageIdEmpty,

    #[error("message content must not be empty")]
    MessageContentEmpty,
}

/// Room（メンバーシップ）操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("participant '{0}' is already registered")]
    DuplicateParticipant(String),
}

/// 送信キューへの push に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("outbound queue of client '{0}' is full")]
    QueueFull(String),

    #[error("outbound queue of client '{0}' is closed")]
    QueueClosed(String),
}

/// 接続ライフサイクルの不正な遷移
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid connection transition from {from:?} on {event}")]
pub struct ConnectionStateError {
    pub from: ConnectionState,
    pub event: &'static str,
}
