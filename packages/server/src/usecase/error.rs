//! UseCase 層のエラー定義

use thiserror::Error;
use tokio::sync::oneshot;

/// Hub への問い合わせ・コマンド送信の失敗
///
/// Hub のイベントループが既に停止している場合にのみ発生する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("hub event loop is no longer running")]
    Unavailable,
}

impl From<oneshot::error::RecvError> for HubError {
    fn from(_: oneshot::error::RecvError) -> Self {
        Self::Unavailable
    }
}
