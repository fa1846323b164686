//! HubHandle: Hub の受信箱への送信口
//!
//! 複製可能で、接続ハンドラや HTTP ハンドラから Hub へコマンドを送る。
//! Hub の状態に直接触れることはできない。

use tokio::sync::{
    mpsc::{self, error::TrySendError},
    oneshot,
};

use crate::domain::{ClientId, MessageContent, MessageId, Username};

use super::{
    command::{ClientRegistration, HubCommand, HubSnapshot},
    error::HubError,
};

#[derive(Debug, Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub(crate) fn new(sender: mpsc::Sender<HubCommand>) -> Self {
        Self { sender }
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| HubError::Unavailable)
    }

    pub async fn register(&self, registration: ClientRegistration) -> Result<(), HubError> {
        self.send(HubCommand::Register(registration)).await
    }

    pub async fn unregister(&self, client_id: ClientId) -> Result<(), HubError> {
        self.send(HubCommand::Unregister(client_id)).await
    }

    /// `Drop` などの同期コンテキストから Unregister を発行する
    ///
    /// 受信箱が満杯の場合は送信用のタスクを起動する。
    pub fn unregister_detached(&self, client_id: ClientId) {
        match self.sender.try_send(HubCommand::Unregister(client_id)) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let sender = self.sender.clone();
                    runtime.spawn(async move {
                        let _ = sender.send(command).await;
                    });
                }
                Err(_) => tracing::warn!("No runtime available to deliver unregister command"),
            },
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Hub already stopped; unregister dropped");
            }
        }
    }

    pub async fn broadcast(&self, payload: String) -> Result<(), HubError> {
        self.send(HubCommand::Broadcast(payload)).await
    }

    pub async fn post_message(
        &self,
        author_id: ClientId,
        author_name: Username,
        content: MessageContent,
    ) -> Result<(), HubError> {
        self.send(HubCommand::PostMessage {
            author_id,
            author_name,
            content,
        })
        .await
    }

    /// 編集が行われたかどうかを返す（存在しない場合と作者でない場合は区別しない）
    pub async fn edit_message(
        &self,
        message_id: MessageId,
        requester: ClientId,
        content: MessageContent,
    ) -> Result<bool, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::EditMessage {
            message_id,
            requester,
            content,
            reply,
        })
        .await?;
        Ok(response.await?)
    }

    /// 削除が行われたかどうかを返す（存在しない場合と作者でない場合は区別しない）
    pub async fn delete_message(
        &self,
        message_id: MessageId,
        requester: ClientId,
    ) -> Result<bool, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::DeleteMessage {
            message_id,
            requester,
            reply,
        })
        .await?;
        Ok(response.await?)
    }

    pub async fn set_typing(&self, client_id: ClientId, is_typing: bool) -> Result<(), HubError> {
        self.send(HubCommand::SetTyping {
            client_id,
            is_typing,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<HubSnapshot, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply }).await?;
        Ok(response.await?)
    }
}
