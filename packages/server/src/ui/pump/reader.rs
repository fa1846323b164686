//! Reader pump: transport → Hub.
//!
//! Decodes inbound text frames into commands and forwards them to the Hub
//! in the order they were read. A frame that fails to decode is logged and
//! dropped; the connection keeps going.

use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::stream::{Stream, StreamExt};
use thiserror::Error;

use crate::{
    domain::{ClientId, MessageContent, MessageId, Username, ValueObjectError},
    infrastructure::dto::websocket::ClientCommand,
    usecase::{HubError, HubHandle},
};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid command: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error("binary frames are not supported")]
    Binary,
}

/// Why the reader stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderExit {
    /// The peer sent a close frame
    PeerClosed,
    /// The stream ended without a close frame
    StreamEnded,
    /// Nothing arrived within the read deadline
    TimedOut,
    /// The transport reported an error (including an oversized message)
    TransportError,
    /// The Hub is no longer running
    HubUnavailable,
}

/// A decoded command, validated into domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Post(MessageContent),
    Typing(bool),
    Edit(MessageId, MessageContent),
    Delete(MessageId),
}

pub fn decode(text: &str) -> Result<Action, DecodeError> {
    let command: ClientCommand = serde_json::from_str(text)?;
    let action = match command {
        ClientCommand::Message { content } => Action::Post(MessageContent::new(content)?),
        ClientCommand::Typing { is_typing } => Action::Typing(is_typing),
        ClientCommand::Edit {
            message_id,
            content,
        } => Action::Edit(MessageId::new(message_id)?, MessageContent::edited(content)),
        ClientCommand::Delete { message_id } => Action::Delete(MessageId::new(message_id)?),
    };
    Ok(action)
}

/// Identity of the connection the reader belongs to
#[derive(Debug, Clone)]
pub struct ReaderContext {
    pub client_id: ClientId,
    pub username: Username,
    pub hub: HubHandle,
    pub pong_wait: Duration,
}

pub async fn run_reader<S>(mut stream: S, context: ReaderContext) -> ReaderExit
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let client_id = &context.client_id;
    loop {
        // Every frame, pongs included, restarts the deadline
        let next = match tokio::time::timeout(context.pong_wait, stream.next()).await {
            Ok(next) => next,
            Err(_) => {
                tracing::warn!(
                    "No activity from {} for {:?}; closing",
                    client_id,
                    context.pong_wait
                );
                return ReaderExit::TimedOut;
            }
        };

        let message = match next {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error from {}: {}", client_id, e);
                return ReaderExit::TransportError;
            }
            None => return ReaderExit::StreamEnded,
        };

        let decoded = match message {
            Message::Text(text) => decode(text.as_str()),
            Message::Binary(_) => Err(DecodeError::Binary),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                tracing::info!("Client {} requested close", client_id);
                return ReaderExit::PeerClosed;
            }
        };

        match decoded {
            Ok(action) => {
                if let Err(e) = dispatch(&context, action).await {
                    tracing::error!("Cannot forward command from {}: {}", client_id, e);
                    return ReaderExit::HubUnavailable;
                }
            }
            Err(e) => tracing::warn!("Dropped frame from {}: {}", client_id, e),
        }
    }
}

async fn dispatch(context: &ReaderContext, action: Action) -> Result<(), HubError> {
    let hub = &context.hub;
    let client_id = context.client_id.clone();
    match action {
        Action::Post(content) => {
            hub.post_message(client_id, context.username.clone(), content)
                .await
        }
        Action::Typing(is_typing) => hub.set_typing(client_id, is_typing).await,
        Action::Edit(message_id, content) => {
            if !hub.edit_message(message_id, client_id, content).await? {
                tracing::debug!("Edit from {} rejected", context.client_id);
            }
            Ok(())
        }
        Action::Delete(message_id) => {
            if !hub.delete_message(message_id, client_id).await? {
                tracing::debug!("Delete from {} rejected", context.client_id);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::stream;
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        config::HubConfig,
        infrastructure::message_pusher::ChannelMessagePusher,
        usecase::{ClientRegistration, Hub},
    };

    fn text(json: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(json.into()))
    }

    /// Hub を起動し、読み込み側のクライアントを登録しておく
    async fn connected_reader(
        pong_wait: Duration,
    ) -> (ReaderContext, mpsc::Receiver<String>) {
        let (hub, handle) = Hub::new(
            &HubConfig::default(),
            Box::new(ChannelMessagePusher::new()),
            Arc::new(FixedClock::new(1672531200000)),
        );
        hub.spawn();

        let client_id = ClientId::generate();
        let username = Username::from_query(Some("alice".to_string()), "Anonymous");
        let (channel, mut rx) = mpsc::channel(64);
        handle
            .register(ClientRegistration {
                client_id: client_id.clone(),
                username: username.clone(),
                channel,
            })
            .await
            .unwrap();
        let presence: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(presence["type"], "userList");

        let context = ReaderContext {
            client_id,
            username,
            hub: handle,
            pong_wait,
        };
        (context, rx)
    }

    async fn received(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
        let mut events = Vec::new();
        while let Ok(payload) = rx.try_recv() {
            events.push(serde_json::from_str(&payload).unwrap());
        }
        events
    }

    #[test]
    fn test_decode_rejects_empty_content() {
        // テスト項目: content が空の message コマンドはデコードエラーになる
        // given (前提条件):
        let json = r#"{"type":"message","content":""}"#;

        // when (操作):
        let result = decode(json);

        // then (期待する結果):
        assert!(matches!(result, Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_type_and_missing_fields() {
        // テスト項目: 未知の type や必須フィールドの欠落はデコードエラーになる
        assert!(matches!(
            decode(r#"{"type":"shout","content":"hi"}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"edit","content":"hi"}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_edit_command() {
        // テスト項目: edit コマンドがドメインの値に変換される
        // given (前提条件):
        let json = r#"{"type":"edit","messageId":"m-1","content":"fixed"}"#;

        // when (操作):
        let action = decode(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            action,
            Action::Edit(
                MessageId::new("m-1".to_string()).unwrap(),
                MessageContent::new("fixed".to_string()).unwrap()
            )
        );
    }

    #[test]
    fn test_decode_edit_allows_empty_content() {
        // テスト項目: edit コマンドは content が空文字でもデコードされる
        // given (前提条件):
        let json = r#"{"type":"edit","messageId":"m-1","content":""}"#;

        // when (操作):
        let action = decode(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            action,
            Action::Edit(
                MessageId::new("m-1".to_string()).unwrap(),
                MessageContent::edited(String::new())
            )
        );
    }

    #[tokio::test]
    async fn test_reader_forwards_empty_edit_to_hub() {
        // テスト項目: 作者による空文字への編集が Hub に届き、messageEdited が送られる
        // given (前提条件):
        let (context, mut rx) = connected_reader(Duration::from_secs(5)).await;
        let hub = context.hub.clone();
        let post = stream::iter(vec![text(r#"{"type":"message","content":"oops"}"#)]);
        run_reader(post, context.clone()).await;
        hub.snapshot().await.unwrap();
        let posted = received(&mut rx).await;
        let message_id = posted[0]["id"].as_str().unwrap().to_string();
        let edit = format!(
            r#"{{"type":"edit","messageId":"{}","content":""}}"#,
            message_id
        );

        // when (操作):
        let exit = run_reader(stream::iter(vec![text(&edit)]), context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::StreamEnded);
        hub.snapshot().await.unwrap();
        let events = received(&mut rx).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "messageEdited");
        assert_eq!(events[0]["messageId"], message_id.as_str());
        assert_eq!(events[0]["content"], "");
    }

    #[tokio::test]
    async fn test_reader_forwards_messages_in_order() {
        // テスト項目: 読み込んだ順にコマンドが Hub へ転送され、ストリーム終了で停止する
        // given (前提条件):
        let (context, mut rx) = connected_reader(Duration::from_secs(5)).await;
        let hub = context.hub.clone();
        let frames = stream::iter(vec![
            text(r#"{"type":"message","content":"one"}"#),
            text(r#"{"type":"message","content":"two"}"#),
        ]);

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::StreamEnded);
        hub.snapshot().await.unwrap();
        let events = received(&mut rx).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["content"], "one");
        assert_eq!(events[1]["content"], "two");
        assert_eq!(events[0]["username"], "alice");
    }

    #[tokio::test]
    async fn test_reader_drops_bad_frames_and_keeps_going() {
        // テスト項目: 不正なフレームは破棄され、後続の正しいフレームは処理される
        // given (前提条件):
        let (context, mut rx) = connected_reader(Duration::from_secs(5)).await;
        let hub = context.hub.clone();
        let frames = stream::iter(vec![
            text("not json"),
            text(r#"{"type":"unknown"}"#),
            text(r#"{"type":"message","content":""}"#),
            Ok(Message::Binary(vec![1, 2, 3].into())),
            text(r#"{"type":"message","content":"still here"}"#),
        ]);

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::StreamEnded);
        hub.snapshot().await.unwrap();
        let events = received(&mut rx).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["content"], "still here");
    }

    #[tokio::test]
    async fn test_reader_stops_on_close_frame() {
        // テスト項目: close フレームで停止し、その後のフレームは処理されない
        // given (前提条件):
        let (context, mut rx) = connected_reader(Duration::from_secs(5)).await;
        let hub = context.hub.clone();
        let frames = stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"type":"message","content":"too late"}"#),
        ]);

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::PeerClosed);
        hub.snapshot().await.unwrap();
        assert!(received(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_reader_stops_on_transport_error() {
        // テスト項目: トランスポートエラーで停止する
        // given (前提条件):
        let (context, _rx) = connected_reader(Duration::from_secs(5)).await;
        let frames = stream::iter(vec![Err(axum::Error::new(std::io::Error::other(
            "connection reset",
        )))]);

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::TransportError);
    }

    #[tokio::test]
    async fn test_reader_times_out_without_activity() {
        // テスト項目: 読み込み期限までに何も届かなければ停止する
        // given (前提条件):
        let (context, _rx) = connected_reader(Duration::from_millis(50)).await;
        let frames = stream::pending::<Result<Message, axum::Error>>();

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::TimedOut);
    }

    #[tokio::test]
    async fn test_pong_frames_keep_connection_alive() {
        // テスト項目: pong フレームは破棄されるが読み込みは継続する
        // given (前提条件):
        let (context, mut rx) = connected_reader(Duration::from_secs(5)).await;
        let hub = context.hub.clone();
        let frames = stream::iter(vec![
            Ok(Message::Pong(Default::default())),
            text(r#"{"type":"typing","isTyping":true}"#),
        ]);

        // when (操作):
        let exit = run_reader(frames, context).await;

        // then (期待する結果):
        assert_eq!(exit, ReaderExit::StreamEnded);
        hub.snapshot().await.unwrap();
        let events = received(&mut rx).await;
        assert_eq!(events[0]["type"], "userList");
        assert_eq!(events[0]["users"][0]["isTyping"], true);
    }
}
