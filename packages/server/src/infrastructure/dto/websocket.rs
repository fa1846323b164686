//! WebSocket message DTOs.
//!
//! Outbound events carry a `type` field built from [`MessageType`];
//! inbound commands are decoded into the [`ClientCommand`] tagged enum.

use serde::{Deserialize, Serialize};

/// Discriminator of outbound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Message,
    UserList,
    MessageEdited,
    MessageDeleted,
}

/// Chat message broadcast to every client (also used for history replay)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub r#type: MessageType,
    pub username: String,
    pub user_id: String,
    pub content: String,
    /// RFC 3339 (UTC)
    pub timestamp: String,
    pub edited: bool,
}

/// One entry of the presence snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub is_typing: bool,
    /// RFC 3339 (UTC)
    pub last_seen: String,
}

/// Presence snapshot of every registered client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListMessage {
    pub r#type: MessageType,
    pub users: Vec<UserInfo>,
    pub count: usize,
    pub timestamp: String,
}

/// Notice that a stored message was edited by its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEditedMessage {
    pub r#type: MessageType,
    pub message_id: String,
    pub content: String,
    pub timestamp: String,
}

/// Notice that a stored message was deleted by its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedMessage {
    pub r#type: MessageType,
    pub message_id: String,
    pub timestamp: String,
}

/// Commands sent by clients, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    Message { content: String },
    Typing { is_typing: bool },
    Edit { message_id: String, content: String },
    Delete { message_id: String },
}
