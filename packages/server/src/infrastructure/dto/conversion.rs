//! Conversion logic between domain entities and DTOs.

use hiroba_shared::time::millis_to_rfc3339;

use crate::domain::{ChatMessage, MessageContent, MessageId, Participant, Timestamp};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&ChatMessage> for dto::ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            r#type: dto::MessageType::Message,
            username: model.author_name.as_str().to_string(),
            user_id: model.author_id.as_str().to_string(),
            content: model.content.as_str().to_string(),
            timestamp: millis_to_rfc3339(model.created_at.value()),
            edited: model.edited,
        }
    }
}

impl From<&Participant> for dto::UserInfo {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            username: model.username.as_str().to_string(),
            is_typing: model.is_typing,
            last_seen: millis_to_rfc3339(model.last_seen.value()),
        }
    }
}

impl dto::UserListMessage {
    pub fn from_participants(participants: &[Participant], now: Timestamp) -> Self {
        let users: Vec<dto::UserInfo> = participants.iter().map(Into::into).collect();
        Self {
            r#type: dto::MessageType::UserList,
            count: users.len(),
            users,
            timestamp: millis_to_rfc3339(now.value()),
        }
    }
}

impl dto::MessageEditedMessage {
    pub fn new(message_id: &MessageId, content: &MessageContent, now: Timestamp) -> Self {
        Self {
            r#type: dto::MessageType::MessageEdited,
            message_id: message_id.as_str().to_string(),
            content: content.as_str().to_string(),
            timestamp: millis_to_rfc3339(now.value()),
        }
    }
}

impl dto::MessageDeletedMessage {
    pub fn new(message_id: &MessageId, now: Timestamp) -> Self {
        Self {
            r#type: dto::MessageType::MessageDeleted,
            message_id: message_id.as_str().to_string(),
            timestamp: millis_to_rfc3339(now.value()),
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Participant> for http::ParticipantDetailDto {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            username: model.username.as_str().to_string(),
            is_typing: model.is_typing,
            last_seen: millis_to_rfc3339(model.last_seen.value()),
            connected_at: millis_to_rfc3339(model.connected_at.value()),
        }
    }
}
