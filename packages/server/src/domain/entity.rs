//! Entities
//!
//! 識別子を持ち、ライフサイクルを通じて同一性が保たれるドメインオブジェクト。

use super::value_object::{ClientId, MessageContent, MessageId, Timestamp, Username};

/// 保存されるチャットメッセージ
///
/// `author_name` は投稿時点の表示名のスナップショット。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author_id: ClientId,
    pub author_name: Username,
    pub content: MessageContent,
    pub created_at: Timestamp,
    pub edited: bool,
}

impl ChatMessage {
    /// 新しいメッセージを作成（ID を採番し、edited = false）
    pub fn new(
        author_id: ClientId,
        author_name: Username,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            author_id,
            author_name,
            content,
            created_at,
            edited: false,
        }
    }

    pub fn is_authored_by(&self, client_id: &ClientId) -> bool {
        &self.author_id == client_id
    }
}

/// Hub に登録されている参加者（プレゼンス情報を含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ClientId,
    pub username: Username,
    pub is_typing: bool,
    pub last_seen: Timestamp,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(id: ClientId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            id,
            username,
            is_typing: false,
            last_seen: connected_at,
            connected_at,
        }
    }
}
