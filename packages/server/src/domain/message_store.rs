//! Message Store
//!
//! 投稿順に並んだチャットメッセージのログ。追記のみだが、
//! 作者本人による本文の編集と任意位置の削除（残りの順序は保持）を許す。
//! 保存件数に上限はなく、新規参加者へのリプレイは末尾の一部に限られる。

use super::{
    entity::ChatMessage,
    value_object::{ClientId, MessageContent, MessageId},
};

#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// 作者本人であれば本文を書き換えて edited を立てる
    ///
    /// 存在しない場合と作者でない場合は区別せず `false` を返す。
    pub fn edit(
        &mut self,
        message_id: &MessageId,
        requester: &ClientId,
        content: MessageContent,
    ) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| &m.id == message_id && m.is_authored_by(requester))
        {
            Some(message) => {
                message.content = content;
                message.edited = true;
                true
            }
            None => false,
        }
    }

    /// 作者本人であれば削除する（残りの順序は保持）
    pub fn delete(&mut self, message_id: &MessageId, requester: &ClientId) -> bool {
        match self
            .messages
            .iter()
            .position(|m| &m.id == message_id && m.is_authored_by(requester))
        {
            Some(index) => {
                self.messages.remove(index);
                true
            }
            None => false,
        }
    }

    /// 直近 `limit` 件を古い順に返す
    pub fn recent(&self, limit: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    pub fn get(&self, message_id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == message_id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Timestamp, Username};

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    fn message_by(author: &str, text: &str) -> ChatMessage {
        ChatMessage::new(
            client(author),
            Username::from_query(Some(author.to_string()), "Anonymous"),
            content(text),
            Timestamp::new(1000),
        )
    }

    fn store_with(count: usize) -> MessageStore {
        let mut store = MessageStore::new();
        for i in 0..count {
            store.append(message_by("alice", &format!("message {}", i)));
        }
        store
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        // テスト項目: 追加したメッセージが投稿順に保持される
        // given (前提条件):
        let mut store = MessageStore::new();

        // when (操作):
        store.append(message_by("alice", "first"));
        store.append(message_by("bob", "second"));

        // then (期待する結果):
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[0].content.as_str(), "first");
        assert_eq!(store.messages()[1].content.as_str(), "second");
    }

    #[test]
    fn test_edit_by_author_updates_content_in_place() {
        // テスト項目: 作者による編集は本文を更新し edited を立て、ID と位置は変わらない
        // given (前提条件):
        let mut store = MessageStore::new();
        store.append(message_by("bob", "before"));
        let target = message_by("alice", "hello");
        let target_id = target.id.clone();
        store.append(target);
        store.append(message_by("bob", "after"));

        // when (操作):
        let edited = store.edit(&target_id, &client("alice"), content("bye"));

        // then (期待する結果):
        assert!(edited);
        let message = &store.messages()[1];
        assert_eq!(message.id, target_id);
        assert_eq!(message.author_id, client("alice"));
        assert_eq!(message.content.as_str(), "bye");
        assert!(message.edited);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_edit_by_non_author_is_rejected() {
        // テスト項目: 作者以外の編集は false を返し、ストアは変化しない
        // given (前提条件):
        let mut store = MessageStore::new();
        let target = message_by("alice", "hello");
        let target_id = target.id.clone();
        store.append(target);
        let before = store.messages().to_vec();

        // when (操作):
        let edited = store.edit(&target_id, &client("bob"), content("hacked"));

        // then (期待する結果):
        assert!(!edited);
        assert_eq!(store.messages(), before.as_slice());
    }

    #[test]
    fn test_edit_unknown_message_returns_false() {
        // テスト項目: 存在しないメッセージの編集は false を返す
        // given (前提条件):
        let mut store = store_with(2);
        let unknown = MessageId::new("missing".to_string()).unwrap();

        // when (操作):
        let edited = store.edit(&unknown, &client("alice"), content("bye"));

        // then (期待する結果):
        assert!(!edited);
    }

    #[test]
    fn test_delete_by_author_preserves_order_of_survivors() {
        // テスト項目: 作者による削除は対象だけを取り除き、残りの順序を保つ
        // given (前提条件):
        let mut store = store_with(3);
        let target_id = store.messages()[1].id.clone();

        // when (操作):
        let deleted = store.delete(&target_id, &client("alice"));

        // then (期待する結果):
        assert!(deleted);
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[0].content.as_str(), "message 0");
        assert_eq!(store.messages()[1].content.as_str(), "message 2");
        assert!(store.get(&target_id).is_none());
    }

    #[test]
    fn test_delete_by_non_author_is_rejected() {
        // テスト項目: 作者以外の削除は false を返し、ストアは変化しない
        // given (前提条件):
        let mut store = store_with(2);
        let target_id = store.messages()[0].id.clone();

        // when (操作):
        let deleted = store.delete(&target_id, &client("bob"));

        // then (期待する結果):
        assert!(!deleted);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_recent_returns_suffix_in_insertion_order() {
        // テスト項目: recent は直近 N 件を古い順に返す
        // given (前提条件):
        let store = store_with(60);

        // when (操作):
        let recent = store.recent(50);

        // then (期待する結果):
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].content.as_str(), "message 10");
        assert_eq!(recent[49].content.as_str(), "message 59");
    }

    #[test]
    fn test_recent_with_fewer_messages_than_limit() {
        // テスト項目: 保存件数が上限より少ない場合は全件を返す
        // given (前提条件):
        let store = store_with(3);

        // when (操作):
        let recent = store.recent(50);

        // then (期待する結果):
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content.as_str(), "message 0");
    }

    #[test]
    fn test_recent_on_empty_store() {
        // テスト項目: 空のストアでは空のスライスを返す
        // given (前提条件):
        let store = MessageStore::new();

        // when (操作):
        let recent = store.recent(50);

        // then (期待する結果):
        assert!(recent.is_empty());
        assert!(store.is_empty());
    }
}
