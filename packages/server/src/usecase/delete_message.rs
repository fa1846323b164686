//! UseCase: メッセージ削除処理（DeleteMessage）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HubState::delete_message() / HubState::delete_and_notify() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作者本人だけが削除でき、残りのメッセージの並び順が保たれることを保証
//! - 削除されたメッセージが以降のリプレイに含まれないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：作者本人による削除
//! - 異常系：作者以外による削除、二重削除

use crate::{
    domain::{ClientId, MessageId},
    infrastructure::dto::websocket::MessageDeletedMessage,
};

use super::hub::{HubState, encode};

impl HubState {
    /// 作者本人であれば削除する（通知はしない）
    pub fn delete_message(&mut self, message_id: &MessageId, requester: &ClientId) -> bool {
        let deleted = self.store.delete(message_id, requester);
        if deleted {
            tracing::info!("Message {} deleted by {}", message_id, requester);
        } else {
            tracing::debug!(
                "Delete of message {} by {} ignored (not found or not the author)",
                message_id,
                requester
            );
        }
        deleted
    }

    /// 削除に成功した場合のみ、削除通知を全員へブロードキャストする
    pub fn delete_and_notify(&mut self, message_id: MessageId, requester: &ClientId) -> bool {
        let now = self.now();
        self.room.touch(requester, now);

        if !self.delete_message(&message_id, requester) {
            return false;
        }
        if let Some(payload) = encode(&MessageDeletedMessage::new(&message_id, now)) {
            self.broadcast(&payload);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::hub::test_support::{content, drain, hub_state, join};
    use crate::domain::Username;

    fn name(value: &str) -> Username {
        Username::from_query(Some(value.to_string()), "Anonymous")
    }

    #[test]
    fn test_author_delete_is_broadcast_and_order_preserved() {
        // テスト項目: 作者本人の削除が messageDeleted として届き、残りの順序は保たれる
        // given (前提条件):
        let mut state = hub_state();
        let (alice, mut rx) = join(&mut state, "alice", 16);
        let first = state.post_message(alice.clone(), name("alice"), content("one"));
        let second = state.post_message(alice.clone(), name("alice"), content("two"));
        let third = state.post_message(alice.clone(), name("alice"), content("three"));
        drain(&mut rx);

        // when (操作):
        let deleted = state.delete_and_notify(second.id.clone(), &alice);

        // then (期待する結果):
        assert!(deleted);
        let ids: Vec<_> = state.store().messages().iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec![first.id, third.id]);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "messageDeleted");
        assert_eq!(events[0]["messageId"], second.id.as_str());
    }

    #[test]
    fn test_non_author_delete_is_silently_ignored() {
        // テスト項目: 作者以外の削除は失敗し、何も送信されない
        // given (前提条件):
        let mut state = hub_state();
        let (alice, mut rx_alice) = join(&mut state, "alice", 16);
        let (bob, _rx_bob) = join(&mut state, "bob", 16);
        let message = state.post_message(alice, name("alice"), content("mine"));
        drain(&mut rx_alice);

        // when (操作):
        let deleted = state.delete_and_notify(message.id.clone(), &bob);

        // then (期待する結果):
        assert!(!deleted);
        assert!(state.store().get(&message.id).is_some());
        assert!(drain(&mut rx_alice).is_empty());
    }

    #[test]
    fn test_second_delete_is_ignored() {
        // テスト項目: 既に削除されたメッセージの削除は失敗する
        // given (前提条件):
        let mut state = hub_state();
        let (alice, _rx) = join(&mut state, "alice", 16);
        let message = state.post_message(alice.clone(), name("alice"), content("bye"));
        state.delete_message(&message.id, &alice);

        // when (操作):
        let deleted = state.delete_message(&message.id, &alice);

        // then (期待する結果):
        assert!(!deleted);
        assert!(state.store().is_empty());
    }

    #[test]
    fn test_deleted_message_is_not_replayed() {
        // テスト項目: 削除されたメッセージは新規参加者へのリプレイに含まれない
        // given (前提条件):
        let mut state = hub_state();
        let (alice, _rx) = join(&mut state, "alice", 64);
        let kept = state.post_message(alice.clone(), name("alice"), content("kept"));
        let removed = state.post_message(alice.clone(), name("alice"), content("removed"));
        state.delete_and_notify(removed.id, &alice);

        // when (操作):
        let (_bob, mut rx_bob) = join(&mut state, "bob", 64);

        // then (期待する結果):
        let events = drain(&mut rx_bob);
        let messages: Vec<_> = events.iter().filter(|e| e["type"] == "message").collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["id"], kept.id.as_str());
    }
}
