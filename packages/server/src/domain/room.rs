//! Room: Hub のメンバーシップ集合
//!
//! 登録中の参加者を登録順に保持する。ここに含まれる参加者だけが
//! ブロードキャストの対象になる。

use super::{
    entity::Participant,
    error::RoomError,
    value_object::{ClientId, Timestamp},
};

#[derive(Debug, Clone, Default)]
pub struct Room {
    participants: Vec<Participant>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_participant(&mut self, participant: Participant) -> Result<(), RoomError> {
        if self.contains(&participant.id) {
            return Err(RoomError::DuplicateParticipant(
                participant.id.into_string(),
            ));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// 参加者を取り除く。存在しなければ `None`（冪等）
    pub fn remove_participant(&mut self, client_id: &ClientId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| &p.id == client_id)?;
        Some(self.participants.remove(index))
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.participants.iter().any(|p| &p.id == client_id)
    }

    pub fn participant(&self, client_id: &ClientId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == client_id)
    }

    /// タイピング状態を更新し、last_seen も進める
    pub fn set_typing(&mut self, client_id: &ClientId, is_typing: bool, now: Timestamp) -> bool {
        match self.participant_mut(client_id) {
            Some(participant) => {
                participant.is_typing = is_typing;
                participant.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// last_seen を更新する
    pub fn touch(&mut self, client_id: &ClientId, now: Timestamp) -> bool {
        match self.participant_mut(client_id) {
            Some(participant) => {
                participant.last_seen = now;
                true
            }
            None => false,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn client_ids(&self) -> Vec<ClientId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn participant_mut(&mut self, client_id: &ClientId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.id == client_id)
    }
}
