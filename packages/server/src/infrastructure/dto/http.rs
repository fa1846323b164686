//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Participant entry of the hub snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub id: String,
    pub username: String,
    pub is_typing: bool,
    pub last_seen: String,
    pub connected_at: String,
}

/// Response of `GET /debug/hub`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubStateDto {
    pub participants: Vec<ParticipantDetailDto>,
    pub participant_count: usize,
    pub message_count: usize,
}
