//! Infrastructure layer: wire formats and outbound queue management.

pub mod dto;
pub mod message_pusher;
