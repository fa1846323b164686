//! Domain layer for the chat relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod connection;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod message_store;
pub mod room;
pub mod value_object;

pub use connection::{ConnectionState, TeardownCause};
pub use entity::{ChatMessage, Participant};
pub use error::{ConnectionStateError, MessagePushError, RoomError, ValueObjectError};
pub use message_pusher::{BroadcastOutcome, MessagePusher, PusherChannel};
pub use message_store::MessageStore;
pub use room::Room;
pub use value_object::{ClientId, MessageContent, MessageId, Timestamp, Username};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
