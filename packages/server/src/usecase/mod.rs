//! UseCase 層
//!
//! Hub のイベントループと、Hub が処理する各コマンドのユースケース。

mod broadcast;
pub mod command;
mod connect_participant;
mod delete_message;
mod disconnect_participant;
mod edit_message;
pub mod error;
pub mod handle;
pub mod hub;
mod send_message;
mod update_typing;

pub use command::{ClientRegistration, HubCommand, HubSnapshot};
pub use error::HubError;
pub use handle::HubHandle;
pub use hub::{BroadcastReport, Hub, HubState};
