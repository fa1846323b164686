//! Shared application state.

use std::sync::Arc;

use crate::{config::ServerConfig, usecase::HubHandle};

/// State shared by every handler
pub struct AppState {
    /// Hub の受信箱への送信口（共有状態には直接触れない）
    pub hub: HubHandle,
    pub config: Arc<ServerConfig>,
}
