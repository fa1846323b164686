//! WebSocket connection handlers.
//!
//! The acceptor upgrades the request, registers a new client with the Hub
//! and runs the reader/writer pump pair until either side stops.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::stream::StreamExt;
use serde::Deserialize;
use tokio::{sync::mpsc, task::AbortHandle};

use crate::{
    domain::{ClientId, ConnectionState, ConnectionStateError, TeardownCause, Username},
    ui::{
        pump::{ReaderContext, WriterSettings, run_reader, run_writer},
        state::AppState,
    },
    usecase::{ClientRegistration, HubHandle},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let username = Username::from_query(query.username, &state.config.default_username);
    let max_message_size = state.config.connection.max_message_size;

    ws.max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state, username))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, username: Username) {
    let client_id = ClientId::generate();
    let settings = &state.config.connection;
    let (channel, queue) = mpsc::channel(settings.outbound_queue_capacity);
    let mut lifecycle = ConnectionLifecycle::new(client_id.clone(), state.hub.clone());

    // Register before the reader starts so the Hub knows the author of every command
    let registration = ClientRegistration {
        client_id: client_id.clone(),
        username: username.clone(),
        channel,
    };
    if let Err(e) = state.hub.register(registration).await {
        tracing::error!("Cannot register {}: {}", username, e);
        lifecycle.teardown(TeardownCause::Aborted).await;
        return;
    }
    lifecycle.registered();

    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(run_writer(
        sink,
        queue,
        client_id.clone(),
        WriterSettings {
            ping_period: settings.ping_period,
            write_wait: settings.write_wait,
        },
    ));
    let mut reader = tokio::spawn(run_reader(
        stream,
        ReaderContext {
            client_id: client_id.clone(),
            username,
            hub: state.hub.clone(),
            pong_wait: settings.pong_wait,
        },
    ));
    let _pumps = AbortOnDrop(vec![reader.abort_handle(), writer.abort_handle()]);
    lifecycle.activated();
    tracing::debug!("Pumps started for {}", client_id);

    tokio::select! {
        exit = &mut reader => {
            tracing::debug!("Reader of {} stopped: {:?}", client_id, exit);
            lifecycle.teardown(TeardownCause::ReaderExited).await;
            // Unregister closes the queue; let the writer send its close frame
            if tokio::time::timeout(settings.write_wait, &mut writer).await.is_err() {
                writer.abort();
            }
        }
        exit = &mut writer => {
            tracing::debug!("Writer of {} stopped: {:?}", client_id, exit);
            lifecycle.teardown(TeardownCause::WriterExited).await;
            reader.abort();
        }
    }

    lifecycle.finish();
}

/// Aborts the pump tasks when the connection handler goes away
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Tracks one connection through its lifecycle and sends Unregister once
///
/// Dropping it before teardown (task cancelled or panicked) still sends
/// Unregister.
struct ConnectionLifecycle {
    client_id: ClientId,
    hub: HubHandle,
    state: ConnectionState,
}

impl ConnectionLifecycle {
    fn new(client_id: ClientId, hub: HubHandle) -> Self {
        Self {
            client_id,
            hub,
            state: ConnectionState::Connecting,
        }
    }

    fn transition(
        &mut self,
        event: impl FnOnce(ConnectionState) -> Result<ConnectionState, ConnectionStateError>,
    ) {
        match event(self.state) {
            Ok(next) => self.state = next,
            Err(e) => tracing::warn!("Connection {}: {}", self.client_id, e),
        }
    }

    fn registered(&mut self) {
        self.transition(ConnectionState::register);
    }

    fn activated(&mut self) {
        self.transition(ConnectionState::activate);
    }

    /// Returns whether this call sent Unregister
    async fn teardown(&mut self, cause: TeardownCause) -> bool {
        let (next, unregister) = self.state.begin_teardown();
        self.state = next;
        if !unregister {
            return false;
        }

        tracing::debug!("Tearing down {} ({:?})", self.client_id, cause);
        if let Err(e) = self.hub.unregister(self.client_id.clone()).await {
            tracing::debug!("Unregister of {} not delivered: {}", self.client_id, e);
        }
        true
    }

    fn finish(&mut self) {
        self.transition(ConnectionState::finish);
    }
}

impl Drop for ConnectionLifecycle {
    fn drop(&mut self) {
        let (next, unregister) = self.state.begin_teardown();
        self.state = next;
        if unregister {
            tracing::debug!("Connection {} dropped before teardown", self.client_id);
            self.hub.unregister_detached(self.client_id.clone());
        }
    }
}
