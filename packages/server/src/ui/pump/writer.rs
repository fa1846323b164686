//! Writer pump: outbound queue → transport.
//!
//! Sole consumer of a client's outbound queue. Also sends liveness pings
//! on a fixed interval. Every write is bounded by the write deadline.

use std::{fmt::Display, time::Duration};

use axum::{body::Bytes, extract::ws::Message};
use futures_util::sink::{Sink, SinkExt};
use thiserror::Error;
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::ClientId;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("write did not complete within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Why the writer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterExit {
    /// The Hub closed the outbound queue; a close frame was sent
    QueueClosed,
    /// A queued event or a ping could not be written
    WriteFailed,
}

#[derive(Debug, Clone, Copy)]
pub struct WriterSettings {
    pub ping_period: Duration,
    pub write_wait: Duration,
}

pub async fn run_writer<S>(
    mut sink: S,
    mut queue: mpsc::Receiver<String>,
    client_id: ClientId,
    settings: WriterSettings,
) -> WriterExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ping = tokio::time::interval_at(
        Instant::now() + settings.ping_period,
        settings.ping_period,
    );
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let (message, kind) = tokio::select! {
            next = queue.recv() => match next {
                Some(payload) => (Message::Text(payload.into()), "event"),
                None => {
                    tracing::debug!("Outbound queue of {} closed", client_id);
                    if let Err(e) = write(&mut sink, Message::Close(None), settings.write_wait).await {
                        tracing::debug!("Close frame to {} not sent: {}", client_id, e);
                    }
                    return WriterExit::QueueClosed;
                }
            },
            _ = ping.tick() => (Message::Ping(Bytes::new()), "ping"),
        };

        if let Err(e) = write(&mut sink, message, settings.write_wait).await {
            tracing::warn!("Failed to write {} to {}: {}", kind, client_id, e);
            return WriterExit::WriteFailed;
        }
    }
}

async fn write<S>(sink: &mut S, message: Message, write_wait: Duration) -> Result<(), WriteError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match tokio::time::timeout(write_wait, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WriteError::Transport(e.to_string())),
        Err(_) => Err(WriteError::Timeout(write_wait)),
    }
}
