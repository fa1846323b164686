//! Server configuration.
//!
//! Built from command-line arguments in the binary; tests construct it
//! directly (usually from [`ServerConfig::default`]).

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_USERNAME: &str = "Anonymous";
pub const DEFAULT_REPLAY_LIMIT: usize = 50;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);
const DEFAULT_INBOX_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ping period ({ping_period:?}) must be shorter than pong wait ({pong_wait:?})")]
    PingPeriodTooLong {
        ping_period: Duration,
        pong_wait: Duration,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Settings of the Hub event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Number of most recent messages replayed to a newly registered client
    pub replay_limit: usize,
    /// Capacity of the Hub's command inbox
    pub inbox_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            replay_limit: DEFAULT_REPLAY_LIMIT,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

/// Per-connection limits and deadlines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub outbound_queue_capacity: usize,
    /// Largest inbound message accepted, in bytes
    pub max_message_size: usize,
    /// Read deadline, extended whenever anything arrives from the peer
    pub pong_wait: Duration,
    /// Interval of liveness pings sent by the writer
    pub ping_period: Duration,
    /// Deadline of a single write
    pub write_wait: Duration,
}

impl ConnectionConfig {
    /// Ping period used when none is given: 9/10 of the pong wait
    pub fn ping_period_for(pong_wait: Duration) -> Duration {
        pong_wait * 9 / 10
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            pong_wait: DEFAULT_PONG_WAIT,
            ping_period: Self::ping_period_for(DEFAULT_PONG_WAIT),
            write_wait: DEFAULT_WRITE_WAIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Display name given to clients that connect without a `username`
    pub default_username: String,
    pub hub: HubConfig,
    pub connection: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_username: DEFAULT_USERNAME.to_string(),
            hub: HubConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let connection = &self.connection;
        if connection.ping_period >= connection.pong_wait {
            return Err(ConfigError::PingPeriodTooLong {
                ping_period: connection.ping_period,
                pong_wait: connection.pong_wait,
            });
        }
        if connection.ping_period.is_zero() {
            return Err(ConfigError::Zero("ping period"));
        }
        if connection.write_wait.is_zero() {
            return Err(ConfigError::Zero("write wait"));
        }
        if connection.outbound_queue_capacity == 0 {
            return Err(ConfigError::Zero("outbound queue capacity"));
        }
        if connection.max_message_size == 0 {
            return Err(ConfigError::Zero("max message size"));
        }
        if self.hub.inbox_capacity == 0 {
            return Err(ConfigError::Zero("hub inbox capacity"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
