//! WebSocket chat relay server.
//!
//! Relays chat messages, edits, deletions, typing state and presence between
//! every connected client through a single Hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    config::{
        ConnectionConfig, DEFAULT_HOST, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PORT,
        DEFAULT_QUEUE_CAPACITY, DEFAULT_REPLAY_LIMIT, DEFAULT_USERNAME, HubConfig, ServerConfig,
    },
    infrastructure::message_pusher::ChannelMessagePusher,
    ui::Server,
    usecase::Hub,
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket chat relay with history replay and presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of recent messages replayed to a newly connected client
    #[arg(long, default_value_t = DEFAULT_REPLAY_LIMIT)]
    history_limit: usize,

    /// Capacity of each client's outbound queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Largest inbound message accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Seconds without any inbound frame before a connection is closed
    #[arg(long, default_value_t = 60)]
    pong_wait_secs: u64,

    /// Seconds between pings (defaults to 9/10 of the pong wait)
    #[arg(long)]
    ping_period_secs: Option<u64>,

    /// Deadline of a single write, in seconds
    #[arg(long, default_value_t = 10)]
    write_wait_secs: u64,

    /// Display name for clients that connect without one
    #[arg(long, default_value = DEFAULT_USERNAME)]
    default_username: String,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let pong_wait = Duration::from_secs(self.pong_wait_secs);
        let ping_period = self
            .ping_period_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| ConnectionConfig::ping_period_for(pong_wait));

        ServerConfig {
            host: self.host,
            port: self.port,
            default_username: self.default_username,
            hub: HubConfig {
                replay_limit: self.history_limit,
                ..HubConfig::default()
            },
            connection: ConnectionConfig {
                outbound_queue_capacity: self.queue_capacity,
                max_message_size: self.max_message_size,
                pong_wait,
                ping_period,
                write_wait: Duration::from_secs(self.write_wait_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME")], &args.log_level);

    if let Err(e) = run(args.into_config()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;

    // 1. Hub（共有状態を唯一所有するイベントループ）
    let (hub, handle) = Hub::new(
        &config.hub,
        Box::new(ChannelMessagePusher::new()),
        Arc::new(SystemClock),
    );
    hub.spawn();

    // 2. Server
    Server::new(handle, config).run().await
}
