//! WebSocket chat relay: HTTP surface and connection pumps.

mod handler;
pub mod pump;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
