//! Hiroba chat relay server.
//!
//! A single Hub task owns membership, message history and every client's
//! outbound queue; each WebSocket connection runs a reader and a writer pump
//! that talk to the Hub through a [`usecase::HubHandle`].

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
