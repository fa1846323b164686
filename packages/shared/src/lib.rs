//! Shared utilities for the Hiroba chat relay.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod time;
