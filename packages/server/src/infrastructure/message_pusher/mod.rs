//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `channel`: クライアントごとの有界 mpsc チャンネルを使った実装

pub mod channel;

pub use channel::ChannelMessagePusher;
