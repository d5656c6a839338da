//! # boxsync-realtime
//!
//! Decodes messages pushed by the device and routes them, together with
//! session events, into the [`SyncController`](boxsync_service::SyncController).

pub mod bridge;
pub mod message;

pub use bridge::{BridgeInput, EventBridge};
pub use message::PushMessage;
