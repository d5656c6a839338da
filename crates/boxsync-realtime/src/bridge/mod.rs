//! Routing of push and session events into the sync controller.

pub mod event_bridge;

pub use event_bridge::{BridgeInput, EventBridge};
