//! Push and session events → sync controller.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use boxsync_core::events::SessionEvent;
use boxsync_service::SyncController;

use crate::message::decode::decode_push;
use crate::message::types::PushMessage;

/// Something the bridge should route.
#[derive(Debug, Clone)]
pub enum BridgeInput {
    /// A raw push frame, decoded by the bridge.
    Frame(String),
    /// An already decoded push message.
    Push(PushMessage),
    /// A session or connectivity event.
    Session(SessionEvent),
}

/// Feeds push messages and session events to a [`SyncController`].
#[derive(Debug, Clone)]
pub struct EventBridge {
    controller: SyncController,
}

impl EventBridge {
    /// Create a bridge for `controller`.
    pub fn new(controller: SyncController) -> Self {
        Self { controller }
    }

    /// Decode and route one push frame. Undecodable frames are dropped.
    pub fn on_frame(&self, text: &str) {
        match decode_push(text) {
            Ok(message) => self.on_push(message),
            Err(e) => warn!(error = %e, "Dropping undecodable push message"),
        }
    }

    /// Route a decoded push message.
    pub fn on_push(&self, message: PushMessage) {
        debug!(event = message.name(), "Push message received");
        match message {
            PushMessage::ContainerChange(push) => {
                self.controller.apply_push(&push);
            }
            PushMessage::DbInitializationReady => {
                let _ = self.controller.on_db_initialization_ready();
            }
        }
    }

    /// Route a session event.
    pub fn on_session(&self, event: &SessionEvent) {
        let _ = self.controller.on_session_event(event);
    }

    /// Route one input.
    pub fn dispatch(&self, input: BridgeInput) {
        match input {
            BridgeInput::Frame(text) => self.on_frame(&text),
            BridgeInput::Push(message) => self.on_push(message),
            BridgeInput::Session(event) => self.on_session(&event),
        }
    }

    /// Route inputs until the channel closes or `cancel` turns `true`.
    pub async fn run(&self, mut inputs: mpsc::Receiver<BridgeInput>, mut cancel: watch::Receiver<bool>) {
        info!("Event bridge started");
        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Event bridge received shutdown signal");
                        break;
                    }
                }
                input = inputs.recv() => match input {
                    Some(input) => self.dispatch(input),
                    None => {
                        info!("Event bridge input closed");
                        break;
                    }
                },
            }
        }
    }
}
