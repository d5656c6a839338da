//! Collaborator traits defined by the core crate.
//!
//! Implementations live in other crates (`boxsync-cache`) or are supplied
//! by the embedding application (device capabilities, error reporting).

pub mod device;
pub mod reporter;
pub mod store;

pub use device::{DeviceCapabilities, UserContext};
pub use reporter::{ErrorReporter, LogReporter};
pub use store::KeyValueStore;
