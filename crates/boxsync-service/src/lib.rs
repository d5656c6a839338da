//! # boxsync-service
//!
//! The container-tree synchronization engine:
//!
//! - [`registry`]: the id-indexed tree and its canonical flat order
//! - [`reconcile`]: merging full snapshots into the tree
//! - [`push`]: applying pushed add/change/delete records
//! - [`access`]: last-access timestamps
//! - [`autolock`]: the idle auto-lock sweep
//! - [`controller`]: reload scheduling, mutations, and event broadcast
//! - [`policy`]: what the user may do with a container

pub mod access;
pub mod autolock;
pub mod controller;
pub mod events;
mod mutation;
pub mod policy;
pub mod push;
pub mod reconcile;
pub mod registry;
pub mod timer;

pub use access::AccessTracker;
pub use autolock::AutoLockSweeper;
pub use controller::{LoadHandle, SyncController, SyncControllerBuilder};
pub use events::{ContainerEvent, EventBus};
pub use policy::ContainerPolicy;
pub use registry::{ContainerRegistry, SharedRegistry};
pub use timer::ReloadTimer;
