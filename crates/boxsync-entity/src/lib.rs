//! # boxsync-entity
//!
//! Domain models for BoxSync: the container records exchanged with the
//! device, the pushed change payloads, the in-memory [`Container`]
//! entity, and the [`ContainerRemote`] boundary that produces them.

pub mod container;
pub mod remote;

pub use container::{BoxType, Container, ContainerRecord, ContainerType, LockState};
pub use remote::ContainerRemote;
