//! Container domain entities.

pub mod kind;
pub mod model;
pub mod push;
pub mod record;
pub mod request;

pub use kind::{BoxType, ContainerType, LockState};
pub use model::Container;
pub use push::{AddedContainer, ContainerChangePush, ContainerPatch, ContainerRef};
pub use record::{ContainerListResponse, ContainerRecord};
pub use request::{CreateContainer, RenameContainer};
