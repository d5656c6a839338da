//! # boxsync-transport
//!
//! [`ContainerRemote`](boxsync_entity::remote::ContainerRemote) over the
//! device's HTTP container endpoints.

pub mod http;

pub use http::HttpContainerRemote;
