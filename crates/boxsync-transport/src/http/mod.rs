//! HTTP transport.

pub mod client;
pub mod decode;
pub mod endpoints;

pub use client::HttpContainerRemote;
