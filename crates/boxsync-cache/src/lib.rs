//! # boxsync-cache
//!
//! Key-value store implementations for BoxSync client state. Supports two
//! modes:
//!
//! - **memory**: In-process store using [moka](https://crates.io/crates/moka)
//! - **file**: One JSON document per key in a directory
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::StoreManager;
