//! Shared domain types used across all BoxSync crates.

pub mod id;

pub use id::ContainerId;
