//! # boxsync-core
//!
//! Core crate for BoxSync. Contains the collaborator traits, configuration
//! schemas, typed identifiers, session events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BoxSync crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
