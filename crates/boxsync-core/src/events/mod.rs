//! Local session events consumed by the sync engine.
//!
//! These originate outside the container tree (login state, the push
//! socket, job lists) and only ever cause reloads.

pub mod session;

pub use session::SessionEvent;
