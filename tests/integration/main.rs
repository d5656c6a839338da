//! Integration tests driving the sync controller against an in-memory device.


mod autolock_test;
mod mutation_test;
mod push_test;
mod reload_test;
