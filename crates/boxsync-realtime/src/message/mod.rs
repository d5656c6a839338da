//! Push message types and decoding.

pub mod decode;
pub mod types;

pub use decode::decode_push;
pub use types::PushMessage;
