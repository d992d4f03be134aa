//! Message model for the agent message stream: messages, canonical encodings
//! and domain-separated digests.

pub mod types;
pub mod encode;
pub mod digest;

// Re-export all public items from modules for convenience
pub use types::*;
pub use encode::*;
pub use digest::*;
