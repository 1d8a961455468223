//! Adapters layer
//!
//! In-memory implementations of the outbound ports, used by tests and by the
//! runtime when no real messaging backend is configured.

mod memory;

pub use memory::{InMemoryChatMembers, InMemoryHistory};
