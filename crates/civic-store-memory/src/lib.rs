//! In-memory backend for the civic record store.
//!
//! Records live for the life of the process; the emergency alert log keeps
//! only the newest [`MAX_ALERTS`]. Each record family sits behind
//! its own [`tokio::sync::RwLock`], so readers of one family never wait on
//! writers of another.

mod store;

pub use civic_core::{Error, Result};
pub use store::{MAX_ALERTS, MemoryStore};
