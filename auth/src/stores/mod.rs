//! Pending-session storage.
//!
//! - **In-memory store** - process-wide map with per-entry TTL and atomic take
//! - **Expiry sweeper** - background task dropping abandoned entries

pub mod memory;
pub mod sweeper;

pub use memory::InMemorySessionStore;
pub use sweeper::spawn_expiry_sweeper;
