//! Pending-session storage trait.
//!
//! Stores the result of a completed callback until the client polls for it.
//!
//! # Semantics
//!
//! - **Last write wins**: a second `put` under the same state replaces the first
//! - **Single-use**: `take` removes atomically; concurrent takes of one state
//!   yield exactly one `Some`
//! - **Ephemeral**: entries older than their TTL are never returned and are
//!   dropped by `purge_expired`
//!
//! ```ignore
//! store.put(state.clone(), PendingSession::Profile(profile), Duration::minutes(10)).await?;
//!
//! match store.take(&state).await? {
//!     Some(session) => { /* hand it to the client */ }
//!     None => { /* not ready yet, already collected, or expired */ }
//! }
//! ```

use crate::error::Result;
use crate::state::{PendingSession, StateKey};
use chrono::Duration;

/// Pending-session store keyed by `state`.
pub trait SessionStore: Send + Sync {
    /// Store a pending session, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn put(
        &self,
        state: StateKey,
        session: PendingSession,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Atomically remove and return a live entry.
    ///
    /// # Errors
    ///
    /// Returns error only on storage failures, not on missing/expired entries.
    fn take(
        &self,
        state: &StateKey,
    ) -> impl std::future::Future<Output = Result<Option<PendingSession>>> + Send;

    /// Return a live entry without removing it.
    ///
    /// # Errors
    ///
    /// Returns error only on storage failures.
    fn peek(
        &self,
        state: &StateKey,
    ) -> impl std::future::Future<Output = Result<Option<PendingSession>>> + Send;

    /// Drop every expired entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn purge_expired(&self) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// Number of entries currently held, expired or not.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn len(&self) -> impl std::future::Future<Output = Result<usize>> + Send;
}
