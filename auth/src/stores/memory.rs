//! In-memory pending-session store.
//!
//! Entries live in a mutex-guarded `HashMap` shared by every clone of the
//! store. The mutex is never held across an `.await`, so a `take` is a single
//! critical section: of several concurrent takes for one state, exactly one
//! sees the entry.
//!
//! Process restart drops every pending session.

use crate::environment::{Clock, SystemClock};
use crate::error::{RelayError, Result};
use crate::providers::SessionStore;
use crate::state::{PendingSession, StateKey};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Entry {
    session: PendingSession,
    expires_at: DateTime<Utc>,
}

/// Process-wide pending-session store.
#[derive(Clone)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<StateKey, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Create an empty store driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store driven by the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    // A panic while holding the lock cannot leave the map half-updated
    // (every mutation is a single HashMap call), so poisoning is ignored.
    fn entries(&self) -> MutexGuard<'_, HashMap<StateKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("entries", &self.entries().len())
            .finish_non_exhaustive()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn put(&self, state: StateKey, session: PendingSession, ttl: Duration) -> Result<()> {
        let expires_at = self.clock.now().checked_add_signed(ttl).ok_or_else(|| {
            RelayError::InvalidConfig(format!("pending session TTL out of range: {ttl}"))
        })?;
        let replaced = self
            .entries()
            .insert(state, Entry { session, expires_at })
            .is_some();

        if replaced {
            tracing::debug!("Pending session replaced an uncollected entry");
        }
        Ok(())
    }

    async fn take(&self, state: &StateKey) -> Result<Option<PendingSession>> {
        let now = self.clock.now();
        let removed = self.entries().remove(state);

        Ok(removed
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session))
    }

    async fn peek(&self, state: &StateKey) -> Result<Option<PendingSession>> {
        let now = self.clock.now();
        let entries = self.entries();

        Ok(entries
            .get(state)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session.clone()))
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries().len())
    }
}
