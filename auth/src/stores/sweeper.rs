//! Background expiry sweep.
//!
//! Expired entries are already invisible to `take`/`peek`; the sweep only
//! bounds memory held by flows the client abandoned.

use crate::providers::SessionStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a task that calls [`SessionStore::purge_expired`] every `period`.
///
/// The first sweep happens one full `period` after spawning. Abort the
/// returned handle to stop the task.
pub fn spawn_expiry_sweeper<S>(store: S, period: Duration) -> JoinHandle<()>
where
    S: SessionStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => {
                    metrics::counter!("relay.pending_sessions.expired").increment(purged as u64);
                    tracing::debug!(purged, "Dropped expired pending sessions");
                }
                Err(e) => tracing::warn!(error = %e, "Pending-session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mocks::ManualClock;
    use crate::state::{PendingSession, StateKey, TokenPair};
    use crate::stores::InMemorySessionStore;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_after_period() {
        let clock = ManualClock::new(Utc::now());
        let store = InMemorySessionStore::with_clock(Arc::new(clock.clone()));
        store
            .put(
                StateKey::new("abandoned"),
                PendingSession::Tokens(TokenPair {
                    access_token: "T".into(),
                    refresh_token: None,
                }),
                chrono::Duration::seconds(30),
            )
            .await
            .unwrap();

        let handle = spawn_expiry_sweeper(store.clone(), Duration::from_secs(60));
        clock.advance(chrono::Duration::seconds(61));

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.len().await.unwrap(), 0);
        handle.abort();
    }
}
