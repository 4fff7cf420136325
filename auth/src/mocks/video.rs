//! Mock video publisher for testing.

use crate::error::{RelayError, Result};
use crate::providers::{VideoMetadata, VideoPublisher};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock video publisher.
///
/// Records every insert and answers with a canned resource.
#[derive(Debug, Clone)]
pub struct MockVideoPublisher {
    response: Value,
    should_succeed: bool,
    calls: Arc<AtomicUsize>,
    last_insert: Arc<Mutex<Option<(String, VideoMetadata)>>>,
}

impl MockVideoPublisher {
    /// Create a publisher answering `{"id": "vid1"}`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response: json!({"id": "vid1"}),
            should_succeed: true,
            calls: Arc::new(AtomicUsize::new(0)),
            last_insert: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a publisher whose inserts fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Answer with this resource instead.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Number of inserts attempted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Access token and metadata of the most recent insert.
    #[must_use]
    pub fn last_insert(&self) -> Option<(String, VideoMetadata)> {
        self.last_insert
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockVideoPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPublisher for MockVideoPublisher {
    async fn insert_video(&self, access_token: &str, metadata: &VideoMetadata) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_insert.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((access_token.to_string(), metadata.clone()));

        if !self.should_succeed {
            return Err(RelayError::VideoUploadFailed(
                "videos.insert returned 403 Forbidden".to_string(),
            ));
        }

        Ok(self.response.clone())
    }
}
