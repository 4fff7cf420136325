//! Video publishing trait.

use crate::constants::youtube;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Metadata-only video insert collaborator.
pub trait VideoPublisher: Send + Sync {
    /// Insert a video resource owned by the access token's account.
    ///
    /// Returns the collaborator's response body untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::VideoUploadFailed`](crate::RelayError::VideoUploadFailed)
    /// on transport errors, non-2xx responses or a malformed body.
    fn insert_video(
        &self,
        access_token: &str,
        metadata: &VideoMetadata,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

/// Video resource body sent to `videos.insert`.
///
/// Serializes to `{"snippet": {..}, "status": {"privacyStatus": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    /// Title, description, fixed tags and category.
    pub snippet: VideoSnippet,

    /// Visibility.
    pub status: VideoStatus,
}

/// `snippet` part of a video resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// Tags.
    pub tags: Vec<String>,
    /// `YouTube` category id.
    pub category_id: String,
}

/// `status` part of a video resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    /// `public`, `unlisted` or `private`; passed through unchecked.
    pub privacy_status: String,
}

impl VideoMetadata {
    /// Metadata with the relay's fixed tags and category.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        privacy_status: impl Into<String>,
    ) -> Self {
        Self {
            snippet: VideoSnippet {
                title: title.into(),
                description: description.into(),
                tags: youtube::TAGS.iter().map(ToString::to_string).collect(),
                category_id: youtube::CATEGORY_ID.to_string(),
            },
            status: VideoStatus {
                privacy_status: privacy_status.into(),
            },
        }
    }
}
