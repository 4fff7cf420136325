//! Relay collaborators.
//!
//! Traits for everything the relay talks to, so the relay service can be
//! driven by mocks in tests and by Google in production.
//!
//! ```text
//!   callback ──► OAuth2Provider ──► token endpoint, userinfo
//!       │
//!       └──────► SessionStore ◄──── poll (take / peek)
//!
//!   share ─────► VideoPublisher ──► YouTube videos.insert
//! ```

pub mod google;
pub mod oauth;
pub mod session;
pub mod video;
pub mod youtube;

pub use google::GoogleOAuthProvider;
pub use oauth::{OAuth2Provider, OAuthTokenResponse};
pub use session::SessionStore;
pub use video::{VideoMetadata, VideoPublisher};
pub use youtube::YouTubeClient;
