//! Mock provider implementations for testing.
//!
//! In-memory stand-ins for every collaborator in
//! [`RelayEnvironment`](crate::environment::RelayEnvironment), so relay flows
//! can be tested without reaching Google.

pub mod clock;
pub mod oauth;
pub mod video;

pub use clock::ManualClock;
pub use oauth::MockOAuth2Provider;
pub use video::MockVideoPublisher;
