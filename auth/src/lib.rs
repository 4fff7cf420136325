//! # Callback Relay
//!
//! Relays the result of a Google OAuth sign-in from the browser to a client
//! application that cannot receive the redirect itself (a game, a desktop
//! app, a device).
//!
//! ## Flow
//!
//! ```text
//! client ──opens browser──▶ Google consent
//!                              │
//!                              ▼
//!          GET /auth/google/callback?code&state
//!              exchange code, fetch profile, store under state
//!                              │
//! client ──GET /getProfile?state──▶ payload (once)
//! ```
//!
//! The `state` value is the only link between the two halves, and collecting
//! a stored result removes it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use callback_relay_auth::*;
//!
//! let env = RelayEnvironment::new(
//!     GoogleOAuthProvider::new(client_id, client_secret, redirect_uri),
//!     YouTubeClient::new(),
//!     InMemorySessionStore::new(),
//! );
//! let relay = Arc::new(CallbackRelay::new(env, RelayConfig::default(), None)?);
//! let app = relay_router(relay);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod relay;
pub mod router;
pub mod state;
pub mod stores;
pub mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use config::{PayloadMode, RelayConfig};
pub use environment::{Clock, RelayEnvironment, SystemClock};
pub use error::{RelayError, Result};
pub use providers::{GoogleOAuthProvider, YouTubeClient};
pub use relay::{CallbackOutcome, CallbackParams, CallbackRelay, RetrieveParams, ShareRequest};
pub use router::relay_router;
pub use state::{PendingSession, StateKey, TokenPair, UserProfile};
pub use stores::{InMemorySessionStore, spawn_expiry_sweeper};
pub use token::{SessionClaims, SessionTokenIssuer};
