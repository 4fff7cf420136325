//! # Callback Relay server
//!
//! Environment configuration and application assembly for the relay binary.
//! The relay logic itself lives in `callback-relay-auth`.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod config;

pub use app::{GoogleRelay, build_relay, build_router};
pub use config::{ConfigError, RelayServerConfig};
