//! Handlers that do not depend on relay state.

pub mod health;

pub use health::health_check;
