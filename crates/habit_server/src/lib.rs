//! HTTP service exposing habit creation, daily views, completion toggles,
//! and the per-day summary.

pub mod config;
pub mod http;
pub mod state;

pub use config::{ConfigError, DbLocation, ServerConfig};
pub use http::build_router;
pub use state::AppState;
