//! HTTP middleware for the API gateway.
//!
//! # Components
//!
//! - `auth` - Bearer token authentication for protected routes
//! - `http_metrics` - HTTP request metrics

pub mod auth;
pub mod http_metrics;

pub use auth::{require_auth, AuthenticatedUser};
pub use http_metrics::http_metrics_middleware;
