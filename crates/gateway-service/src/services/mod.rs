//! Service layer for the API gateway.
//!
//! # Components
//!
//! - `user_service` - registration and password authentication
//! - `token_service` - bearer token issuance and validation
//! - `registry` - logical service name to base URL mapping
//! - `upstream` - HTTP client for backend services
//! - `proxy` - request forwarding and failure classification

pub mod proxy;
pub mod registry;
pub mod token_service;
pub mod upstream;
pub mod user_service;

pub use proxy::{ForwardRequest, ProxyResponse, ProxyRouter};
pub use registry::ServiceRegistry;
pub use token_service::TokenService;
pub use upstream::{HttpUpstreamClient, UpstreamClient, UpstreamOutcome, Verb};
pub use user_service::UserService;
