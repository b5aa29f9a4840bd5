//! API Gateway Library
//!
//! A single public entry point in front of the student and course services:
//!
//! - Credential authority: user registration, password login, bearer tokens
//! - Proxy router: forwards authenticated `/gateway/*` requests to the
//!   backend that owns them and relays the backend's answer verbatim
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `clock` - Injectable time source for token expiry
//! - `config` - Service configuration from environment
//! - `crypto` - bcrypt hashing and HS256 token signing
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer authentication and HTTP metrics
//! - `models` - User record and HTTP DTOs
//! - `observability` - Prometheus metrics
//! - `repositories` - User storage (in-memory and PostgreSQL)
//! - `routes` - Axum router setup
//! - `services` - User, token, registry, upstream and proxy services

pub mod clock;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
