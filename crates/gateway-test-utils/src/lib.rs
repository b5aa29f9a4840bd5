//! # Gateway Test Utilities
//!
//! Shared test utilities for the API gateway.
//!
//! This crate provides:
//! - Server test harness (`TestGatewayServer` for E2E tests)
//! - Fake backends (`FakeBackend`, `unreachable_url`)
//! - Token builders (`TestTokenBuilder`)
//! - `ManualClock` for moving time forward
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gateway_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let backend = FakeBackend::start().await;
//!     let server = TestGatewayServer::spawn_with_backends(&backend.url(), &unreachable_url()).await?;
//!     let token = server.admin_token().await?;
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/gateway/students", server.url()))
//!         .bearer_auth(token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 404);
//!     Ok(())
//! }
//! ```

pub mod fake_backend;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use fake_backend::*;
pub use gateway_service::clock::ManualClock;
pub use server_harness::*;
pub use token_builders::*;
