//! Builder for hand-crafted access tokens.
//!
//! Lets tests produce tokens the gateway would never issue itself: expired,
//! issued in the future, without a subject, or signed with the wrong key.

use chrono::{DateTime, Duration, Utc};
use common::jwt::SubjectClaims;
use gateway_service::crypto::sign_token;

use crate::server_harness::TEST_JWT_SECRET;

/// Builder for test access tokens.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    exp: i64,
    iat: i64,
    secret: String,
}

impl TestTokenBuilder {
    /// Create a builder for `admin`, valid for 15 minutes from now.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a builder whose `iat` is `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            sub: "admin".to_string(),
            exp: (now + Duration::minutes(15)).timestamp(),
            iat: now.timestamp(),
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    /// Set the subject.
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set expiration in seconds relative to `iat`.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = self.iat + seconds;
        self
    }

    /// Set issued-at timestamp.
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Sign with a different secret.
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// The claims as they will be signed.
    pub fn claims(&self) -> SubjectClaims {
        SubjectClaims {
            sub: self.sub.clone(),
            exp: self.exp,
            iat: self.iat,
        }
    }

    /// Sign the token with HS256.
    pub fn sign(self) -> String {
        sign_token(&self.claims(), self.secret.as_bytes()).expect("HS256 signing should succeed")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
