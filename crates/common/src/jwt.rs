//! JWT utilities shared by the gateway and its test support crate.
//!
//! This module provides:
//! - Size limits checked before any parsing
//! - Clock skew constants for `iat` validation
//! - The subject/expiry claims carried by access tokens
//! - Pure time checks (`validate_exp`, `validate_iat`) that take `now` as an
//!   argument so callers can drive them from an injectable clock
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Every validation error renders the same generic message
//! - The `sub` field is redacted in Debug output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Access tokens carry three small claims and an HS256 signature, so real
/// tokens are well under 300 bytes. Anything larger is rejected before base64
/// decoding or signature verification.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Default clock skew tolerance for the `iat` claim (5 minutes).
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during JWT validation.
///
/// Messages are intentionally identical; the variant is only for logs and
/// metrics labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token is not a structurally valid JWT or its signature does not match.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token has no usable `sub` claim.
    #[error("The access token is invalid or expired")]
    MissingSubject,

    /// Token `exp` has elapsed.
    #[error("The access token is invalid or expired")]
    Expired,

    /// Token `iat` claim is too far in the future.
    #[error("The access token is invalid or expired")]
    IatTooFarInFuture,
}

impl JwtValidationError {
    /// Short reason label for metrics and debug logs.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TokenTooLarge => "too_large",
            Self::MalformedToken => "malformed",
            Self::MissingSubject => "missing_subject",
            Self::Expired => "expired",
            Self::IatTooFarInFuture => "clock_skew",
        }
    }
}

// =============================================================================
// Claims Types
// =============================================================================

/// Access token claims: subject plus issue and expiry timestamps.
///
/// `sub` defaults to an empty string when absent so that a missing subject is
/// reported as [`JwtValidationError::MissingSubject`] rather than a decode
/// failure.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectClaims {
    /// Subject (username). Redacted in Debug output.
    #[serde(default)]
    pub sub: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,
}

impl fmt::Debug for SubjectClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectClaims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .finish()
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Reject tokens larger than [`MAX_JWT_SIZE_BYTES`].
///
/// # Errors
///
/// Returns `JwtValidationError::TokenTooLarge` if the token exceeds the limit.
pub fn check_size(token: &str) -> Result<(), JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }
    Ok(())
}

/// Validate the `exp` claim against `now` (Unix epoch seconds).
///
/// A token whose expiry equals `now` is already expired. No leeway is applied.
///
/// # Errors
///
/// Returns `JwtValidationError::Expired` if `exp <= now`.
pub fn validate_exp(exp: i64, now: i64) -> Result<(), JwtValidationError> {
    if exp <= now {
        tracing::debug!(target: "common.jwt", exp = exp, now = now, "Token rejected: expired");
        return Err(JwtValidationError::Expired);
    }
    Ok(())
}

/// Validate the `iat` claim with clock skew tolerance.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat` is more than
/// `clock_skew` ahead of `now`.
#[allow(clippy::cast_possible_wrap)] // skew is at most minutes
pub fn validate_iat(iat: i64, now: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let max_iat = now + clock_skew.as_secs() as i64;
    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }
    Ok(())
}
