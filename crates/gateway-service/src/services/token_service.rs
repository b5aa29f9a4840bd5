//! Token service: issues and validates signed bearer tokens.
//!
//! A token carries the username (`sub`), issue time (`iat`) and expiry
//! (`exp`), signed with HS256. Validation is a pure function of the token,
//! the secret and the injected clock's `now`, plus a lookup confirming the
//! subject still names a registered user.

use crate::clock::Clock;
use crate::crypto;
use crate::errors::GatewayError;
use crate::models::User;
use crate::observability::metrics::record_token_validation;
use crate::repositories::UserStore;
use common::jwt::{self, JwtValidationError, SubjectClaims, DEFAULT_CLOCK_SKEW};
use common::secret::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Lifetime of a token issued without an explicit TTL.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Message returned for every rejected bearer token.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// Issues and validates access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: SecretString,
    clock: Arc<dyn Clock>,
    users: Arc<dyn UserStore>,
    clock_skew: Duration,
}

impl TokenService {
    pub fn new(secret: SecretString, clock: Arc<dyn Clock>, users: Arc<dyn UserStore>) -> Self {
        Self {
            secret,
            clock,
            users,
            clock_skew: DEFAULT_CLOCK_SKEW,
        }
    }

    /// Issue a token for `username` valid for `ttl`, or
    /// [`DEFAULT_TOKEN_TTL`] when `ttl` is `None`.
    ///
    /// Issuing does not check that the user exists; validation does.
    #[instrument(skip_all, name = "gw.tokens.issue")]
    pub fn issue_token(&self, username: &str, ttl: Option<Duration>) -> Result<String, GatewayError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| {
            tracing::error!(target: "gw.tokens", "Token TTL out of range");
            GatewayError::Internal
        })?;

        let now = self.clock.now().timestamp();
        let claims = SubjectClaims {
            sub: username.to_string(),
            exp: now.saturating_add(ttl_secs),
            iat: now,
        };

        let token = crypto::sign_token(&claims, self.secret.expose_secret().as_bytes())?;

        tracing::debug!(target: "gw.tokens", ttl_seconds = ttl_secs, "Issued access token");
        Ok(token)
    }

    /// Validate a bearer token and return the user it names.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidToken` if the token is malformed,
    /// tampered, signed with another key, expired, missing its subject, or
    /// names a user that no longer exists. Store failures propagate as-is.
    #[instrument(skip_all, name = "gw.tokens.validate")]
    pub async fn validate_token(&self, token: &str) -> Result<User, GatewayError> {
        let claims = match self.verify_claims(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(target: "gw.tokens", reason = e.reason(), "Token rejected");
                record_token_validation("error", e.reason());
                return Err(GatewayError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string()));
            }
        };

        match self.users.get(&claims.sub).await? {
            Some(user) => {
                record_token_validation("success", "none");
                Ok(user)
            }
            None => {
                tracing::debug!(target: "gw.tokens", "Token subject is not a registered user");
                record_token_validation("error", "unknown_subject");
                Err(GatewayError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string()))
            }
        }
    }

    fn verify_claims(&self, token: &str) -> Result<SubjectClaims, JwtValidationError> {
        let claims = crypto::verify_token(token, self.secret.expose_secret().as_bytes())?;

        if claims.sub.is_empty() {
            return Err(JwtValidationError::MissingSubject);
        }

        let now = self.clock.now().timestamp();
        jwt::validate_exp(claims.exp, now)?;
        jwt::validate_iat(claims.iat, now, self.clock_skew)?;

        Ok(claims)
    }
}
