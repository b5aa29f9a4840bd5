//! Bearer token authentication for protected routes.
//!
//! `require_auth` extracts the token from the `Authorization` header,
//! validates it through the `TokenService`, and stores the resulting
//! [`AuthenticatedUser`] in the request extensions. Every rejection is a 401
//! carrying `WWW-Authenticate: Bearer` (added by `GatewayError`).

use crate::errors::GatewayError;
use crate::models::User;
use crate::routes::AppState;
use crate::services::token_service::INVALID_TOKEN_MESSAGE;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// The caller identified by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
fn extract_bearer_token(req: &Request) -> Result<&str, GatewayError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "gw.middleware.auth", "Missing Authorization header");
            GatewayError::InvalidToken("Not authenticated".to_string())
        })?;

    match auth_header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => {
            tracing::debug!(target: "gw.middleware.auth", "Invalid Authorization header format");
            Err(GatewayError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string()))
        }
    }
}

/// Authentication middleware for protected gateway routes.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing or invalid
/// - Continues to the next handler with `AuthenticatedUser` in extensions otherwise
#[instrument(skip_all, name = "gw.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, GatewayError> {
    let token = extract_bearer_token(&req)?;

    let user = state.token_service.validate_token(token).await?;

    req.extensions_mut().insert(AuthenticatedUser::from(user));

    Ok(next.run(req).await)
}
