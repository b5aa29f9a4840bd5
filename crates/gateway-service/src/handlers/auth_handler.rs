//! Login and registration endpoints.

use crate::errors::GatewayError;
use crate::models::{LoginForm, RegisterRequest, TokenResponse, UserResponse, TOKEN_TYPE_BEARER};
use crate::routes::AppState;
use axum::{extract::State, Form, Json};
use std::sync::Arc;
use tracing::instrument;

/// `POST /auth/login`
///
/// Accepts an `application/x-www-form-urlencoded` body with `username` and
/// `password`. Returns a bearer token valid for the configured login TTL.
#[instrument(skip_all, name = "gw.auth.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, GatewayError> {
    let user = state
        .user_service
        .authenticate(&form.username, &form.password)
        .await?;

    let access_token = state
        .token_service
        .issue_token(&user.username, Some(state.config.access_token_ttl))?;

    tracing::info!(target: "gw.auth", role = %user.role, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
    }))
}

/// `POST /auth/register`
///
/// Accepts a JSON body with `username` and `password` and creates a user
/// with the `"user"` role.
#[instrument(skip_all, name = "gw.auth.register")]
pub async fn handle_register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, GatewayError> {
    let user = state
        .user_service
        .register(&request.username, &request.password)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
