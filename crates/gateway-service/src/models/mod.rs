//! Data models for the gateway: the user record and the HTTP DTOs.

use common::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to self-registered users.
pub const ROLE_USER: &str = "user";

/// Role assigned to the seeded administrator.
pub const ROLE_ADMIN: &str = "admin";

/// Token type returned by the login endpoint.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// A registered user.
///
/// Created once at registration and never mutated. `password_hash` is a
/// bcrypt hash and is redacted in Debug output.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Form body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

/// JSON body of `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: SecretString,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Public view of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub message: String,
    pub available_services: Vec<String>,
}
