//! Gateway error types.
//!
//! Every error that originates in the gateway itself maps to an HTTP status
//! via the `IntoResponse` impl. Errors reported by a reachable backend are not
//! represented here: the proxy relays those verbatim.
//!
//! Messages for 500-class errors are generic; the underlying detail is logged
//! server-side.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Challenge sent with every 401 so clients know to re-authenticate.
pub const BEARER_CHALLENGE: &str = "Bearer";

/// Gateway error type.
///
/// Maps to HTTP status codes:
/// - InvalidCredentials, InvalidToken: 401 Unauthorized (with `WWW-Authenticate: Bearer`)
/// - DuplicateUser, BadRequest: 400 Bad Request
/// - ServiceNotFound: 404 Not Found
/// - MethodNotAllowed: 405 Method Not Allowed
/// - ServiceUnavailable: 503 Service Unavailable
/// - UpstreamTimeout: 504 Gateway Timeout
/// - Database, Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Username already exists")]
    DuplicateUser,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service '{service}' not found. Available services: {}", .available.join(", "))]
    ServiceNotFound {
        service: String,
        available: Vec<String>,
    },

    #[error("Method '{0}' not allowed")]
    MethodNotAllowed(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request to service '{0}' timed out")]
    UpstreamTimeout(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl GatewayError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::InvalidCredentials | GatewayError::InvalidToken(_) => 401,
            GatewayError::DuplicateUser | GatewayError::BadRequest(_) => 400,
            GatewayError::ServiceNotFound { .. } => 404,
            GatewayError::MethodNotAllowed(_) => 405,
            GatewayError::ServiceUnavailable(_) => 503,
            GatewayError::UpstreamTimeout(_) => 504,
            GatewayError::Database(_) | GatewayError::Crypto(_) | GatewayError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            GatewayError::InvalidToken(reason) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason.clone())
            }
            GatewayError::DuplicateUser => {
                (StatusCode::BAD_REQUEST, "DUPLICATE_USER", self.to_string())
            }
            GatewayError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            GatewayError::ServiceNotFound { .. } => {
                (StatusCode::NOT_FOUND, "SERVICE_NOT_FOUND", self.to_string())
            }
            GatewayError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                self.to_string(),
            ),
            GatewayError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "gw.availability", reason = %reason, "Upstream unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    reason.clone(),
                )
            }
            GatewayError::UpstreamTimeout(service) => {
                tracing::warn!(target: "gw.availability", service = %service, "Upstream timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    self.to_string(),
                )
            }
            GatewayError::Database(err) => {
                tracing::error!(target: "gw.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            GatewayError::Crypto(err) => {
                tracing::error!(target: "gw.crypto", error = %err, "Cryptographic operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            GatewayError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BEARER_CHALLENGE),
            );
        }

        response
    }
}

/// Convert sqlx errors to GatewayError
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        GatewayError::Database(err.to_string())
    }
}
