//! Protected gateway routes forwarded to the backend services.
//!
//! | Gateway path               | Service   | Backend path          |
//! |----------------------------|-----------|-----------------------|
//! | `/gateway/students`        | `student` | `/api/students`       |
//! | `/gateway/students/{id}`   | `student` | `/api/students/{id}`  |
//! | `/gateway/courses`         | `course`  | `/api/courses`        |
//! | `/gateway/courses/{id}`    | `course`  | `/api/courses/{id}`   |
//!
//! The routes accept every method; the proxy rejects anything outside
//! GET/POST/PUT/DELETE with 405 before contacting the backend.

use crate::config::{COURSE_SERVICE, STUDENT_SERVICE};
use crate::errors::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::routes::AppState;
use crate::services::{ForwardRequest, ProxyResponse};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method},
    Extension,
};
use bytes::Bytes;
use std::sync::Arc;

/// `ANY /gateway/students`
pub async fn students(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ProxyResponse, GatewayError> {
    forward(
        &state,
        &user,
        STUDENT_SERVICE,
        "/api/students".to_string(),
        method,
        &headers,
        body,
    )
    .await
}

/// `ANY /gateway/students/{id}`
pub async fn student_by_id(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ProxyResponse, GatewayError> {
    forward(
        &state,
        &user,
        STUDENT_SERVICE,
        format!("/api/students/{}", id),
        method,
        &headers,
        body,
    )
    .await
}

/// `ANY /gateway/courses`
pub async fn courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ProxyResponse, GatewayError> {
    forward(
        &state,
        &user,
        COURSE_SERVICE,
        "/api/courses".to_string(),
        method,
        &headers,
        body,
    )
    .await
}

/// `ANY /gateway/courses/{id}`
pub async fn course_by_id(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ProxyResponse, GatewayError> {
    forward(
        &state,
        &user,
        COURSE_SERVICE,
        format!("/api/courses/{}", id),
        method,
        &headers,
        body,
    )
    .await
}

async fn forward(
    state: &AppState,
    user: &AuthenticatedUser,
    service: &str,
    path: String,
    method: Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<ProxyResponse, GatewayError> {
    tracing::debug!(
        target: "gw.gateway",
        user = %user.username,
        service = %service,
        method = %method,
        path = %path,
        "Forwarding request"
    );

    let request = ForwardRequest {
        service: service.to_string(),
        path,
        method,
        body: (!body.is_empty()).then_some(body),
        content_type: headers.get(header::CONTENT_TYPE).cloned(),
    };

    state.proxy.forward(request).await
}
