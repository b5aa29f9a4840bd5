//! Proxy router: resolves a logical service and relays one request to it.
//!
//! A backend's status code and body are relayed verbatim, including 4xx and
//! 5xx answers. Only failures to get an answer at all become gateway errors:
//!
//! | Situation                  | Gateway error        | Status |
//! |----------------------------|----------------------|--------|
//! | Unknown service name       | `ServiceNotFound`    | 404    |
//! | Verb outside GET/POST/PUT/DELETE | `MethodNotAllowed` | 405 |
//! | Connection refused         | `ServiceUnavailable` | 503    |
//! | No answer within timeout   | `UpstreamTimeout`    | 504    |
//! | Other transport failure    | `ServiceUnavailable` | 503    |
//!
//! Neither a 404 nor a 405 performs any network I/O.

use crate::errors::GatewayError;
use crate::observability::metrics::record_upstream_request;
use crate::services::registry::ServiceRegistry;
use crate::services::upstream::{
    UpstreamClient, UpstreamOutcome, UpstreamRequest, UpstreamResponse, Verb,
};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::{instrument, warn};

/// A request to forward to a logical service.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    /// Logical service name, e.g. `"student"`.
    pub service: String,
    /// Downstream path, e.g. `"/api/students/3"`.
    pub path: String,
    pub method: Method,
    pub body: Option<Bytes>,
    pub content_type: Option<HeaderValue>,
}

/// A backend's answer, relayed to the client unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<HeaderValue>,
}

impl From<UpstreamResponse> for ProxyResponse {
    fn from(response: UpstreamResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
            content_type: response.content_type,
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            None => {
                // Bytes defaults to application/octet-stream; the backend sent none.
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

/// Forwards requests to registered backend services.
#[derive(Clone)]
pub struct ProxyRouter {
    registry: ServiceRegistry,
    upstream: Arc<dyn UpstreamClient>,
}

impl ProxyRouter {
    pub fn new(registry: ServiceRegistry, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { registry, upstream }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Forward `request` to its service and return the backend's answer.
    ///
    /// # Errors
    ///
    /// See the module table.
    #[instrument(skip_all, name = "gw.proxy.forward", fields(service = %request.service, method = %request.method, path = %request.path))]
    pub async fn forward(&self, request: ForwardRequest) -> Result<ProxyResponse, GatewayError> {
        let base_url = self.registry.resolve(&request.service)?;
        let url = join_url(base_url, &request.path);
        let verb = Verb::try_from(&request.method)?;

        let start = Instant::now();
        let outcome = self
            .upstream
            .send(UpstreamRequest {
                verb,
                url,
                body: request.body,
                content_type: request.content_type,
            })
            .await;
        record_upstream_request(&request.service, outcome.label(), start.elapsed());

        match outcome {
            UpstreamOutcome::Response(response) => {
                tracing::debug!(target: "gw.proxy", status = %response.status, "Relaying backend response");
                Ok(ProxyResponse::from(response))
            }
            UpstreamOutcome::ConnectFailed(detail) => {
                warn!(target: "gw.proxy", error = %detail, "Backend refused connection");
                Err(GatewayError::ServiceUnavailable(format!(
                    "Service '{}' is unavailable. Please ensure the service is running on {}",
                    request.service, base_url
                )))
            }
            UpstreamOutcome::TimedOut => Err(GatewayError::UpstreamTimeout(request.service)),
            UpstreamOutcome::Transport(detail) => {
                warn!(target: "gw.proxy", error = %detail, "Backend transport failure");
                Err(GatewayError::ServiceUnavailable(format!(
                    "Error communicating with service '{}': {}",
                    request.service, detail
                )))
            }
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}
