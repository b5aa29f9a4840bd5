//! HTTP client for backend services.
//!
//! The client reports transport results as an [`UpstreamOutcome`] rather
//! than an error: a backend that answers with 4xx/5xx is a successful
//! exchange whose status the proxy relays, while refused connections and
//! timeouts are classified for the proxy to map onto gateway errors.

use crate::errors::GatewayError;
use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{error, instrument};

/// Upper bound for establishing a TCP connection to a backend.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP verbs the gateway forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&Method> for Verb {
    type Error = GatewayError;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        if method == Method::GET {
            Ok(Verb::Get)
        } else if method == Method::POST {
            Ok(Verb::Post)
        } else if method == Method::PUT {
            Ok(Verb::Put)
        } else if method == Method::DELETE {
            Ok(Verb::Delete)
        } else {
            Err(GatewayError::MethodNotAllowed(method.to_string()))
        }
    }
}

/// A request addressed to a concrete backend URL.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub verb: Verb,
    pub url: String,
    pub body: Option<Bytes>,
    pub content_type: Option<HeaderValue>,
}

/// A backend's answer, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<HeaderValue>,
}

/// Result of one forwarded exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// The backend answered (any status).
    Response(UpstreamResponse),
    /// No connection could be established.
    ConnectFailed(String),
    /// The backend did not answer within the timeout.
    TimedOut,
    /// Any other transport-level failure.
    Transport(String),
}

impl UpstreamOutcome {
    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamOutcome::Response(_) => "response",
            UpstreamOutcome::ConnectFailed(_) => "connect_failed",
            UpstreamOutcome::TimedOut => "timeout",
            UpstreamOutcome::Transport(_) => "transport_error",
        }
    }
}

/// Sends requests to backend services.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> UpstreamOutcome;
}

/// reqwest-backed upstream client.
///
/// Idle connections are not pooled: backends may restart between requests,
/// and a stale pooled connection would surface as a transport error rather
/// than a clean connect failure.
#[derive(Clone)]
pub struct HttpUpstreamClient {
    client: Client,
}

impl HttpUpstreamClient {
    /// Create a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                error!(target: "gw.services.upstream", error = %e, "Failed to build HTTP client");
                GatewayError::Internal
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    #[instrument(skip_all, fields(verb = %request.verb, url = %request.url))]
    async fn send(&self, request: UpstreamRequest) -> UpstreamOutcome {
        let mut builder = match request.verb {
            Verb::Get => self.client.get(&request.url),
            Verb::Post => self.client.post(&request.url),
            Verb::Put => self.client.put(&request.url),
            Verb::Delete => self.client.delete(&request.url),
        };
        if let Some(content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return classify(&e),
        };

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

        match response.bytes().await {
            Ok(body) => UpstreamOutcome::Response(UpstreamResponse {
                status,
                body,
                content_type,
            }),
            Err(e) => classify(&e),
        }
    }
}

/// Timeouts are checked first: a connect timeout is both, and the client
/// should see 504 for it.
fn classify(e: &reqwest::Error) -> UpstreamOutcome {
    if e.is_timeout() {
        UpstreamOutcome::TimedOut
    } else if e.is_connect() {
        UpstreamOutcome::ConnectFailed(e.to_string())
    } else {
        UpstreamOutcome::Transport(e.to_string())
    }
}

/// Scriptable upstream client for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock upstream client.
    pub struct MockUpstreamClient {
        /// Outcomes to return (cycles through them).
        outcomes: Vec<UpstreamOutcome>,
        /// Number of calls made.
        call_count: AtomicUsize,
        /// Requests received, in order.
        requests: Mutex<Vec<UpstreamRequest>>,
    }

    impl MockUpstreamClient {
        /// Create a mock that answers every request with `status` and a JSON body.
        pub fn responding(status: StatusCode, body: serde_json::Value) -> Self {
            Self::with_outcomes(vec![UpstreamOutcome::Response(UpstreamResponse {
                status,
                body: Bytes::from(body.to_string()),
                content_type: Some(HeaderValue::from_static("application/json")),
            })])
        }

        /// Create a mock whose connections are always refused.
        pub fn refusing() -> Self {
            Self::with_outcomes(vec![UpstreamOutcome::ConnectFailed(
                "connection refused".to_string(),
            )])
        }

        /// Create a mock that always times out.
        pub fn timing_out() -> Self {
            Self::with_outcomes(vec![UpstreamOutcome::TimedOut])
        }

        /// Create a mock that returns custom outcomes in sequence.
        pub fn with_outcomes(outcomes: Vec<UpstreamOutcome>) -> Self {
            Self {
                outcomes,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests received so far.
        pub fn requests(&self) -> Vec<UpstreamRequest> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstreamClient {
        async fn send(&self, request: UpstreamRequest) -> UpstreamOutcome {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }

            if self.outcomes.is_empty() {
                return UpstreamOutcome::Transport("mock has no outcomes".to_string());
            }
            self.outcomes
                .get(idx % self.outcomes.len())
                .cloned()
                .unwrap_or(UpstreamOutcome::TimedOut)
        }
    }
}
