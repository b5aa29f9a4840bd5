//! Stand-ins for backend services.
//!
//! `FakeBackend` wraps a wiremock server and counts the requests it has
//! received, so tests can assert that the gateway did (or did not) contact
//! the backend.

use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A scriptable HTTP backend.
pub struct FakeBackend {
    server: MockServer,
}

impl FakeBackend {
    /// Start a backend with no routes mounted (every request gets 404).
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to register with the gateway.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Answer `verb route` with `status` and a JSON body.
    pub async fn respond_json(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `verb route` with 200 after `delay`.
    pub async fn respond_after(&self, verb: &str, route: &str, delay: Duration) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Bodies of the requests received so far, in order.
    pub async fn received_bodies(&self) -> Vec<Vec<u8>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| request.body)
            .collect()
    }
}

/// A loopback URL with nothing listening on it.
///
/// Binds an ephemeral port and releases it immediately.
pub fn unreachable_url() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("binding an ephemeral port should succeed");
    let addr = listener
        .local_addr()
        .expect("ephemeral listener should have an address");
    drop(listener);
    format!("http://{}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_backend_counts_calls() {
        let backend = FakeBackend::start().await;
        backend
            .respond_json("GET", "/api/courses", 200, serde_json::json!([]))
            .await;

        assert_eq!(backend.call_count().await, 0);

        let response = reqwest::get(format!("{}/api/courses", backend.url()))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(backend.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_unreachable_url_refuses_connections() {
        let result = reqwest::get(format!("{}/api/students", unreachable_url())).await;
        assert!(result.unwrap_err().is_connect());
    }
}
