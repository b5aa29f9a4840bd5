//! Metrics definitions for the API gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gw_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods seen on the wire
//! - `endpoint`: the gateway's route templates, everything else is `/other`
//! - `service`: registered service names only (unknown names never reach a backend)
//! - `outcome`: 4 values (response, connect_failed, timeout, transport_error)
//! - `reason`: bounded by `JwtValidationError::reason()` plus `none`/`unknown_subject`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle used to
/// render `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("gw_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Upstream buckets extend to the default 10s forwarding timeout
        .set_buckets_for_metric(
            Matcher::Prefix("gw_upstream_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set upstream request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `gw_http_requests_total`, `gw_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("gw_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("gw_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path to its route template.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/metrics" | "/auth/login" | "/auth/register" | "/gateway/students"
        | "/gateway/courses" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

fn normalize_dynamic_endpoint(path: &str) -> String {
    for collection in ["students", "courses"] {
        let prefix = format!("/gateway/{}/", collection);
        if let Some(rest) = path.strip_prefix(&prefix) {
            if !rest.is_empty() && !rest.contains('/') {
                return format!("/gateway/{}/{{id}}", collection);
            }
        }
    }

    "/other".to_string()
}

// ============================================================================
// Upstream Metrics
// ============================================================================

/// Record one forwarded request.
///
/// Metric: `gw_upstream_requests_total`, `gw_upstream_request_duration_seconds`
/// Labels: `service`, `outcome`
pub fn record_upstream_request(service: &str, outcome: &str, duration: Duration) {
    histogram!("gw_upstream_request_duration_seconds",
        "service" => service.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("gw_upstream_requests_total",
        "service" => service.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record a bearer token validation.
///
/// Metric: `gw_token_validations_total`
/// Labels: `status` ("success" or "error"), `reason`
pub fn record_token_validation(status: &str, reason: &str) {
    counter!("gw_token_validations_total",
        "status" => status.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// Run `f` against a fresh local recorder and return the rendered output.
    fn render_with_local_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    /// The sample line of `metric` whose labels include every entry in `labels`.
    fn sample_line<'a>(output: &'a str, metric: &str, labels: &[&str]) -> Option<&'a str> {
        output.lines().find(|line| {
            line.starts_with(&format!("{metric}{{"))
                && labels.iter().all(|label| line.contains(label))
        })
    }

    #[test]
    fn test_record_http_request_uses_route_templates() {
        let output = render_with_local_recorder(|| {
            record_http_request("GET", "/gateway/students/7", 404, Duration::from_millis(12));
            record_http_request("GET", "/gateway/students/8", 404, Duration::from_millis(3));
            record_http_request("GET", "/wp-admin", 404, Duration::from_millis(1));
        });

        let line = sample_line(
            &output,
            "gw_http_requests_total",
            &[r#"endpoint="/gateway/students/{id}""#, r#"status_code="404""#],
        )
        .unwrap();
        assert!(line.ends_with(" 2"), "unexpected sample: {line}");

        assert!(sample_line(&output, "gw_http_requests_total", &[r#"endpoint="/other""#]).is_some());
        assert!(!output.contains("/gateway/students/7"));
        assert!(!output.contains("wp-admin"));
        assert!(output.contains("gw_http_request_duration_seconds"));
    }

    #[test]
    fn test_record_upstream_request_labels() {
        let output = render_with_local_recorder(|| {
            record_upstream_request("course", "connect_failed", Duration::from_millis(1));
            record_upstream_request("student", "response", Duration::from_millis(8));
        });

        let line = sample_line(
            &output,
            "gw_upstream_requests_total",
            &[r#"service="course""#, r#"outcome="connect_failed""#],
        )
        .unwrap();
        assert!(line.ends_with(" 1"), "unexpected sample: {line}");
        assert!(sample_line(
            &output,
            "gw_upstream_requests_total",
            &[r#"service="student""#, r#"outcome="response""#],
        )
        .is_some());
        assert!(output.contains("gw_upstream_request_duration_seconds"));
    }

    #[test]
    fn test_record_token_validation_labels() {
        let output = render_with_local_recorder(|| {
            record_token_validation("error", "expired");
            record_token_validation("error", "expired");
            record_token_validation("success", "none");
        });

        let expired = sample_line(
            &output,
            "gw_token_validations_total",
            &[r#"status="error""#, r#"reason="expired""#],
        )
        .unwrap();
        assert!(expired.ends_with(" 2"), "unexpected sample: {expired}");

        let success = sample_line(
            &output,
            "gw_token_validations_total",
            &[r#"status="success""#, r#"reason="none""#],
        )
        .unwrap();
        assert!(success.ends_with(" 1"), "unexpected sample: {success}");
    }

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(201), "success");
        assert_eq!(categorize_status_code(504), "timeout");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(401), "error");
        assert_eq!(categorize_status_code(503), "error");
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("/"), "/");
        assert_eq!(normalize_endpoint("/auth/login"), "/auth/login");
        assert_eq!(normalize_endpoint("/gateway/students"), "/gateway/students");
        assert_eq!(
            normalize_endpoint("/gateway/students/42"),
            "/gateway/students/{id}"
        );
        assert_eq!(
            normalize_endpoint("/gateway/courses/abc"),
            "/gateway/courses/{id}"
        );
        assert_eq!(normalize_endpoint("/gateway/courses/1/extra"), "/other");
        assert_eq!(normalize_endpoint("/gateway/courses/"), "/other");
        assert_eq!(normalize_endpoint("/wp-admin"), "/other");
    }
}
