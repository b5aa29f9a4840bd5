//! HTTP routes for the API gateway.
//!
//! Defines the Axum router and application state.

use crate::clock::Clock;
use crate::config::Config;
use crate::errors::GatewayError;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth};
use crate::models::ROLE_ADMIN;
use crate::repositories::UserStore;
use crate::services::{ProxyRouter, ServiceRegistry, TokenService, UpstreamClient, UserService};
use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Overall request deadline when the upstream timeout is shorter.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Registration and password authentication.
    pub user_service: UserService,

    /// Bearer token issuance and validation.
    pub token_service: TokenService,

    /// Forwarding to backend services.
    pub proxy: ProxyRouter,
}

impl AppState {
    /// Wire the services from their collaborators.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Crypto` if the configured bcrypt cost is invalid.
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Result<Self, GatewayError> {
        let user_service = UserService::new(Arc::clone(&users), config.bcrypt_cost)?;
        let token_service = TokenService::new(config.jwt_secret.clone(), clock, users);
        let proxy = ProxyRouter::new(ServiceRegistry::new(config.services.clone()), upstream);

        Ok(Self {
            config,
            user_service,
            token_service,
            proxy,
        })
    }

    /// Create the configured administrator unless it already exists.
    ///
    /// Returns `true` if the account was created.
    pub async fn seed_admin(&self) -> Result<bool, GatewayError> {
        self.user_service
            .ensure_user(
                &self.config.admin_username,
                &self.config.admin_password,
                ROLE_ADMIN,
            )
            .await
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Gateway info and service list - public
/// - `/health` - Liveness probe (simple "OK") - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/auth/login` - Form login, returns a bearer token - public
/// - `/auth/register` - JSON registration - public
/// - `/gateway/students[/:id]` - Forwarded to the student service - requires authentication
/// - `/gateway/courses[/:id]` - Forwarded to the course service - requires authentication
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout longer than the upstream timeout, so a slow backend
///   surfaces as 504 from the proxy rather than 408 from this layer
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = REQUEST_TIMEOUT.max(state.config.upstream_timeout + Duration::from_secs(5));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::gateway_info))
        .route("/health", get(handlers::health_check))
        .route("/auth/login", post(handlers::handle_login))
        .route("/auth/register", post(handlers::handle_register))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required). `any` lets the proxy
    // answer unsupported verbs with its own 405.
    let protected_routes = Router::new()
        .route("/gateway/students", any(handlers::students))
        .route("/gateway/students/:id", any(handlers::student_by_id))
        .route("/gateway/courses", any(handlers::courses))
        .route("/gateway/courses/:id", any(handlers::course_by_id))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}
