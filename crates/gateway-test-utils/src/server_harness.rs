//! Test server harness for E2E testing
//!
//! Provides `TestGatewayServer` for spawning real gateway instances in tests.
//! Each server gets its own in-memory user store (seeded with `admin` /
//! `admin123`) and a `ManualClock`, so tests can expire tokens without
//! sleeping.

use gateway_service::clock::ManualClock;
use gateway_service::config::Config;
use gateway_service::models::TokenResponse;
use gateway_service::observability::metrics::init_metrics_recorder;
use gateway_service::repositories::InMemoryUserStore;
use gateway_service::routes::{self, AppState};
use gateway_service::services::HttpUpstreamClient;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "test-gateway-secret-at-least-32-bytes-long";

/// Seeded administrator credentials.
pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "admin123";

/// Global metrics handle for test servers.
///
/// The Prometheus recorder can only be installed once per process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics handle shared by all test servers in this process.
pub fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning the API gateway in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_root_lists_services() -> Result<()> {
///     let server = TestGatewayServer::spawn().await?;
///
///     let response = reqwest::get(server.url()).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestGatewayServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    clock: Arc<ManualClock>,
    _handle: JoinHandle<()>,
}

impl TestGatewayServer {
    /// Spawn a server with default service URLs (nothing listens there).
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a server forwarding to the given student and course base URLs.
    pub async fn spawn_with_backends(
        student_url: &str,
        course_url: &str,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::from([
            ("STUDENT_SERVICE_URL".to_string(), student_url.to_string()),
            ("COURSE_SERVICE_URL".to_string(), course_url.to_string()),
        ]))
        .await
    }

    /// Spawn a server with extra environment-style configuration.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use the minimum bcrypt cost to keep tests fast
    /// - Seed the administrator account
    /// - Start the HTTP server in the background
    pub async fn spawn_with_vars(
        overrides: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ("BCRYPT_COST".to_string(), "10".to_string()),
            ("ADMIN_USERNAME".to_string(), TEST_ADMIN_USERNAME.to_string()),
            ("ADMIN_PASSWORD".to_string(), TEST_ADMIN_PASSWORD.to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let clock = Arc::new(ManualClock::starting_now());
        let upstream = Arc::new(
            HttpUpstreamClient::new(config.upstream_timeout)
                .map_err(|e| anyhow::anyhow!("Failed to build upstream client: {}", e))?,
        );

        let state = Arc::new(
            AppState::new(
                config,
                Arc::new(InMemoryUserStore::new()),
                clock.clone(),
                upstream,
            )
            .map_err(|e| anyhow::anyhow!("Failed to create app state: {}", e))?,
        );
        state
            .seed_admin()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed admin: {}", e))?;

        // Build routes using the gateway's real route builder
        let app = routes::build_routes(state.clone(), test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            clock,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Clock driving token issuance and validation.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Log in through `POST /auth/login` and return the access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/auth/login", self.url()))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        anyhow::ensure!(
            response.status().is_success(),
            "login failed with status {}",
            response.status()
        );

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Log in as the seeded administrator.
    pub async fn admin_token(&self) -> Result<String, anyhow::Error> {
        self.login(TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD).await
    }
}

impl Drop for TestGatewayServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
