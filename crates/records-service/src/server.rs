//! Process bootstrap shared by the `student-service` and `course-service`
//! binaries.

use crate::config::Config;
use crate::models::Record;
use crate::routes::build_routes;
use crate::store::RecordStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Serve `T`'s seeded collection until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the listener cannot bind.
pub async fn run<T: Record>(default_bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env(default_bind_address).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let store = Arc::new(RecordStore::<T>::seeded());
    let app = build_routes(store);

    let addr: SocketAddr = config.bind_address.parse()?;
    info!(collection = T::COLLECTION, "{} service listening on {}", T::LABEL, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} service shutdown complete", T::LABEL);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
