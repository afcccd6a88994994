//! HTTP resource API over thermometers and their captures.
//!
//! Routes map one-to-one onto [`ThermometerService`](crate::capture::ThermometerService)
//! operations; domain failures become JSON error bodies only at this edge.

pub mod config;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::capture::ThermometerRegistry;
use crate::error::{Result, ThermometerError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve the resource API until `cancel` fires.
pub async fn start_web_server(
    config: WebConfig,
    registry: Arc<ThermometerRegistry>,
    cancel: CancellationToken,
) -> Result<()> {
    let app = create_app(&config, registry);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| ThermometerError::config_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ThermometerError::web_server_error(format!("Failed to bind to address: {}", e))
    })?;

    info!("Thermometer API listening on http://{}", addr);
    info!("Thermometers: http://{}/thermometers/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| ThermometerError::web_server_error(format!("Server error: {}", e)))?;

    info!("Web server stopped");
    Ok(())
}
