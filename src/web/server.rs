//! Web server using Axum.

use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::router::create_app_router;
use crate::error::{Error, Result};
use crate::registry::SharedRegistry;

/// Web server configuration.
pub struct WebServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Run the relay server until ctrl-c.
pub async fn run_server(config: WebServerConfig, registry: SharedRegistry) -> Result<()> {
    let app = create_app_router(registry)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Web(format!("Invalid address: {}", e)))?;

    tracing::info!("Starting crewd relay on {}", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("MCP endpoint: http://{}/mcp", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
