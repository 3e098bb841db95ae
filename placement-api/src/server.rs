use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{ping, read_root, save_placement};
use constants::api::{DEFAULT_API_PORT, PING_ROUTE, SAVE_ROUTE};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_API_PORT,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn build_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(read_root))
        .route(PING_ROUTE, get(ping))
        .route(SAVE_ROUTE, post(save_placement))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: ApiConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("Invalid bind address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Placement API listening on http://{}", addr);

    axum::serve(listener, build_router())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_all_interfaces_on_5000() {
        assert_eq!(ApiConfig::default().bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn builder_overrides() {
        let config = ApiConfig::new().with_host("127.0.0.1").with_port(8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
