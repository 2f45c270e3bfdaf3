//! Web adaptor
//!
//! Serves the document Q&A API (`/api/v1/health`, `/api/v1/documents/list`,
//! `/api/v1/documents/index`, `/api/v1/chat/message`) from any
//! [`NotebookBackend`]. Pointed at the demo backend it is a drop-in stand-in
//! for the real server, so browser front ends can run without Ollama or
//! ChromaDB.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use notebook_core::{NotebookBackend, NotebookConfig, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::ApiError;

/// Path prefix of every route
pub const API_PREFIX: &str = "/api/v1";

/// Web adaptor configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server host
    pub host: String,

    /// Server port; `0` picks a free port
    pub port: u16,

    /// Deadline applied to every backend call
    pub request_timeout: Duration,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout: Duration::from_secs(300),
            enable_cors: true,
        }
    }
}

impl From<&NotebookConfig> for ApiServerConfig {
    fn from(config: &NotebookConfig) -> Self {
        Self {
            host: config.server_host.clone(),
            port: config.server_port,
            request_timeout: config.request_timeout,
            ..Self::default()
        }
    }
}

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Backend answering the requests
    pub backend: Arc<dyn NotebookBackend>,

    /// Deadline applied to every backend call
    pub request_timeout: Duration,
}

/// HTTP server for the document Q&A API
pub struct NotebookApiServer {
    config: Arc<ApiServerConfig>,
    backend: Arc<dyn NotebookBackend>,
}

impl NotebookApiServer {
    /// Create a server over a backend
    pub fn new(config: ApiServerConfig, backend: Arc<dyn NotebookBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        let state = ApiState {
            backend: self.backend.clone(),
            request_timeout: self.config.request_timeout,
        };

        let api = Router::new()
            .route("/health", get(handlers::health_handler))
            .route("/documents/list", get(handlers::list_documents_handler))
            .route("/documents/index", post(handlers::index_handler))
            .route("/chat/message", post(handlers::chat_handler))
            .with_state(state);

        let mut router = Router::new()
            .nest(API_PREFIX, api)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    async fn bind(&self) -> Result<tokio::net::TcpListener> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            "Serving {} backend on http://{}{}",
            self.backend.mode(),
            listener.local_addr()?,
            API_PREFIX
        );
        Ok(listener)
    }

    /// Bind and serve in the background; returns the bound address
    pub async fn start(&self) -> Result<SocketAddr> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("API server stopped: {}", e);
            }
        });
        Ok(addr)
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let listener = self.bind().await?;
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down API server");
            })
            .await?;
        Ok(())
    }
}
