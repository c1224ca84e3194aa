//! HTTP server for askdoc
//!
//! Thin plumbing around the RAG pipeline: a file-upload endpoint, a query
//! endpoint, and optional static-frontend serving. All pipeline behavior
//! lives in `askdoc-rag`; this crate only maps HTTP to service calls and
//! service errors to status codes.

mod routes;
mod state;

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use askdoc_core::{Error, Result};
use askdoc_rag::RagService;

pub use state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, host:port
    pub bind: String,
    /// Directory where uploaded files are stored
    pub upload_dir: PathBuf,
    /// Directory with the static frontend build, served on non-API routes
    pub static_dir: Option<PathBuf>,
    /// Upper bound on upload request bodies, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            upload_dir: PathBuf::from("uploads"),
            static_dir: None,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// The askdoc HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new server around an already-constructed service
    pub fn new(config: ServerConfig, service: Arc<RagService>) -> Result<Self> {
        std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
            Error::Configuration(format!(
                "failed to create upload directory {}: {}",
                config.upload_dir.display(),
                e
            ))
        })?;

        let state = AppState {
            service,
            upload_dir: config.upload_dir.clone(),
        };

        Ok(Self { config, state })
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let mut router = Router::new()
            .route("/health", get(health))
            .nest("/api", routes::api_routes(self.config.max_upload_bytes))
            .with_state(self.state.clone());

        if let Some(static_dir) = &self.config.static_dir {
            // single-page frontend: unknown paths fall back to index.html
            let frontend =
                ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));
            router = router.fallback_service(frontend);
        }

        router.layer(TraceLayer::new_for_http()).layer(cors)
    }

    /// Bind and serve until shutdown
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind
            .parse()
            .map_err(|e| Error::Configuration(format!("invalid bind address {}: {}", self.config.bind, e)))?;

        let router = self.build_router();

        tracing::info!("askdoc listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Configuration(format!("failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        Ok(())
    }
}

/// Liveness endpoint
async fn health() -> &'static str {
    "OK"
}
