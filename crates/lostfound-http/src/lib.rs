//! lostfound-http - HTTP JSON API for the lost-and-found listing service.
//!
//! Endpoints:
//! - GET    /health              - Server status
//! - GET    /items               - All items, newest first
//! - POST   /items               - Create an item (multipart form, optional image)
//! - PATCH  /items/{id}/status   - Set an item's status
//! - DELETE /items/{id}          - Delete an item and its image
//! - GET    /uploads/{filename}  - Stored images
//!
//! Errors are returned as `{"error": "..."}`.

mod error;
mod handlers;
mod upload;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{delete, get, patch};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use lostfound_core::{ItemStore, MAX_IMAGE_BYTES, MediaStore};

pub use error::ApiError;
pub use handlers::UpdateStatusRequest;

use self::handlers::{
    handle_create_item, handle_delete_item, handle_health, handle_list_items, handle_not_found,
    handle_update_status,
};

/// Maximum request body size: the image ceiling plus room for the text
/// fields, so oversized images are rejected by the media check with a 400.
pub const MAX_BODY_SIZE: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub media: Arc<dyn MediaStore>,
    /// Directory served under `/uploads`.
    pub uploads_dir: PathBuf,
    /// Base URL for image links. When unset it is derived from the
    /// request's `Host` header.
    pub public_url: Option<String>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("uploads_dir", &self.uploads_dir)
            .field("public_url", &self.public_url)
            .finish_non_exhaustive()
    }
}

/// Build the application router.
///
/// CORS is permissive: any origin, with the four methods the API uses.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .route("/health", get(handle_health))
        .route("/items", get(handle_list_items).post(handle_create_item))
        .route("/items/{id}/status", patch(handle_update_status))
        .route("/items/{id}", delete(handle_delete_item))
        .nest_service("/uploads", uploads)
        .fallback(handle_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(Arc::new(state))
}

/// Serve `app` on `addr` until Ctrl+C.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "lostfound listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
