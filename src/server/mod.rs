//! HTTP front end
//!
//! Serves `POST /api/slice` and the compiled editor assets. Unknown paths
//! fall back to the entry page so client-side routes resolve.

mod handlers;
mod state;

pub use handlers::{slice_image, COORDS_FIELD, IMAGE_FIELD};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use log::info;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{ServerConfig, SlicerConfig};
use crate::errors::SliceResult;

/// Build the application router
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    let assets = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.index_path()));

    Router::new()
        .route("/api/slice", post(slice_image))
        .fallback_service(assets)
        .with_state(state)
        // axum's own 2 MB default would answer before the configured limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
}

/// Bind the configured address and serve until the process ends
pub async fn run(config: SlicerConfig) -> SliceResult<()> {
    let state = AppState::from_config(&config);
    let app = build_router(&config.server, state);

    let addr = config.server.bind_address();
    info!(
        "listening on http://{} (static_dir={}, max_upload_bytes={}, format={:?}, rayon_threads={})",
        addr,
        config.server.static_dir.display(),
        config.server.max_upload_bytes,
        config.slicing.output_format,
        rayon::current_num_threads()
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
