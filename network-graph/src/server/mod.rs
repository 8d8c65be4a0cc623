// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use network::Graph;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use self::state::AppState;
use crate::errors::AppError;

/// Create the Axum application router with all routes and middleware
pub fn create_app(graph: Arc<dyn Graph>) -> Router {
    let state = AppState { graph };

    Router::new()
        .route("/network", get(handlers::network_handler))
        .route("/network/dot", get(handlers::dot_handler))
        .route("/health", get(handlers::health_check))
        .layer(create_cors_layer())
        .with_state(state)
}

/// Read-only endpoints, open to any origin so browser visualizers can fetch them
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
}

/// Serve `app` on `listener` until `shutdown` fires
pub async fn run_server(
    listener: TcpListener,
    app: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), AppError> {
    let addr = listener.local_addr()?;
    info!("Server listening on {}", addr);
    info!("- Network endpoint: http://{}/network", addr);
    info!("- DOT endpoint: http://{}/network/dot", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            info!("Server received shutdown signal");
        })
        .await?;
    Ok(())
}
