// HTTP request handlers
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use network::GraphError;
use tracing::error;

use crate::server::state::AppState;

const JSON_CONTENT_TYPE: &str = "application/json";
const DOT_CONTENT_TYPE: &str = "text/vnd.graphviz";

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "network-graph is running")
}

/// Network endpoint - the whole graph as JSON
pub async fn network_handler(State(state): State<AppState>) -> Response {
    encoded_response(state.graph.encode_json(), JSON_CONTENT_TYPE)
}

/// DOT endpoint - the whole graph in DOT format
pub async fn dot_handler(State(state): State<AppState>) -> Response {
    encoded_response(state.graph.encode_dot(), DOT_CONTENT_TYPE)
}

fn encoded_response(encoded: Result<Vec<u8>, GraphError>, content_type: &'static str) -> Response {
    match encoded {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode network state");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
