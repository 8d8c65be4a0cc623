// App state for Axum server
use std::sync::Arc;

use network::Graph;

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn Graph>,
}
