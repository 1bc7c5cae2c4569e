// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::publisher::Publisher;
use crate::runtime::RuntimeConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) publisher: Arc<Publisher>,
    pub(crate) runtime: Arc<RuntimeConfig>,
}

pub fn app(publisher: Arc<Publisher>, runtime: Arc<RuntimeConfig>) -> Router {
    let state = AppState { publisher, runtime };
    Router::new()
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/health", get(http::health_handler)) // GET /health
        .route("/process/{pid}", get(http::process_handler)) // GET /process/{pid}
        .route("/config", post(http::config_handler)) // POST /config
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state)
}
