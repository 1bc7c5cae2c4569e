// Handlers: metrics, health, process inspection, reconfiguration, version

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::AppState;
use crate::inspector;
use crate::runtime::ConfigUpdate;
use crate::version::{NAME, VERSION};

/// GET /metrics: latest snapshot, or `{"status":"empty"}` before the first pass.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    // Arc clone under the lock; serialization happens after it is released.
    Json(state.publisher.read())
}

/// GET /health: constant-cost liveness probe.
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

/// GET /process/{pid}: on-demand inspection; failures are `{pid, error}` with status 200.
pub(super) async fn process_handler(Path(pid): Path<u32>) -> impl IntoResponse {
    Json(inspector::inspect(pid).await)
}

/// POST /config: applies `poll_interval` and/or `push_url`. An unparsable body counts as `{}`.
pub(super) async fn config_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(state.runtime.apply(ConfigUpdate::from_json(&body)))
}

/// GET /version: service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
