use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus which backends are active.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let generation = if state.writer.is_remote() {
        "remote"
    } else {
        "template"
    };
    let storage = if state.config.database_url.is_some() {
        "postgres"
    } else {
        "memory"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "generation": generation,
        "storage": storage
    }))
}
