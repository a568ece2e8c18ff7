use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Liveness message.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Resume Parser API"
    }))
}
