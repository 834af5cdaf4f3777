use axum::Json;
use serde_json::{json, Value};

/// Keep-alive poll from the page chrome. Carries no session state server
/// side; exists so the client has something cheap to hit.
pub async fn keepalive() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
