use axum::Json;
use serde_json::{json, Value};

pub mod auth;
pub mod comments;
pub mod instructions;
pub mod inventory;
pub mod manufacturers;
pub mod marketplace;
pub mod pieces;
pub mod sets;
pub mod user_sets;

/// GET /health - liveness probe, no database round trip
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "brickvault-api" }))
}
