use axum::Json;
use serde_json::{Value, json};

use crate::models::{PlacementPayload, success};
use constants::api::{SAVE_CONFIRMATION, SERVICE_BANNER};

pub async fn read_root() -> Json<Value> {
    Json(json!({ "message": SERVICE_BANNER }))
}

pub async fn ping() -> Json<Value> {
    Json(success(json!({ "pong": true }), None))
}

/// Acknowledge a placement; the transform is echoed back, not stored.
pub async fn save_placement(Json(payload): Json<PlacementPayload>) -> Json<Value> {
    tracing::info!(
        "Placement received at ({:.3}, {:.3}, {:.3})",
        payload.position.x,
        payload.position.y,
        payload.position.z
    );

    let confirmation = json!({
        "position": payload.position,
        "rotation": payload.rotation,
    });
    Json(success(confirmation, Some(SAVE_CONFIRMATION)))
}
