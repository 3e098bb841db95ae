use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Body of `POST /api/save`. Rotation is XYZ Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPayload {
    pub position: Vector3,
    pub rotation: Vector3,
}

/// `{"success": true, "data": ..., "message"?: ...}` envelope.
pub fn success(data: Value, message: Option<&str>) -> Value {
    let mut response = json!({ "success": true, "data": data });
    if let Some(message) = message {
        response["message"] = Value::from(message);
    }
    response
}
