use bevy_math::{EulerRot, Mat4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3Payload {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3Payload {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Body of `POST /api/save`: translation plus XYZ Euler rotation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub position: Vector3Payload,
    pub rotation: Vector3Payload,
}

impl PlacementRecord {
    /// Decompose `transform`; scale is discarded.
    pub fn from_matrix(transform: &Mat4) -> Self {
        let (_scale, rotation, translation) = transform.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);

        Self {
            position: Vector3Payload::new(translation.x, translation.y, translation.z),
            rotation: Vector3Payload::new(x, y, z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::{Quat, Vec3};

    const EPSILON: f32 = 1e-5;

    fn assert_close(actual: Vector3Payload, expected: [f32; 3]) {
        let got = [actual.x, actual.y, actual.z];
        for (a, e) in got.iter().zip(expected) {
            assert!((a - e).abs() <= EPSILON, "{:?} != {:?}", got, expected);
        }
    }

    #[test]
    fn identity_decomposes_to_zero() {
        let record = PlacementRecord::from_matrix(&Mat4::IDENTITY);

        assert_close(record.position, [0.0, 0.0, 0.0]);
        assert_close(record.rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn decomposes_translation_and_yaw() {
        let transform = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.5),
            Vec3::new(0.25, -1.4, -2.0),
        );
        let record = PlacementRecord::from_matrix(&transform);

        assert_close(record.position, [0.25, -1.4, -2.0]);
        assert_close(record.rotation, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn scale_does_not_leak_into_rotation() {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_x(-0.25),
            Vec3::ZERO,
        );
        let record = PlacementRecord::from_matrix(&transform);

        assert_close(record.rotation, [-0.25, 0.0, 0.0]);
    }

    #[test]
    fn serializes_to_save_body_shape() {
        let record = PlacementRecord {
            position: Vector3Payload::new(1.0, 2.0, 3.0),
            rotation: Vector3Payload::new(0.0, 0.5, 0.0),
        };

        let value = serde_json::to_value(record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "position": {"x": 1.0, "y": 2.0, "z": 3.0},
                "rotation": {"x": 0.0, "y": 0.5, "z": 0.0}
            })
        );
    }
}
