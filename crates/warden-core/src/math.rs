use crate::UP;
use cgmath::{Deg, InnerSpace, Quaternion, Rotation3, Vector3};

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Uses `atan2(|a x b|, a . b)`, which stays accurate near 0 and 180 degrees where `acos`
/// loses precision. Returns `0.0` when either vector is zero.
pub fn angle_between_deg(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    if a.magnitude2() <= f32::EPSILON || b.magnitude2() <= f32::EPSILON {
        return 0.0;
    }

    let cross = a.cross(b).magnitude();
    let dot = a.dot(b);
    cross.atan2(dot).to_degrees()
}

/// Rotates `v` around the world up axis.
pub fn rotate_about_up(v: Vector3<f32>, angle: Deg<f32>) -> Vector3<f32> {
    Quaternion::from_axis_angle(UP, angle) * v
}

/// Drops the vertical component of `v`.
pub fn planar(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, 0.0, v.z)
}

/// Bitwise equality of two vectors, distinguishing `0.0` from `-0.0`.
pub fn bits_eq(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits() && a.z.to_bits() == b.z.to_bits()
}
