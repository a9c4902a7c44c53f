//! Math kernel -- vectors, quaternions, and 4x4 matrices for the simulation
//! core.
//!
//! This crate does not reimplement linear algebra from scratch; it wraps
//! [`glam`] (already SIMD-friendly and the vocabulary the rest of the
//! workspace's dependency stack speaks) behind a narrow, spec-shaped API so
//! the numerical contracts the rest of the engine depends on -- finite
//! outputs, `normalize(0) == 0`, exact identity rotation -- are documented
//! and tested in one place rather than assumed from a general-purpose crate.
//!
//! # Quick start
//!
//! ```
//! use signal_math::{Vec3, Quat, quaternion_rotate_vector};
//!
//! let v = Vec3::new(1.0, 0.0, 0.0);
//! assert_eq!(quaternion_rotate_vector(Quat::IDENTITY, v), v);
//! ```

#![deny(unsafe_code)]

pub use glam::{Mat4, Quat, Vec3};

/// Normalize `v`, returning the zero vector if `v` is (numerically) zero
/// rather than producing `NaN`.
///
/// Contract (spec.md §4.1): `normalize(zero_vector) = zero_vector`.
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Rotate `v` by quaternion `q`.
///
/// Contract: `quaternion_rotate_vector(identity, v) == v` exactly (no
/// floating-point drift is introduced by an identity rotation).
pub fn quaternion_rotate_vector(q: Quat, v: Vec3) -> Vec3 {
    q * v
}

/// Build a quaternion representing a rotation of `angle_radians` about
/// `axis`. If `axis` is (numerically) zero, returns the identity rotation
/// rather than propagating `NaN`.
pub fn quat_from_axis_angle(axis: Vec3, angle_radians: f32) -> Quat {
    let axis = normalize(axis);
    if axis == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_axis_angle(axis, angle_radians)
    }
}

/// Convert a rotation quaternion to its equivalent 4x4 rotation matrix.
pub fn quat_to_matrix(q: Quat) -> Mat4 {
    Mat4::from_quat(q)
}

/// Recover a rotation quaternion from a rotation-only 4x4 matrix.
///
/// Round-trip contract (spec.md §8): `matrix_to_quat(quat_to_matrix(q))`
/// equals `q` (up to sign) within `1e-5` for any unit quaternion `q`.
pub fn matrix_to_quat(m: Mat4) -> Quat {
    Quat::from_mat4(&m)
}

/// Compose a local transform matrix from translation, rotation, and scale
/// (spec.md §4.3: `local_matrix = T(position) * R(rotation) * S(scale)`).
pub fn trs(position: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

/// Build a right-handed perspective projection matrix.
pub fn perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_radians, aspect_ratio, near, far)
}

/// Build a right-handed look-at view matrix.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// `true` iff every component of `v` is finite (no `NaN`/`Inf`).
pub fn is_finite_vec3(v: Vec3) -> bool {
    v.is_finite()
}

/// `true` iff every component of `q` is finite.
pub fn is_finite_quat(q: Quat) -> bool {
    q.is_finite()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prop_assert;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalize_zero_vector_is_zero_not_nan() {
        let v = normalize(Vec3::ZERO);
        assert_eq!(v, Vec3::ZERO);
        assert!(is_finite_vec3(v));
    }

    #[test]
    fn normalize_unit_length() {
        let v = normalize(Vec3::new(3.0, 4.0, 0.0));
        assert!((v.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn identity_rotation_is_exact() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(quaternion_rotate_vector(Quat::IDENTITY, v), v);
    }

    #[test]
    fn ninety_degree_y_rotation_of_x_axis() {
        // spec.md §4.1: rotating (1,0,0) by a 90-degree Y-rotation yields
        // (0,0,-1) within 0.01 tolerance.
        let q = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let rotated = quaternion_rotate_vector(q, Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 0.01);
    }

    #[test]
    fn basis_rotation_quarter_turn_about_y_quat_literal() {
        // spec.md §8 scenario F: (0, 0.707, 0, 0.707) applied to (1,0,0) ->
        // approximately (0, 0, -1).
        let q = Quat::from_xyzw(0.0, 0.707, 0.0, 0.707);
        let rotated = quaternion_rotate_vector(q, Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated.x - 0.0).abs() < 0.01);
        assert!((rotated.y - 0.0).abs() < 0.01);
        assert!((rotated.z - (-1.0)).abs() < 0.01);
    }

    #[test]
    fn basis_rotation_half_turn_about_z() {
        let q = Quat::from_xyzw(0.0, 0.0, 1.0, 0.0);
        let rotated = quaternion_rotate_vector(q, Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated - Vec3::new(-1.0, 0.0, 0.0)).length() < 0.01);
    }

    #[test]
    fn quat_matrix_round_trip() {
        let q = Quat::from_euler(glam::EulerRot::XYZ, 0.3, 1.1, -0.4).normalize();
        let m = quat_to_matrix(q);
        let back = matrix_to_quat(m);
        // Quaternions double-cover rotations; compare via dot product magnitude.
        assert!((q.dot(back).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn quat_from_zero_axis_is_identity() {
        let q = quat_from_axis_angle(Vec3::ZERO, 1.23);
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn trs_composition_translates_origin() {
        let m = trs(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::ONE);
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < EPS);
    }

    proptest::proptest! {
        #[test]
        fn normalize_never_produces_nan(x in -1e6f32..1e6, y in -1e6f32..1e6, z in -1e6f32..1e6) {
            let v = normalize(Vec3::new(x, y, z));
            prop_assert!(is_finite_vec3(v));
        }

        #[test]
        fn quat_rotate_preserves_length(x in -100f32..100.0, y in -100f32..100.0, z in -100f32..100.0, yaw in -6.3f32..6.3) {
            let v = Vec3::new(x, y, z);
            let q = Quat::from_rotation_y(yaw);
            let rotated = quaternion_rotate_vector(q, v);
            prop_assert!((rotated.length() - v.length()).abs() < 1e-2);
        }
    }
}
