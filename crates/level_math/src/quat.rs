//! Unit quaternion for representing 3D rotations
//!
//! Euler angles use the XYZ convention throughout the exporter: the rotation
//! matrix is `Rz(z) * Ry(y) * Rx(x)`, so X is applied first and Z last.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};
use crate::Vec3;

/// Quaternion `w + xi + yj + zk`
///
/// Rotation quaternions are expected to be unit length; [`Quat::normalized`]
/// restores that after accumulated floating point drift.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a quaternion from an `[x, y, z, w]` array
    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self { x: a[0], y: a[1], z: a[2], w: a[3] }
    }

    /// Components as an `[x, y, z, w]` array
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `angle` radians around `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let half = angle * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Build a rotation from XYZ Euler angles in radians
    pub fn from_euler_xyz(x: f32, y: f32, z: f32) -> Self {
        let (sx, cx) = (x * 0.5).sin_cos();
        let (sy, cy) = (y * 0.5).sin_cos();
        let (sz, cz) = (z * 0.5).sin_cos();

        Self::new(
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        )
    }

    /// Decompose into XYZ Euler angles in radians
    ///
    /// At gimbal lock the Y angle is clamped to +/- pi/2.
    pub fn to_euler_xyz(self) -> Vec3 {
        let sinr_cosp = 2.0 * (self.w * self.x + self.y * self.z);
        let cosr_cosp = 1.0 - 2.0 * (self.x * self.x + self.y * self.y);
        let x = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (self.w * self.y - self.z * self.x);
        let y = if sinp.abs() >= 1.0 {
            std::f32::consts::FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        let z = siny_cosp.atan2(cosy_cosp);

        Vec3::new(x, y, z)
    }

    /// Build a quaternion from the three columns of a pure rotation matrix
    ///
    /// Columns must be orthonormal. Uses Shepperd's method, picking the
    /// largest diagonal term to keep the square root well conditioned.
    pub fn from_rotation_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        let (m00, m10, m20) = (c0.x, c0.y, c0.z);
        let (m01, m11, m21) = (c1.x, c1.y, c1.z);
        let (m02, m12, m22) = (c2.x, c2.y, c2.z);

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };

        q.normalized()
    }

    /// The three columns of the equivalent rotation matrix
    pub fn to_rotation_columns(self) -> [Vec3; 3] {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;
        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        [
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
        ]
    }

    /// Squared magnitude
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Magnitude
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit magnitude (identity if degenerate)
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 1e-10 {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse rotation of a unit quaternion
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    /// Hamilton product: `(a * b).rotate(v) == a.rotate(b.rotate(v))`
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Quat::IDENTITY.rotate(v), v));
        assert!(vec_approx_eq(Quat::IDENTITY.to_euler_xyz(), Vec3::ZERO));
    }

    #[test]
    fn test_axis_angle_z_90() {
        let q = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let result = q.rotate(Vec3::X);
        assert!(vec_approx_eq(result, Vec3::Y), "X should become Y, got {:?}", result);
    }

    #[test]
    fn test_euler_round_trip() {
        let (x, y, z) = (10f32.to_radians(), 20f32.to_radians(), 30f32.to_radians());
        let euler = Quat::from_euler_xyz(x, y, z).to_euler_xyz();
        assert!(vec_approx_eq(euler, Vec3::new(x, y, z)), "got {:?}", euler);
    }

    #[test]
    fn test_euler_order_is_x_then_y_then_z() {
        let (x, y, z) = (0.3, -0.4, 1.1);
        let qx = Quat::from_axis_angle(Vec3::X, x);
        let qy = Quat::from_axis_angle(Vec3::Y, y);
        let qz = Quat::from_axis_angle(Vec3::Z, z);
        let composed = qz * qy * qx;
        let direct = Quat::from_euler_xyz(x, y, z);

        let v = Vec3::new(0.2, -1.0, 0.7);
        assert!(vec_approx_eq(composed.rotate(v), direct.rotate(v)));
    }

    #[test]
    fn test_gimbal_lock_clamps_y() {
        let q = Quat::from_euler_xyz(0.0, FRAC_PI_2, 0.0);
        let euler = q.to_euler_xyz();
        // asin is steep near 1.0, so f32 rounding costs a few 1e-4 here
        assert!((euler.y - FRAC_PI_2).abs() < 1e-3, "got {:?}", euler);
        assert!(euler.x.is_finite() && euler.z.is_finite());
    }

    #[test]
    fn test_rotation_columns_round_trip() {
        let q = Quat::from_euler_xyz(0.5, -1.2, 2.8);
        let [c0, c1, c2] = q.to_rotation_columns();
        let back = Quat::from_rotation_columns(c0, c1, c2);

        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(q.rotate(v), back.rotate(v)));
    }

    #[test]
    fn test_rotation_columns_half_turn() {
        // trace <= 0 path
        let q = Quat::from_axis_angle(Vec3::Y, PI);
        let [c0, c1, c2] = q.to_rotation_columns();
        let back = Quat::from_rotation_columns(c0, c1, c2);
        assert!(vec_approx_eq(back.rotate(Vec3::X), -Vec3::X));
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quat::from_euler_xyz(0.1, 0.2, 0.3);
        let v = Vec3::new(4.0, -2.0, 1.0);
        assert!(vec_approx_eq(q.conjugate().rotate(q.rotate(v)), v));
    }

    #[test]
    fn test_normalized() {
        let q = Quat::new(0.0, 0.0, 0.0, 2.0).normalized();
        assert!(approx_eq(q.length(), 1.0));
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalized(), Quat::IDENTITY);
    }
}
