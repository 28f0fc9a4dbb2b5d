//! 4x4 affine matrix utilities
//!
//! Matrices are column-major (`m[column][row]`), the same layout the host
//! editor uses for its object matrices. Only affine transforms built from
//! translation, rotation and scale are expected.

use crate::{Quat, Vec3};

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Build `T * R * S`: scale first, then rotate, then translate.
pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Mat4 {
    let [c0, c1, c2] = rotation.to_rotation_columns();
    let c0 = c0 * scale.x;
    let c1 = c1 * scale.y;
    let c2 = c2 * scale.z;

    [
        [c0.x, c0.y, c0.z, 0.0],
        [c1.x, c1.y, c1.z, 0.0],
        [c2.x, c2.y, c2.z, 0.0],
        [translation.x, translation.y, translation.z, 1.0],
    ]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a point (w = 1) by an affine matrix
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Get the xyz part of a column
#[inline]
pub fn column3(m: Mat4, col: usize) -> Vec3 {
    Vec3::new(m[col][0], m[col][1], m[col][2])
}

/// Determinant of the upper-left 3x3 block
pub fn determinant3(m: Mat4) -> f32 {
    column3(m, 0).dot(column3(m, 1).cross(column3(m, 2)))
}

/// Split an affine matrix into `(translation, rotation, scale)`
///
/// Scale is the length of each basis column. A mirrored basis (negative
/// determinant) negates all three scale components, which leaves a proper
/// rotation once each column is divided by its signed scale. Zero-length
/// columns yield zero scale on that axis and the rotation falls back to the
/// identity for that column.
pub fn decompose(m: Mat4) -> (Vec3, Quat, Vec3) {
    let translation = column3(m, 3);

    let c0 = column3(m, 0);
    let c1 = column3(m, 1);
    let c2 = column3(m, 2);

    let mut scale = Vec3::new(c0.length(), c1.length(), c2.length());
    if determinant3(m) < 0.0 {
        scale = -scale;
    }

    let axis = |c: Vec3, len: f32, fallback: Vec3| {
        if len.abs() > 1e-10 {
            c / len
        } else {
            fallback
        }
    };
    let r0 = axis(c0, scale.x, Vec3::X);
    let r1 = axis(c1, scale.y, Vec3::Y);
    let r2 = axis(c2, scale.z, Vec3::Z);

    let rotation = Quat::from_rotation_columns(r0, r1, r2);
    (translation, rotation, scale)
}
