//! Transform resolution
//!
//! Turns an object's local transform into the triples written by the
//! exporters, converted from the authoring convention (Z up) to the engine
//! convention (Y up).

use level_math::{mat4, Mat4, Vec3};
use serde::{Serialize, Deserialize};

use crate::Transform;

/// Unit used for exported Euler angles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    Degrees,
    #[default]
    Radians,
}

/// Translation, rotation and scale ready to be written out
///
/// All three are already in the engine convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedTransform {
    pub translation: Vec3,
    /// XYZ Euler angles in the unit the resolver was asked for
    ///
    /// Widened to `f64` before any unit conversion so degrees keep the
    /// precision of the radians they came from.
    pub rotation: [f64; 3],
    pub scale: Vec3,
}

/// Map a position or scale triple between conventions: `(x, y, z) -> (x, z, y)`
#[inline]
pub fn convert_vector(v: Vec3) -> Vec3 {
    v.swap_yz()
}

/// Map an Euler triple between conventions: `(rx, ry, rz) -> (-rx, -rz, -ry)`
#[inline]
pub fn convert_rotation([rx, ry, rz]: [f64; 3]) -> [f64; 3] {
    [-rx, -rz, -ry]
}

/// Widen XYZ Euler radians and express them in `unit`
pub fn euler_in_unit(euler: Vec3, unit: AngleUnit) -> [f64; 3] {
    let radians = [f64::from(euler.x), f64::from(euler.y), f64::from(euler.z)];
    match unit {
        AngleUnit::Radians => radians,
        AngleUnit::Degrees => radians.map(f64::to_degrees),
    }
}

/// Resolve a local matrix
///
/// The matrix is decomposed, the rotation turned into XYZ Euler angles, and
/// everything converted to the engine convention.
pub fn resolve_matrix(local: Mat4, unit: AngleUnit) -> ResolvedTransform {
    let (translation, rotation, scale) = mat4::decompose(local);

    let euler = euler_in_unit(rotation.to_euler_xyz(), unit);

    ResolvedTransform {
        translation: convert_vector(translation),
        rotation: convert_rotation(euler),
        scale: convert_vector(scale),
    }
}

/// Resolve a local transform
pub fn resolve(local: &Transform, unit: AngleUnit) -> ResolvedTransform {
    resolve_matrix(local.to_matrix(), unit)
}
