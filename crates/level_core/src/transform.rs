//! Local transform (translation, rotation, scale)
//!
//! A Transform places an object relative to its parent, or relative to the
//! world when the object is a root.

use level_math::{mat4, Mat4, Quat, Vec3};
use serde::{Serialize, Deserialize};

/// A 3D transform with translation, rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation relative to the parent
    pub translation: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Scale along each local axis
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Create a transform from all three parts
    pub fn from_parts(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation from XYZ Euler angles in degrees
    pub fn with_euler_degrees(self, x: f32, y: f32, z: f32) -> Self {
        self.with_rotation(Quat::from_euler_xyz(x.to_radians(), y.to_radians(), z.to_radians()))
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The local matrix `T * R * S`
    pub fn to_matrix(&self) -> Mat4 {
        mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Transform a point from local space into the parent's space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p.component_mul(self.scale)) + self.translation
    }
}
