//! 3D Mathematics Library
//!
//! Vector, rotation and matrix types used by the level exporter.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion rotation with XYZ Euler conversion
//! - [`Mat4`] - Column-major 4x4 affine matrix

mod vec3;
mod quat;
pub mod mat4;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
