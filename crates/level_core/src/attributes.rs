//! Attribute extraction
//!
//! Reads the optional per-object metadata the exporters care about and
//! converts collider placement into the engine convention.

use level_math::Vec3;

use crate::metadata::ObjectMetadata;
use crate::resolver::convert_vector;

/// Collider as written by the exporters
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedCollider {
    /// Shape tag, emitted verbatim
    pub shape: String,
    /// Center, Y/Z swapped
    pub center: Vec3,
    /// Full extents, Y/Z swapped
    pub size: Vec3,
}

/// Optional metadata of one object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedAttributes {
    /// Present iff the object has a `file_name`
    pub display_name: Option<String>,
    /// Present iff the object has a collider
    pub collider: Option<ExtractedCollider>,
}

/// Extract exportable attributes from validated metadata
///
/// Missing attributes are the normal case and simply come back as `None`.
pub fn extract(metadata: &ObjectMetadata) -> ExtractedAttributes {
    ExtractedAttributes {
        display_name: metadata.file_name.clone(),
        collider: metadata.collider.as_ref().map(|c| ExtractedCollider {
            shape: c.shape.clone(),
            center: convert_vector(c.center),
            size: convert_vector(c.size),
        }),
    }
}
