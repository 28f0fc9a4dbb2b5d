//! Scene model and export for the level exporter
//!
//! This crate holds everything between the host editor's scene snapshot and
//! the files handed to the game engine:
//!
//! - [`Transform`] - Translation, rotation, and scale relative to a parent
//! - [`SceneObject`] - A node with a type tag, transform and metadata
//! - [`ObjectMetadata`] - Validated optional file name and box collider
//! - [`SceneGraph`] - Forest of objects in native scene order
//! - [`SceneSnapshot`] - Loadable/saveable flat snapshot from the editor
//! - [`SnapshotValidator`] - Static checks on a snapshot
//! - [`SceneWalker`] - Pre-order traversal feeding a [`SceneVisitor`]
//! - [`export`] - Text and structured encodings, export to file
//! - [`SceneIndex`] - Engine-side lookup of a structured export by name

mod transform;
mod object;
mod scene_graph;
pub mod metadata;
pub mod snapshot;
mod snapshot_validator;
pub mod resolver;
pub mod attributes;
pub mod walker;
pub mod export;

pub use transform::Transform;
pub use object::{DirtyFlags, ObjectKey, ObjectKind, SceneObject};
pub use scene_graph::SceneGraph;
pub use metadata::{AttributeError, AttributeValue, Attributes, ColliderDescriptor, ObjectMetadata};
pub use snapshot::{AttributeIssue, ObjectRecord, SceneSnapshot, SnapshotError, TransformRecord};
pub use snapshot_validator::{SnapshotValidator, ValidationError};
pub use resolver::{AngleUnit, ResolvedTransform};
pub use attributes::{ExtractedAttributes, ExtractedCollider};
pub use walker::{SceneVisitor, SceneWalker, VisitedNode};
pub use export::{
    export_to_path, ExportError, ExportFormat, IndexError, SceneDocument, SceneIndex, TreeExportOptions,
};

// Re-export commonly used types from level_math for convenience
pub use level_math::{Mat4, Quat, Vec3};
