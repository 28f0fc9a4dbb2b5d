//! Scene objects
//!
//! A SceneObject is one node of the scene forest: a type tag, a local
//! transform, optional metadata, and links to its parent and children.

use std::fmt;

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

use crate::metadata::ObjectMetadata;
use crate::Transform;

new_key_type! {
    /// Key to an object in the scene graph
    ///
    /// Uses generational indexing: a key to a removed object returns None
    /// instead of aliasing whatever object reuses its slot.
    pub struct ObjectKey;
}

bitflags! {
    /// Flags indicating which parts of an object have changed
    ///
    /// Consumers that cache derived data (e.g. collider geometry) use these
    /// to rebuild only what changed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Local transform, or an ancestor's, has changed
        const TRANSFORM = 1 << 0;
        /// Metadata (file name / collider) has changed
        const METADATA = 1 << 1;
        /// Parent link has changed
        const HIERARCHY = 1 << 2;
        /// All flags set - object needs full rebuild
        const ALL = Self::TRANSFORM.bits() | Self::METADATA.bits() | Self::HIERARCHY.bits();
    }
}

/// Object type tag as reported by the host editor
///
/// The set is open: unknown tags are carried through verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKind(pub String);

impl ObjectKind {
    pub const MESH: &'static str = "MESH";
    pub const EMPTY: &'static str = "EMPTY";
    pub const LIGHT: &'static str = "LIGHT";
    pub const CAMERA: &'static str = "CAMERA";

    /// Create a kind from any tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Mesh object
    pub fn mesh() -> Self {
        Self::new(Self::MESH)
    }

    /// Empty (transform-only) object
    pub fn empty() -> Self {
        Self::new(Self::EMPTY)
    }

    /// The tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKind {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A node in the scene forest
///
/// Parent and children links are maintained by [`crate::SceneGraph`]; an
/// object built on its own starts detached.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Name, unique within the scene
    pub name: String,
    /// Type tag
    pub kind: ObjectKind,
    /// Transform relative to the parent (or the world for roots)
    pub local_transform: Transform,
    /// Validated optional metadata
    pub metadata: ObjectMetadata,
    pub(crate) parent: Option<ObjectKey>,
    pub(crate) children: Vec<ObjectKey>,
    dirty: DirtyFlags,
}

impl SceneObject {
    /// Create a detached object with an identity transform and no metadata
    pub fn new(name: impl Into<String>, kind: impl Into<ObjectKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            local_transform: Transform::identity(),
            metadata: ObjectMetadata::default(),
            parent: None,
            children: Vec::new(),
            dirty: DirtyFlags::ALL,
        }
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local_transform = transform;
        self
    }

    /// Set the metadata
    pub fn with_metadata(mut self, metadata: ObjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Parent key, `None` for roots
    #[inline]
    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    /// Child keys in native scene order
    #[inline]
    pub fn children(&self) -> &[ObjectKey] {
        &self.children
    }

    /// True when the object has no parent
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Current dirty flags
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// True when any of `flags` is set
    #[inline]
    pub fn is_dirty(&self, flags: DirtyFlags) -> bool {
        self.dirty.intersects(flags)
    }

    pub(crate) fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}
