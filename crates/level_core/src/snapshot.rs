//! Scene snapshot serialization
//!
//! A snapshot is the flat, serializable hand-off from the host editor: one
//! record per object in the editor's native order, with parents referenced
//! by name and metadata kept as raw custom properties. Snapshots are stored
//! as RON and turned into a [`SceneGraph`] for export.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use level_math::{Quat, Vec3};
use serde::{Serialize, Deserialize};

use crate::metadata::{AttributeError, Attributes, ObjectMetadata};
use crate::object::{ObjectKey, ObjectKind, SceneObject};
use crate::{SceneGraph, Transform};

/// Local transform as stored in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Translation [x, y, z]
    pub translation: [f32; 3],
    /// Rotation quaternion [x, y, z, w]
    pub rotation: [f32; 4],
    /// Scale [x, y, z]
    pub scale: [f32; 3],
}

impl Default for TransformRecord {
    fn default() -> Self {
        Transform::identity().into()
    }
}

impl TransformRecord {
    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.translation
            .iter()
            .chain(&self.rotation)
            .chain(&self.scale)
            .all(|v| v.is_finite())
    }
}

impl From<Transform> for TransformRecord {
    fn from(t: Transform) -> Self {
        Self {
            translation: t.translation.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

impl From<TransformRecord> for Transform {
    fn from(r: TransformRecord) -> Self {
        Transform::from_parts(
            Vec3::from_array(r.translation),
            Quat::from_array(r.rotation),
            Vec3::from_array(r.scale),
        )
    }
}

/// One object as the host editor reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Unique object name
    pub name: String,
    /// Type tag (MESH, EMPTY, ...)
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Parent object name, `None` for roots
    #[serde(default)]
    pub parent: Option<String>,
    /// Local transform
    #[serde(default)]
    pub transform: TransformRecord,
    /// Raw custom properties
    #[serde(default)]
    pub attributes: Attributes,
}

impl ObjectRecord {
    /// Create a root record with an identity transform
    pub fn new(name: impl Into<String>, kind: impl Into<ObjectKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            parent: None,
            transform: TransformRecord::default(),
            attributes: Attributes::new(),
        }
    }

    /// Set the parent name
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform.into();
        self
    }

    /// Set the custom properties
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A serializable scene snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Object records in native scene order
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

/// Custom property problem tied to the object it was found on
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeIssue {
    /// Object name
    pub object: String,
    /// What was wrong
    pub error: AttributeError,
}

impl fmt::Display for AttributeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object '{}': {}", self.object, self.error)
    }
}

impl SceneSnapshot {
    /// Create a new empty snapshot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    /// Append an object record
    pub fn add_object(&mut self, record: ObjectRecord) {
        self.objects.push(record);
    }

    /// Load a snapshot from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a snapshot from RON text
    pub fn from_ron(contents: &str) -> Result<Self, SnapshotError> {
        Ok(ron::from_str(contents)?)
    }

    /// Save the snapshot to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Render the snapshot as pretty RON text
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Capture a graph as a snapshot
    ///
    /// Records are written depth-first so that sibling order, and the order of
    /// roots, survive a round trip through [`SceneSnapshot::into_graph`].
    pub fn from_graph(name: impl Into<String>, graph: &SceneGraph) -> Self {
        let mut snapshot = Self::new(name);
        let mut stack: Vec<ObjectKey> = graph.roots().collect();
        stack.reverse();

        while let Some(key) = stack.pop() {
            let Some(object) = graph.get(key) else { continue };
            let parent = object
                .parent()
                .and_then(|p| graph.get(p))
                .map(|p| p.name.clone());

            snapshot.add_object(ObjectRecord {
                name: object.name.clone(),
                kind: object.kind.clone(),
                parent,
                transform: object.local_transform.into(),
                attributes: object.metadata.to_attributes(),
            });
            stack.extend(object.children().iter().rev().copied());
        }
        snapshot
    }

    /// Build a scene graph from the records
    ///
    /// Duplicate names, unknown parents, parent cycles and non-finite
    /// transforms are structural errors and abort the build. Custom property problems only drop the
    /// affected metadata; they are logged and returned alongside the graph.
    pub fn into_graph(&self) -> Result<(SceneGraph, Vec<AttributeIssue>), SnapshotError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.objects.len());
        for (i, record) in self.objects.iter().enumerate() {
            if index.insert(record.name.as_str(), i).is_some() {
                return Err(SnapshotError::DuplicateName(record.name.clone()));
            }
            if !record.transform.is_finite() {
                return Err(SnapshotError::NonFiniteTransform(record.name.clone()));
            }
        }

        let mut parents: Vec<Option<usize>> = Vec::with_capacity(self.objects.len());
        for record in &self.objects {
            let parent = match record.parent {
                None => None,
                Some(ref parent) => match index.get(parent.as_str()) {
                    Some(&p) => Some(p),
                    None => {
                        return Err(SnapshotError::UnknownParent {
                            object: record.name.clone(),
                            parent: parent.clone(),
                        })
                    }
                },
            };
            parents.push(parent);
        }

        if let Some(i) = find_parent_cycle(&parents) {
            return Err(SnapshotError::ParentCycle(self.objects[i].name.clone()));
        }

        let mut graph = SceneGraph::with_capacity(self.objects.len());
        let mut issues = Vec::new();
        let mut keys = Vec::with_capacity(self.objects.len());

        for record in &self.objects {
            let (metadata, errors) = ObjectMetadata::from_attributes(&record.attributes);
            for error in errors {
                log::warn!("Object '{}': {}", record.name, error);
                issues.push(AttributeIssue { object: record.name.clone(), error });
            }

            let object = SceneObject::new(record.name.clone(), record.kind.clone())
                .with_transform(record.transform.into())
                .with_metadata(metadata);
            keys.push(graph.add_object(object));
        }

        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                graph.set_parent(keys[i], Some(keys[p]));
            }
        }

        log::debug!("Built scene graph '{}' with {} objects", self.name, graph.len());
        Ok((graph, issues))
    }
}

/// Index of some record that lies on a parent cycle, if any
pub(crate) fn find_parent_cycle(parents: &[Option<usize>]) -> Option<usize> {
    for start in 0..parents.len() {
        let mut current = parents[start];
        let mut steps = 0;
        while let Some(p) = current {
            if p == start {
                return Some(start);
            }
            steps += 1;
            if steps > parents.len() {
                // cycle further up the chain; it is reported from its own member
                break;
            }
            current = parents[p];
        }
    }
    None
}

/// Error loading, saving or building a snapshot
#[derive(Debug)]
pub enum SnapshotError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// Two records share a name
    DuplicateName(String),
    /// A record names a parent that does not exist
    UnknownParent { object: String, parent: String },
    /// Parent links loop back on themselves
    ParentCycle(String),
    /// A transform component is NaN or infinite
    NonFiniteTransform(String),
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SnapshotError {
    fn from(e: ron::error::SpannedError) -> Self {
        SnapshotError::Parse(e)
    }
}

impl From<ron::Error> for SnapshotError {
    fn from(e: ron::Error) -> Self {
        SnapshotError::Serialize(e)
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "IO error: {}", e),
            SnapshotError::Parse(e) => write!(f, "Parse error: {}", e),
            SnapshotError::Serialize(e) => write!(f, "Serialize error: {}", e),
            SnapshotError::DuplicateName(name) => write!(f, "Duplicate object name: '{}'", name),
            SnapshotError::UnknownParent { object, parent } => {
                write!(f, "Object '{}' has unknown parent '{}'", object, parent)
            }
            SnapshotError::ParentCycle(name) => {
                write!(f, "Object '{}' is its own ancestor", name)
            }
            SnapshotError::NonFiniteTransform(name) => {
                write!(f, "Object '{}' has a non-finite transform", name)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            SnapshotError::Parse(e) => Some(e),
            SnapshotError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}
