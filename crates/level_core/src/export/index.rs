//! Name-indexed view of a structured export
//!
//! This is the engine side of the JSON format: a [`SceneIndex`] reads a
//! [`SceneDocument`] back and keeps one [`Placement`] per object, looked up
//! by name, with the engine's defaults applied.
//!
//! # Example
//! ```ignore
//! let index = SceneIndex::load("level.json", AngleUnit::Radians)?;
//! if let Some(crate_box) = index.get("Crate") {
//!     spawn(&crate_box.model_path, crate_box.position);
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::object::ObjectKind;
use crate::resolver::AngleUnit;

use super::tree::{ColliderNode, ObjectNode, SceneDocument, DOCUMENT_NAME};

/// Model used for objects exported without a `file_name`
pub const DEFAULT_MODEL_PATH: &str = "cube/cube.obj";

/// One object as the engine places it
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub name: String,
    pub kind: String,
    pub position: [f32; 3],
    /// Euler angles in the document's unit, camera pitch already corrected
    pub rotation: [f64; 3],
    pub scale: [f32; 3],
    /// `file_name`, or [`DEFAULT_MODEL_PATH`]
    pub model_path: String,
    pub colliders: Vec<ColliderNode>,
    /// Names of direct children in document order
    pub children: Vec<String>,
}

impl Placement {
    fn from_node(node: &ObjectNode, unit: AngleUnit) -> Self {
        let mut rotation = node.transform.rotation;
        if node.kind == ObjectKind::CAMERA {
            // cameras look down -Z at rest in the editor, forward in the engine
            rotation[0] += match unit {
                AngleUnit::Radians => std::f64::consts::FRAC_PI_2,
                AngleUnit::Degrees => 90.0,
            };
        }

        Self {
            name: node.name.clone(),
            kind: node.kind.clone(),
            position: node.transform.transform,
            rotation,
            scale: node.transform.scale,
            model_path: node
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            colliders: node.collider.iter().cloned().collect(),
            children: node.children.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

/// Error reading a structured export back
#[derive(Debug)]
pub enum IndexError {
    /// File could not be read
    Io(io::Error),
    /// Text is not a structured export
    Json(serde_json::Error),
    /// Root `name` is something other than `scene`
    NotAScene(String),
}

impl From<io::Error> for IndexError {
    fn from(e: io::Error) -> Self {
        IndexError::Io(e)
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        IndexError::Json(e)
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Io(e) => write!(f, "IO error: {}", e),
            IndexError::Json(e) => write!(f, "JSON error: {}", e),
            IndexError::NotAScene(name) => {
                write!(f, "Document is named '{}', expected '{}'", name, DOCUMENT_NAME)
            }
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::Io(e) => Some(e),
            IndexError::Json(e) => Some(e),
            IndexError::NotAScene(_) => None,
        }
    }
}

/// Placements of every object in a document, by name
#[derive(Clone, Debug, Default)]
pub struct SceneIndex {
    placements: HashMap<String, Placement>,
    /// Root names in document order
    roots: Vec<String>,
}

impl SceneIndex {
    /// Index a parsed document
    ///
    /// `unit` is the rotation unit the document was exported with. Objects
    /// at every depth are indexed; a later duplicate name replaces an
    /// earlier one.
    pub fn from_document(document: &SceneDocument, unit: AngleUnit) -> Result<Self, IndexError> {
        if document.name != DOCUMENT_NAME {
            return Err(IndexError::NotAScene(document.name.clone()));
        }

        let mut index = Self {
            placements: HashMap::new(),
            roots: document.objects.iter().map(|o| o.name.clone()).collect(),
        };

        let mut stack: Vec<&ObjectNode> = document.objects.iter().rev().collect();
        while let Some(node) = stack.pop() {
            index.placements.insert(node.name.clone(), Placement::from_node(node, unit));
            stack.extend(node.children.iter().rev());
        }
        Ok(index)
    }

    /// Parse and index JSON text
    pub fn from_json(json: &str, unit: AngleUnit) -> Result<Self, IndexError> {
        let document: SceneDocument = serde_json::from_str(json)?;
        Self::from_document(&document, unit)
    }

    /// Read and index a `.json` export
    pub fn load<P: AsRef<Path>>(path: P, unit: AngleUnit) -> Result<Self, IndexError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents, unit)
    }

    /// Placement of the named object
    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.get(name)
    }

    /// Root names in document order
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
