//! Structured (JSON) format
//!
//! The document root is `{"name": "scene", "objects": [...]}`. Each object
//! carries `type`, `name` and `transform`; `file_name`, `collider` and
//! `children` only appear when there is something to put in them.

use serde::{Serialize, Deserialize};

use crate::resolver::AngleUnit;
use crate::walker::{SceneVisitor, SceneWalker, VisitedNode};
use crate::SceneGraph;

/// Name written at the document root
pub const DOCUMENT_NAME: &str = "scene";

/// Options for the structured export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeExportOptions {
    /// Unit for `rotation` (radians unless asked otherwise)
    #[serde(default)]
    pub rotation_unit: AngleUnit,
}

impl TreeExportOptions {
    pub fn with_rotation_unit(mut self, rotation_unit: AngleUnit) -> Self {
        self.rotation_unit = rotation_unit;
        self
    }
}

/// Root of a structured export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub name: String,
    pub objects: Vec<ObjectNode>,
}

/// One object of a structured export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub transform: TransformNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collider: Option<ColliderNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectNode>,
}

/// Converted transform triples
///
/// `transform` holds the translation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformNode {
    pub transform: [f32; 3],
    pub rotation: [f64; 3],
    pub scale: [f32; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub center: [f32; 3],
    pub size: [f32; 3],
}

impl From<&VisitedNode<'_>> for ObjectNode {
    fn from(node: &VisitedNode<'_>) -> Self {
        Self {
            kind: node.object.kind.to_string(),
            name: node.object.name.clone(),
            transform: TransformNode {
                transform: node.transform.translation.to_array(),
                rotation: node.transform.rotation,
                scale: node.transform.scale.to_array(),
            },
            file_name: node.attributes.display_name.clone(),
            collider: node.attributes.collider.as_ref().map(|c| ColliderNode {
                kind: c.shape.clone(),
                center: c.center.to_array(),
                size: c.size.to_array(),
            }),
            children: Vec::new(),
        }
    }
}

/// Visitor that assembles a [`SceneDocument`]
///
/// Pre-order visits arrive parent first, so the path from the current root
/// is kept open on a stack and closed as the walk climbs back up.
#[derive(Debug, Default)]
pub struct TreeSerializer {
    objects: Vec<ObjectNode>,
    open: Vec<ObjectNode>,
}

impl TreeSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_one(&mut self) {
        if let Some(node) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.objects.push(node),
            }
        }
    }

    /// The finished document
    pub fn finish(mut self) -> SceneDocument {
        while !self.open.is_empty() {
            self.close_one();
        }
        SceneDocument {
            name: DOCUMENT_NAME.to_string(),
            objects: self.objects,
        }
    }
}

impl SceneVisitor for TreeSerializer {
    fn visit(&mut self, node: &VisitedNode<'_>) {
        while self.open.len() > node.depth {
            self.close_one();
        }
        self.open.push(ObjectNode::from(node));
    }
}

/// Build the structured document for a graph
pub fn to_document(graph: &SceneGraph, options: &TreeExportOptions) -> SceneDocument {
    let mut serializer = TreeSerializer::new();
    SceneWalker::new(options.rotation_unit).walk(graph, &mut serializer);
    serializer.finish()
}

/// Render a document as JSON with four-space indentation
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn document_to_string(document: &SceneDocument) -> Result<String, serde_json::Error> {
    let mut buf = Vec::with_capacity(1024);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render a graph in the structured format
pub fn to_json(graph: &SceneGraph, options: &TreeExportOptions) -> Result<String, serde_json::Error> {
    document_to_string(&to_document(graph, options))
}
