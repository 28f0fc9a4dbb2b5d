//! Line-oriented text format
//!
//! ```text
//! SCENE
//! MESH
//! T 0.000000 0.000000 0.000000
//! R -0.000000 -0.000000 -0.000000
//! S 1.000000 1.000000 1.000000
//! N crate
//! C BOX
//! CC 0.000000 0.000000 0.000000
//! CS 2.000000 2.000000 2.000000
//! END
//!
//! ```
//!
//! Every line of a node's block is indented by one tab per depth level. The
//! blank separator after `END` is never indented. Rotations are in degrees.

use std::fmt::{self, Write};

use level_math::Vec3;

use crate::resolver::AngleUnit;
use crate::walker::{SceneVisitor, SceneWalker, VisitedNode};
use crate::SceneGraph;

/// First line of every text export
pub const HEADER: &str = "SCENE";
/// Last line of every node block
pub const END: &str = "END";

/// Visitor that writes the text format
#[derive(Debug, Clone)]
pub struct TextSerializer {
    out: String,
}

impl Default for TextSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSerializer {
    /// Start a document (header already written)
    pub fn new() -> Self {
        let mut out = String::with_capacity(256);
        out.push_str(HEADER);
        out.push('\n');
        Self { out }
    }

    /// The finished document
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, depth: usize, args: fmt::Arguments<'_>) {
        for _ in 0..depth {
            self.out.push('\t');
        }
        // writing into a String cannot fail
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    fn triple(&mut self, depth: usize, tag: &str, v: Vec3) {
        self.line(depth, format_args!("{} {:.6} {:.6} {:.6}", tag, v.x, v.y, v.z));
    }

    fn angles(&mut self, depth: usize, tag: &str, [x, y, z]: [f64; 3]) {
        self.line(depth, format_args!("{} {:.6} {:.6} {:.6}", tag, x, y, z));
    }
}

impl SceneVisitor for TextSerializer {
    fn visit(&mut self, node: &VisitedNode<'_>) {
        let depth = node.depth;
        self.line(depth, format_args!("{}", node.object.kind));
        self.triple(depth, "T", node.transform.translation);
        self.angles(depth, "R", node.transform.rotation);
        self.triple(depth, "S", node.transform.scale);

        if let Some(ref name) = node.attributes.display_name {
            self.line(depth, format_args!("N {}", name));
        }
        if let Some(ref collider) = node.attributes.collider {
            self.line(depth, format_args!("C {}", collider.shape));
            self.triple(depth, "CC", collider.center);
            self.triple(depth, "CS", collider.size);
        }

        self.line(depth, format_args!("{}", END));
        self.out.push('\n');
    }
}

/// Render a graph in the text format
pub fn to_text(graph: &SceneGraph) -> String {
    let mut serializer = TextSerializer::new();
    SceneWalker::new(AngleUnit::Degrees).walk(graph, &mut serializer);
    serializer.finish()
}
