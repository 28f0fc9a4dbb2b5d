//! Scene tree traversal
//!
//! The [`SceneWalker`] visits every object of a [`SceneGraph`] depth-first,
//! pre-order: roots in native scene order, each followed by its children in
//! their native order. At every node it resolves the transform and extracts
//! the attributes, then hands the result to a [`SceneVisitor`]. The walker
//! does no output of its own; the serializers are visitors.

use crate::attributes::{extract, ExtractedAttributes};
use crate::object::{ObjectKey, SceneObject};
use crate::resolver::{resolve, AngleUnit, ResolvedTransform};
use crate::SceneGraph;

/// Everything known about one visited node
#[derive(Debug)]
pub struct VisitedNode<'a> {
    pub key: ObjectKey,
    pub object: &'a SceneObject,
    pub transform: ResolvedTransform,
    pub attributes: ExtractedAttributes,
    /// Number of ancestors (roots are 0)
    pub depth: usize,
}

/// Receives nodes from a [`SceneWalker`]
pub trait SceneVisitor {
    /// Called once per node, parents before children
    fn visit(&mut self, node: &VisitedNode<'_>);
}

impl<F> SceneVisitor for F
where
    F: FnMut(&VisitedNode<'_>),
{
    fn visit(&mut self, node: &VisitedNode<'_>) {
        self(node)
    }
}

/// Pre-order scene walker
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneWalker {
    rotation_unit: AngleUnit,
}

impl SceneWalker {
    /// Create a walker that resolves rotations in `rotation_unit`
    pub fn new(rotation_unit: AngleUnit) -> Self {
        Self { rotation_unit }
    }

    /// Walk the whole graph, returning the number of nodes visited
    pub fn walk<V: SceneVisitor + ?Sized>(&self, graph: &SceneGraph, visitor: &mut V) -> usize {
        let mut visited = 0;
        for root in graph.roots() {
            visited += self.walk_from(graph, root, 0, visitor);
        }
        log::debug!("Walked {} of {} objects", visited, graph.len());
        visited
    }

    /// Walk the whole graph with a closure as the visitor
    pub fn for_each<F>(&self, graph: &SceneGraph, mut f: F) -> usize
    where
        F: FnMut(&VisitedNode<'_>),
    {
        self.walk(graph, &mut f)
    }

    /// Walk one subtree, starting at `depth`
    pub fn walk_from<V: SceneVisitor + ?Sized>(
        &self,
        graph: &SceneGraph,
        key: ObjectKey,
        depth: usize,
        visitor: &mut V,
    ) -> usize {
        let Some(object) = graph.get(key) else { return 0 };

        let node = VisitedNode {
            key,
            object,
            transform: resolve(&object.local_transform, self.rotation_unit),
            attributes: extract(&object.metadata),
            depth,
        };
        visitor.visit(&node);

        let mut visited = 1;
        for &child in object.children() {
            visited += self.walk_from(graph, child, depth + 1, visitor);
        }
        visited
    }
}
