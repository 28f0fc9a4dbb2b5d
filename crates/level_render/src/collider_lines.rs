//! Box collider wireframes
//!
//! Each collider contributes 8 corners and 12 edges. Corners are the unit
//! box template scaled by the collider size, moved to the collider center,
//! then carried into world space by the object's full world matrix.

use bytemuck::{Pod, Zeroable};
use level_core::{ColliderDescriptor, ObjectKey, SceneGraph};
use level_math::{mat4, Mat4, Vec3};

/// Uniform debug color for collider lines (RGBA)
pub const COLLIDER_COLOR: [f32; 4] = [0.5, 1.0, 1.0, 1.0];

/// Unit box corners, x fastest then y then z
pub const BOX_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
];

/// Edges of the unit box: the z = -0.5 face, the z = +0.5 face, then the
/// four edges joining them
pub const BOX_EDGES: [[u32; 2]; 12] = [
    [0, 1], [2, 3], [0, 2], [1, 3],
    [4, 5], [6, 7], [4, 6], [5, 7],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// A line vertex (position only; the color is uniform)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl From<Vec3> for LineVertex {
    fn from(v: Vec3) -> Self {
        Self { position: v.to_array() }
    }
}

/// World-space corners of one box collider
pub fn box_corners(collider: &ColliderDescriptor, world: Mat4) -> [Vec3; 8] {
    BOX_CORNERS.map(|offset| {
        let local = collider.center + Vec3::from_array(offset).component_mul(collider.size);
        mat4::transform_point(world, local)
    })
}

/// Corners for an object in the graph, if it has a usable collider
///
/// Objects without a collider yield `None` silently. Colliders whose
/// corners come out non-finite (for example under a NaN transform) are
/// skipped with a warning.
pub fn object_corners(graph: &SceneGraph, key: ObjectKey) -> Option<[Vec3; 8]> {
    let object = graph.get(key)?;
    let collider = object.metadata.collider.as_ref()?;
    let world = graph.world_matrix(key)?;

    let corners = box_corners(collider, world);
    if corners.iter().all(|c| c.is_finite()) {
        Some(corners)
    } else {
        log::warn!("Skipping collider on '{}': non-finite world position", object.name);
        None
    }
}

/// Line-list geometry for all colliders in a scene
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColliderLines {
    /// Corner positions, 8 per box
    pub vertices: Vec<LineVertex>,
    /// Vertex index pairs, 12 per box
    pub indices: Vec<[u32; 2]>,
}

impl ColliderLines {
    /// Create empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffers with room for `boxes` colliders
    pub fn with_capacity(boxes: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(boxes * BOX_CORNERS.len()),
            indices: Vec::with_capacity(boxes * BOX_EDGES.len()),
        }
    }

    /// Build geometry for every collider in native scene order
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let count = graph.iter().filter(|(_, o)| o.metadata.collider.is_some()).count();
        let mut lines = Self::with_capacity(count);
        for (key, _) in graph.iter() {
            if let Some(corners) = object_corners(graph, key) {
                lines.push_box(&corners);
            }
        }
        log::trace!("Built {} collider boxes", lines.box_count());
        lines
    }

    /// Append one box, offsetting its edges by the vertices already present
    pub fn push_box(&mut self, corners: &[Vec3; 8]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners.iter().map(|&c| LineVertex::from(c)));
        self.indices
            .extend(BOX_EDGES.iter().map(|&[a, b]| [a + base, b + base]));
    }

    /// Remove all geometry, keeping the allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// True when there is nothing to draw
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of boxes in the buffers
    #[inline]
    pub fn box_count(&self) -> usize {
        self.vertices.len() / BOX_CORNERS.len()
    }

    /// Vertex buffer as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer flattened to `u32`s for upload
    pub fn index_data(&self) -> &[u32] {
        bytemuck::cast_slice(&self.indices)
    }
}
