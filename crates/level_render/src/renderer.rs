//! Hand-off to the host renderer
//!
//! The host owns the viewport and its draw callbacks; this crate only hands
//! it finished buffers through [`LineRenderer`].

use level_core::SceneGraph;

use crate::collider_lines::{ColliderLines, LineVertex, COLLIDER_COLOR};

/// Something that can draw an indexed line list in a single color
pub trait LineRenderer {
    fn draw_lines(&mut self, vertices: &[LineVertex], indices: &[[u32; 2]], color: [f32; 4]);
}

/// Submit prepared collider lines, returning whether a draw was issued
///
/// Empty buffers issue no draw.
pub fn submit_lines<R: LineRenderer + ?Sized>(lines: &ColliderLines, renderer: &mut R) -> bool {
    if lines.is_empty() {
        return false;
    }
    renderer.draw_lines(&lines.vertices, &lines.indices, COLLIDER_COLOR);
    true
}

/// Build and draw every collider in the scene for this frame
pub fn draw_colliders<R: LineRenderer + ?Sized>(graph: &SceneGraph, renderer: &mut R) -> bool {
    submit_lines(&ColliderLines::from_graph(graph), renderer)
}
