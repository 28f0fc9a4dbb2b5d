//! Collider debug geometry
//!
//! This crate turns the box colliders attached to scene objects into a
//! line-list wireframe the host renderer can draw in one call.
//!
//! ## Key Components
//!
//! - [`collider_lines::ColliderLines`] - Vertex and edge buffers for every box collider
//! - [`collider_cache::ColliderCache`] - Per-object corners kept across frames, rebuilt on change
//! - [`renderer::LineRenderer`] - Seam to the host's line drawing
//!
//! Geometry stays in the authoring coordinate space; no axis conversion is
//! applied here.

pub mod collider_lines;
pub mod collider_cache;
pub mod renderer;

pub use collider_lines::{ColliderLines, LineVertex, BOX_CORNERS, BOX_EDGES, COLLIDER_COLOR};
pub use collider_cache::ColliderCache;
pub use renderer::{draw_colliders, submit_lines, LineRenderer};

// Re-export core types for convenience
pub use level_core::{ColliderDescriptor, ObjectKey, SceneGraph};
