//! Collider geometry cache
//!
//! Rebuilding every box each frame is fine for small scenes. For larger ones
//! the cache keeps each object's world-space corners and only recomputes the
//! objects the scene graph reports as dirty. The assembled buffers are the
//! same as [`ColliderLines::from_graph`] would produce.

use level_core::{DirtyFlags, ObjectKey, SceneGraph};
use level_math::Vec3;
use slotmap::SecondaryMap;

use crate::collider_lines::{object_corners, ColliderLines};

/// Per-object collider corners, keyed by object
#[derive(Debug, Default)]
pub struct ColliderCache {
    /// `None` marks an object known to have no drawable collider
    corners: SecondaryMap<ObjectKey, Option<[Vec3; 8]>>,
    lines: ColliderLines,
    stale: bool,
}

impl ColliderCache {
    pub fn new() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }

    /// Pull the graph's dirty flags and refresh what changed
    ///
    /// This consumes the dirty flags; use [`ColliderCache::apply_changes`]
    /// when something else also needs them.
    pub fn sync(&mut self, graph: &mut SceneGraph) -> &ColliderLines {
        let changes = graph.take_dirty();
        self.apply_changes(graph, &changes);
        self.lines(graph)
    }

    /// Refresh entries for objects whose flags changed
    pub fn apply_changes(&mut self, graph: &SceneGraph, changes: &[(ObjectKey, DirtyFlags)]) {
        let before = self.corners.len();
        self.corners.retain(|key, _| graph.contains(key));
        if self.corners.len() != before {
            self.stale = true;
        }

        for &(key, flags) in changes {
            if flags.is_empty() || !graph.contains(key) {
                continue;
            }
            self.corners.insert(key, object_corners(graph, key));
            self.stale = true;
        }
    }

    /// Drop everything; the next call rebuilds from scratch
    pub fn invalidate(&mut self) {
        self.corners.clear();
        self.stale = true;
    }

    /// Assembled buffers in native scene order
    ///
    /// Objects the cache has never seen are computed on the spot.
    pub fn lines(&mut self, graph: &SceneGraph) -> &ColliderLines {
        let missing: Vec<ObjectKey> = graph
            .iter()
            .map(|(key, _)| key)
            .filter(|&key| !self.corners.contains_key(key))
            .collect();
        for key in missing {
            self.corners.insert(key, object_corners(graph, key));
            self.stale = true;
        }

        if self.stale {
            self.lines.clear();
            for (key, _) in graph.iter() {
                if let Some(Some(corners)) = self.corners.get(key) {
                    self.lines.push_box(corners);
                }
            }
            self.stale = false;
            log::trace!("Reassembled {} cached collider boxes", self.lines.box_count());
        }
        &self.lines
    }

    /// Number of objects with cached entries
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }
}
