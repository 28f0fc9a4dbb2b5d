//! Integration tests for collider visualization
//!
//! These tests go from a snapshot, as the editor hands it over, to the
//! buffers given to the renderer:
//! 1. Colliders declared through custom properties are drawn
//! 2. Malformed colliders are dropped without affecting the others
//! 3. The cached path matches the per-frame rebuild

use level_core::metadata::{COLLIDER_CENTER_KEY, COLLIDER_KEY, COLLIDER_SIZE_KEY};
use level_core::{AttributeValue, Attributes, ObjectRecord, SceneSnapshot, Transform, Vec3};
use level_render::{draw_colliders, ColliderCache, ColliderLines, LineRenderer, LineVertex, COLLIDER_COLOR};

struct CountingRenderer {
    draws: usize,
    last: Option<(Vec<LineVertex>, Vec<[u32; 2]>, [f32; 4])>,
}

impl LineRenderer for CountingRenderer {
    fn draw_lines(&mut self, vertices: &[LineVertex], indices: &[[u32; 2]], color: [f32; 4]) {
        self.draws += 1;
        self.last = Some((vertices.to_vec(), indices.to_vec(), color));
    }
}

fn collider(center: AttributeValue, size: Vec3) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(COLLIDER_KEY.to_string(), "BOX".into());
    attributes.insert(COLLIDER_CENTER_KEY.to_string(), center);
    attributes.insert(COLLIDER_SIZE_KEY.to_string(), size.into());
    attributes
}

fn make_snapshot() -> SceneSnapshot {
    let mut snapshot = SceneSnapshot::new("Colliders");
    snapshot.add_object(
        ObjectRecord::new("Wall", "MESH")
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)))
            .with_attributes(collider(Vec3::ZERO.into(), Vec3::new(4.0, 0.5, 2.0))),
    );
    snapshot.add_object(
        ObjectRecord::new("Broken", "MESH")
            .with_attributes(collider(AttributeValue::Text("middle".to_string()), Vec3::ONE)),
    );
    snapshot.add_object(
        ObjectRecord::new("Door", "MESH")
            .with_parent("Wall")
            .with_attributes(collider(Vec3::new(0.0, 0.0, 0.5).into(), Vec3::ONE)),
    );
    snapshot
}

#[test]
fn test_snapshot_colliders_are_drawn() {
    let (graph, issues) = make_snapshot().into_graph().unwrap();
    assert_eq!(issues.len(), 1, "Broken should be reported");

    let mut renderer = CountingRenderer { draws: 0, last: None };
    assert!(draw_colliders(&graph, &mut renderer));
    assert_eq!(renderer.draws, 1);

    let (vertices, indices, color) = renderer.last.unwrap();
    assert_eq!(color, COLLIDER_COLOR);
    assert_eq!(vertices.len(), 16);
    assert_eq!(indices.len(), 24);

    // Wall corner 0: (-2, -0.25, -1) + (0, 0, 1), no axis swap
    assert_eq!(vertices[0].position, [-2.0, -0.25, 0.0]);
    // Door corner 7 inherits the wall's translation: (0.5, 0.5, 1.0) + (0, 0, 1)
    assert_eq!(vertices[15].position, [0.5, 0.5, 2.0]);
    assert!(indices[12..].iter().all(|&[a, b]| a >= 8 && b >= 8));
}

#[test]
fn test_cache_agrees_with_rebuild_across_edits() {
    let (mut graph, _) = make_snapshot().into_graph().unwrap();
    let mut cache = ColliderCache::new();
    assert_eq!(cache.sync(&mut graph), &ColliderLines::from_graph(&graph));

    let wall = graph.find_by_name("Wall").unwrap();
    graph.set_local_transform(wall, Transform::identity().with_euler_degrees(0.0, 0.0, 90.0));
    assert_eq!(cache.sync(&mut graph), &ColliderLines::from_graph(&graph));

    let broken = graph.find_by_name("Broken").unwrap();
    if let Some(metadata) = graph.metadata_mut(broken) {
        metadata.add_default_collider();
    }
    let lines = cache.sync(&mut graph).clone();
    assert_eq!(lines.box_count(), 3);
    assert_eq!(lines, ColliderLines::from_graph(&graph));
}
