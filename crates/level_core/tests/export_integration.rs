//! Integration tests for the export pipeline
//!
//! These tests drive the full snapshot-to-file path:
//! 1. Snapshots build a graph with the editor's native order
//! 2. The walker visits nodes pre-order
//! 3. Both encodings agree on structure and omit absent metadata
//! 4. File export is all-or-nothing and repeatable

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use level_core::export::{text, tree};
use level_core::metadata::{COLLIDER_CENTER_KEY, COLLIDER_KEY, COLLIDER_SIZE_KEY, FILE_NAME_KEY};
use level_core::{
    export_to_path, AttributeValue, Attributes, ExportError, ExportFormat, ObjectRecord,
    SceneGraph, SceneSnapshot, SceneWalker, SnapshotError, SnapshotValidator, Transform,
    TreeExportOptions, ValidationError, Vec3,
};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Fresh scratch directory under the system temp dir
fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "level_core_{}_{}_{}",
        label,
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn collider_attributes(file_name: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    if let Some(name) = file_name {
        attributes.insert(FILE_NAME_KEY.to_string(), name.into());
    }
    attributes.insert(COLLIDER_KEY.to_string(), "BOX".into());
    attributes.insert(COLLIDER_CENTER_KEY.to_string(), Vec3::new(0.0, 0.0, 1.0).into());
    attributes.insert(COLLIDER_SIZE_KEY.to_string(), Vec3::new(2.0, 2.0, 2.0).into());
    attributes
}

/// Depth-4 forest with mixed metadata
///
/// ```text
/// A
///   B
///     D
///       F
///   C
/// E
/// ```
fn make_snapshot() -> SceneSnapshot {
    let mut snapshot = SceneSnapshot::new("Test Level");
    snapshot.add_object(
        ObjectRecord::new("A", "EMPTY")
            .with_transform(Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))),
    );
    snapshot.add_object(
        ObjectRecord::new("B", "MESH")
            .with_parent("A")
            .with_attributes(collider_attributes(Some("barrel"))),
    );
    snapshot.add_object(ObjectRecord::new("E", "LIGHT"));
    snapshot.add_object(
        ObjectRecord::new("D", "MESH")
            .with_parent("B")
            .with_transform(Transform::identity().with_euler_degrees(10.0, 20.0, 30.0)),
    );
    snapshot.add_object(ObjectRecord::new("C", "MESH").with_parent("A"));
    snapshot.add_object(
        ObjectRecord::new("F", "MESH")
            .with_parent("D")
            .with_attributes(collider_attributes(None)),
    );
    snapshot
}

fn make_graph() -> SceneGraph {
    let (graph, issues) = make_snapshot().into_graph().expect("snapshot should build");
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    graph
}

/// Split a text export into (depth, lines) blocks on END + blank line
fn split_blocks(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut lines = text.split('\n');
    assert_eq!(lines.next(), Some(text::HEADER));

    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut after_end = false;
    for line in lines {
        if after_end {
            assert_eq!(line, "", "END must be followed by a blank line");
            let depth = current[0].chars().take_while(|&c| c == '\t').count();
            blocks.push((depth, std::mem::take(&mut current)));
            after_end = false;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        after_end = line.trim_start_matches('\t') == text::END;
        current.push(line.to_string());
    }
    assert!(current.is_empty(), "dangling lines: {:?}", current);
    blocks
}

// ==================== Traversal Tests ====================

#[test]
fn test_pre_order_traversal() {
    let graph = make_graph();
    let mut order = Vec::new();
    SceneWalker::default().for_each(&graph, |node| order.push(node.object.name.clone()));
    assert_eq!(order, vec!["A", "B", "D", "F", "C", "E"]);
}

// ==================== Text Format Tests ====================

#[test]
fn test_text_block_per_object_at_depth() {
    let graph = make_graph();
    let blocks = split_blocks(&text::to_text(&graph));

    let depths: Vec<usize> = blocks.iter().map(|(d, _)| *d).collect();
    assert_eq!(depths, vec![0, 1, 2, 3, 1, 0]);

    for (depth, lines) in &blocks {
        let indent = "\t".repeat(*depth);
        for line in lines {
            assert!(line.starts_with(&indent), "{:?} not at depth {}", line, depth);
            assert!(!line[indent.len()..].starts_with('\t'), "{:?} over-indented", line);
        }
    }
}

#[test]
fn test_text_conversion_values() {
    let graph = make_graph();
    let text = text::to_text(&graph);
    let blocks = split_blocks(&text);

    // A: translation (1, 2, 3) is written as (1, 3, 2)
    assert_eq!(blocks[0].1[1], "T 1.000000 3.000000 2.000000");

    // D: rotation (10, 20, 30) degrees is written as (-10, -30, -20)
    let rotation: Vec<f32> = blocks[2].1[2]
        .trim_start()
        .split(' ')
        .skip(1)
        .map(|v| v.parse().unwrap())
        .collect();
    let expected = [-10.0, -30.0, -20.0];
    for (got, want) in rotation.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "rotation {:?}", rotation);
    }
}

#[test]
fn test_text_optional_lines() {
    let graph = make_graph();
    let blocks = split_blocks(&text::to_text(&graph));

    let tags = |lines: &[String]| -> Vec<String> {
        lines
            .iter()
            .map(|l| l.trim_start().split(' ').next().unwrap_or("").to_string())
            .collect()
    };

    // B has both a name and a collider
    assert_eq!(tags(&blocks[1].1), vec!["MESH", "T", "R", "S", "N", "C", "CC", "CS", "END"]);
    assert_eq!(blocks[1].1[4], "\tN barrel");
    assert_eq!(blocks[1].1[6], "\tCC 0.000000 1.000000 0.000000");
    // F has a collider only
    assert_eq!(tags(&blocks[3].1), vec!["MESH", "T", "R", "S", "C", "CC", "CS", "END"]);
    // C and E have neither
    assert_eq!(tags(&blocks[4].1), vec!["MESH", "T", "R", "S", "END"]);
    assert_eq!(tags(&blocks[5].1), vec!["LIGHT", "T", "R", "S", "END"]);
}

// ==================== Structured Format Tests ====================

#[test]
fn test_structured_matches_text_structure() {
    let graph = make_graph();
    let doc = tree::to_document(&graph, &TreeExportOptions::default());

    let roots: Vec<_> = doc.objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(roots, vec!["A", "E"]);

    let a = &doc.objects[0];
    assert_eq!(a.transform.transform, [1.0, 3.0, 2.0]);
    let b = &a.children[0];
    assert_eq!(b.file_name.as_deref(), Some("barrel"));
    let collider = b.collider.as_ref().unwrap();
    assert_eq!(collider.center, [0.0, 1.0, 0.0]);
    assert_eq!(b.children[0].children[0].name, "F");
}

#[test]
fn test_structured_omits_absent_fields() {
    let graph = make_graph();
    let json = tree::to_json(&graph, &TreeExportOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let e = &value["objects"][1];
    assert_eq!(e["name"], "E");
    assert!(e.get("file_name").is_none());
    assert!(e.get("collider").is_none());
    assert!(e.get("children").is_none());

    let c = &value["objects"][0]["children"][1];
    assert_eq!(c["name"], "C");
    assert!(c.get("children").is_none());
}

#[test]
fn test_empty_scene_outputs() {
    let graph = SceneSnapshot::new("Empty").into_graph().unwrap().0;
    assert_eq!(text::to_text(&graph), "SCENE\n");

    let doc = tree::to_document(&graph, &TreeExportOptions::default());
    assert_eq!(doc.name, "scene");
    assert!(doc.objects.is_empty());
}

// ==================== File Export Tests ====================

#[test]
fn test_export_is_idempotent() {
    let graph = make_graph();
    let dir = scratch_dir("idempotent");
    let options = TreeExportOptions::default();

    for format in [ExportFormat::Text, ExportFormat::Json] {
        let path = dir.join(format!("level.{}", format.extension()));
        export_to_path(&graph, &path, format, &options).unwrap();
        let first = fs::read(&path).unwrap();
        export_to_path(&graph, &path, format, &options).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second, "{} export changed between runs", format);
    }

    let names: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| !n.ends_with(".tmp")), "leftover temp files: {:?}", names);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_export_failure_leaves_nothing_behind() {
    let graph = make_graph();
    let dir = scratch_dir("failure");
    let path = dir.join("missing_subdir").join("level.scene");

    let result = export_to_path(&graph, &path, ExportFormat::Text, &TreeExportOptions::default());
    match result {
        Err(ExportError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("Expected Io error, got {:?}", other),
    }
    assert!(!path.exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_export_replaces_existing_file() {
    let graph = make_graph();
    let dir = scratch_dir("replace");
    let path = dir.join("level.json");
    fs::write(&path, "stale").unwrap();

    export_to_path(&graph, &path, ExportFormat::Json, &TreeExportOptions::default()).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    let doc: level_core::SceneDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(doc.objects.len(), 2);

    fs::remove_dir_all(&dir).ok();
}

// ==================== Snapshot Tests ====================

#[test]
fn test_snapshot_file_round_trip() {
    let snapshot = make_snapshot();
    let dir = scratch_dir("snapshot");
    let path = dir.join("level.ron");

    snapshot.save(&path).unwrap();
    let loaded = SceneSnapshot::load(&path).unwrap();
    assert_eq!(loaded, snapshot);

    let (graph, _) = loaded.into_graph().unwrap();
    assert_eq!(text::to_text(&graph), text::to_text(&make_graph()));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_collider_is_dropped_for_that_object_only() {
    let mut snapshot = make_snapshot();
    let mut bad = Attributes::new();
    bad.insert(COLLIDER_KEY.to_string(), "BOX".into());
    bad.insert(COLLIDER_CENTER_KEY.to_string(), AttributeValue::List(vec![AttributeValue::Number(0.0)]));
    bad.insert(COLLIDER_SIZE_KEY.to_string(), Vec3::ONE.into());
    snapshot.add_object(ObjectRecord::new("Broken", "MESH").with_attributes(bad));

    let (graph, issues) = snapshot.into_graph().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].object, "Broken");

    let blocks = split_blocks(&text::to_text(&graph));
    let broken = blocks.last().unwrap();
    assert_eq!(broken.1.len(), 5, "Broken should have no collider lines: {:?}", broken.1);
    assert!(blocks[1].1.iter().any(|l| l.trim_start().starts_with("C ")));
}

#[test]
fn test_non_finite_transform_never_reaches_an_encoding() {
    let mut snapshot = make_snapshot();
    let mut drifter = ObjectRecord::new("Drifter", "MESH");
    drifter.transform.translation = [f32::NAN, 0.0, 0.0];
    snapshot.add_object(drifter);

    let errors = SnapshotValidator::validate(&snapshot);
    assert_eq!(errors, vec![ValidationError::NonFiniteTransform("Drifter".to_string())]);
    assert!(matches!(
        snapshot.into_graph(),
        Err(SnapshotError::NonFiniteTransform(ref name)) if name == "Drifter"
    ));
}
