//! One export run: snapshot in, files out

use std::fmt;
use std::path::{Path, PathBuf};

use level_core::{
    export_to_path, ExportError, ExportFormat, SceneIndex, SceneSnapshot, SnapshotError,
    SnapshotValidator, TreeExportOptions,
};
use level_render::ColliderLines;

use crate::config::AppConfig;

/// What a run produced
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportReport {
    /// Objects in the scene
    pub objects: usize,
    /// Files written, in order
    pub written: Vec<PathBuf>,
    /// Validation and attribute problems that did not stop the run
    pub warnings: usize,
    /// Collider boxes built, when collider reporting is on
    pub collider_boxes: Option<usize>,
}

/// Error that stops a run
#[derive(Debug)]
pub enum RunError {
    /// The snapshot could not be read or turned into a graph
    Snapshot { path: PathBuf, source: SnapshotError },
    /// An export could not be written
    Export(ExportError),
}

impl From<ExportError> for RunError {
    fn from(e: ExportError) -> Self {
        RunError::Export(e)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Snapshot { path, source } => {
                write!(f, "Failed to load snapshot {}: {}", path.display(), source)
            }
            RunError::Export(e) => write!(f, "Export failed: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Snapshot { source, .. } => Some(source),
            RunError::Export(e) => Some(e),
        }
    }
}

/// Load `snapshot_path` and write every export the configuration asks for
pub fn run_export(config: &AppConfig, snapshot_path: &Path) -> Result<ExportReport, RunError> {
    let snapshot_err = |source| RunError::Snapshot { path: snapshot_path.to_path_buf(), source };

    let snapshot = SceneSnapshot::load(snapshot_path).map_err(snapshot_err)?;
    log::info!(
        "Loaded snapshot '{}' ({} objects) from {}",
        snapshot.name,
        snapshot.objects.len(),
        snapshot_path.display()
    );

    let mut report = ExportReport::default();

    if config.debug.validate {
        let errors = SnapshotValidator::validate(&snapshot);
        for error in &errors {
            log::warn!("Validation: {}", error);
        }
        report.warnings += errors.len();
    }

    let (graph, issues) = snapshot.into_graph().map_err(snapshot_err)?;
    report.objects = graph.len();
    if !config.debug.validate {
        // the validator already counted these
        report.warnings += issues.len();
    }

    let options = TreeExportOptions::default().with_rotation_unit(config.export.structured_rotation);
    let targets = [
        (config.export.text_output.as_ref(), ExportFormat::Text),
        (config.export.json_output.as_ref(), ExportFormat::Json),
    ];
    for (path, format) in targets.into_iter().filter_map(|(path, format)| Some((path?, format))) {
        export_to_path(&graph, path, format, &options)?;
        report.written.push(path.clone());

        if format == ExportFormat::Json && config.debug.validate {
            // read it back the way the engine will
            match SceneIndex::load(path, options.rotation_unit) {
                Ok(index) if index.len() == graph.len() => {
                    log::debug!("{} reads back with {} placements", path.display(), index.len());
                }
                Ok(index) => {
                    log::warn!(
                        "{} reads back with {} placements, expected {}",
                        path.display(),
                        index.len(),
                        graph.len()
                    );
                    report.warnings += 1;
                }
                Err(e) => {
                    log::warn!("{} does not read back: {}", path.display(), e);
                    report.warnings += 1;
                }
            }
        }
    }

    if report.written.is_empty() {
        log::warn!("No outputs configured; set export.text_output or export.json_output");
    }

    if config.debug.report_colliders {
        let lines = ColliderLines::from_graph(&graph);
        log::info!(
            "Collider geometry: {} boxes, {} vertices, {} edges",
            lines.box_count(),
            lines.vertex_count(),
            lines.edge_count()
        );
        report.collider_boxes = Some(lines.box_count());
    }

    Ok(report)
}
