//! Scene export
//!
//! Two encodings of the same walk: the line-oriented [`text`] format and
//! the nested [`tree`] (JSON) format. [`export_to_path`] writes either one
//! to disk through a temporary sibling file, so a failed export never
//! leaves a partial file at the target path. [`index`] reads a JSON export
//! back the way the engine does.

pub mod index;
pub mod text;
pub mod tree;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::SceneGraph;
pub use index::{IndexError, Placement, SceneIndex};
pub use text::{to_text, TextSerializer};
pub use tree::{to_document, to_json, SceneDocument, TreeExportOptions, TreeSerializer};

/// Output encoding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Line-oriented `.scene` text
    Text,
    /// Structured `.json` document
    Json,
}

impl ExportFormat {
    /// File extension conventionally used for the format
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "scene",
            ExportFormat::Json => "json",
        }
    }

    /// Pick the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("scene") => Ok(ExportFormat::Text),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => f.write_str("text"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

/// Error exporting a scene
#[derive(Debug)]
pub enum ExportError {
    /// Writing the output failed
    Io { path: PathBuf, source: io::Error },
    /// The structured document could not be encoded
    Json(serde_json::Error),
    /// No format could be inferred from the path
    UnsupportedExtension(PathBuf),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            ExportError::Json(e) => write!(f, "JSON error: {}", e),
            ExportError::UnsupportedExtension(path) => {
                write!(f, "Cannot infer export format from {} (use .scene or .json)", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::Json(e) => Some(e),
            ExportError::UnsupportedExtension(_) => None,
        }
    }
}

/// Render a graph in memory
pub fn render(graph: &SceneGraph, format: ExportFormat, options: &TreeExportOptions) -> Result<String, ExportError> {
    match format {
        ExportFormat::Text => Ok(to_text(graph)),
        ExportFormat::Json => Ok(to_json(graph, options)?),
    }
}

/// Export a graph to a file
///
/// The document is written to a hidden temporary file next to `path` and
/// renamed over it once complete. On failure the temporary file is removed
/// and `path` is left as it was.
pub fn export_to_path(
    graph: &SceneGraph,
    path: impl AsRef<Path>,
    format: ExportFormat,
    options: &TreeExportOptions,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let contents = render(graph, format, options)?;

    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };
    let tmp = temp_path(path).map_err(io_err)?;

    if let Err(source) = write_file(&tmp, contents.as_bytes()).and_then(|()| fs::rename(&tmp, path)) {
        if tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                log::warn!("Could not remove {}: {}", tmp.display(), e);
            }
        }
        return Err(io_err(source));
    }

    log::info!(
        "Exported {} objects to {} ({}, {} bytes)",
        graph.len(),
        path.display(),
        format,
        contents.len()
    );
    Ok(())
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "export path has no file name")
    })?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()
}
