//! Level exporter
//!
//! Host-side glue around `level_core` and `level_render`: configuration
//! loading and the snapshot-to-files export run used by the binary.

pub mod config;
pub mod exporter;

pub use config::AppConfig;
pub use exporter::{run_export, ExportReport, RunError};
