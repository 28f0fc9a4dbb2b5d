//! Level exporter
//!
//! Reads a scene snapshot saved by the level editor and writes the
//! engine-ready `.scene` and `.json` exports.
//!
//! Usage: `level_export [SNAPSHOT]` (defaults to `export.snapshot` from config)

use std::path::PathBuf;
use std::process::ExitCode;

use level_export::{run_export, AppConfig};

fn main() -> ExitCode {
    // Config first so the log level can come from it
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging (RUST_LOG still wins)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let snapshot_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export.snapshot.clone());

    match run_export(&config, &snapshot_path) {
        Ok(report) => {
            log::info!(
                "Done: {} objects, {} files written, {} warnings",
                report.objects,
                report.written.len(),
                report.warnings
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
