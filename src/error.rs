use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::path::PathBuf;
use thiserror::Error;

/// Any error that aborts a detection run
#[derive(Error, Debug)]
pub enum OrphanError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Usage telemetry unavailable: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Workspace root does not exist or is not a directory: {}", .0.display())]
    MissingRoot(PathBuf),
}
