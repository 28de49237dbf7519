//! Error types shared across `inkstat`
//!
//! Component-local errors (probe, grid, display) live next to their
//! components; this module holds the configuration and cache errors plus
//! the crate-wide [`InkstatError`] that aggregates them.

use std::path::PathBuf;

use thiserror::Error;

use crate::collector::CollectError;
use crate::cycle::CycleError;
use crate::display::{DisplayError, FontError, GridError, RenderError};
use crate::tracing::TracingError;

/// Errors raised while loading or validating the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any searched location
    #[error("Configuration file not found (searched: {})", display_paths(.0))]
    NotFound(Vec<PathBuf>),

    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value is present but not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The SSH private key referenced by the configuration does not exist
    #[error("SSH key file not found: {0}")]
    MissingKeyFile(PathBuf),

    /// The font file referenced by the configuration does not exist
    #[error("Font file not found: {0}")]
    MissingFontFile(PathBuf),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while persisting the fact cache
///
/// Read failures never surface here: a corrupt or missing store is treated
/// as empty. Write failures are fatal for the current cycle.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The cache file could not be written
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        /// Cache file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The cache map could not be serialized
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Top-level error type for `inkstat`
#[derive(Debug, Error)]
pub enum InkstatError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fact cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Host collection error
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// Line layout error
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Font file could not be loaded
    #[error(transparent)]
    Font(#[from] FontError),

    /// Display driver error
    #[error(transparent)]
    Display(#[from] DisplayError),

    /// Rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Cycle error
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Logging setup error
    #[error(transparent)]
    Tracing(#[from] TracingError),
}
