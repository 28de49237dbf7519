//! Shared helpers used by the command modules.

use std::path::Path;

use inkstat_core::config::{AppConfig, ConfigManager};
use inkstat_core::display::{EPD_2IN13_V4_SIZE, FontFace, PbmFileDriver, Renderer, Surface};
use inkstat_core::error::InkstatError;

use crate::error::CliError;

/// Creates a `ConfigManager` for the optional path from CLI args, or
/// searches the default locations.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::locate().map_err(|e| InkstatError::from(e).into()),
    }
}

/// Loads and validates the configuration.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, CliError> {
    let manager = create_config_manager(config_path)?;
    manager.load().map_err(|e| InkstatError::from(e).into())
}

/// Builds and initializes a renderer that writes frames to `output`.
pub fn open_renderer(config: &AppConfig, output: &Path) -> Result<Renderer, CliError> {
    let surface = Surface::new(
        PbmFileDriver::new(output, EPD_2IN13_V4_SIZE),
        config.orientation,
    );
    let font = FontFace::load(config.font_file.as_deref(), config.font_size)
        .map_err(InkstatError::from)?;
    let mut renderer =
        Renderer::new(surface, &config.layout(), font).map_err(InkstatError::from)?;
    renderer.initialize().map_err(InkstatError::from)?;
    tracing::info!(output = %output.display(), font = ?renderer.font(), "Display ready");
    Ok(renderer)
}
