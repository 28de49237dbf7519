//! Locating, loading and validating `config.yaml`

use std::path::{Path, PathBuf};

use super::settings::AppConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

/// File name looked up in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "inkstat";

/// Loads [`AppConfig`] from disk
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses an explicit configuration file path
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Finds the configuration file in the default locations
    ///
    /// Searches `./config.yaml`, then `<config_dir>/inkstat/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no candidate exists.
    pub fn locate() -> ConfigResult<Self> {
        let candidates = default_config_paths();
        candidates
            .iter()
            .find(|p| p.is_file())
            .map(|p| Self::with_path(p.clone()))
            .ok_or(ConfigError::NotFound(candidates))
    }

    /// Path of the configuration file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, parses and validates the configuration
    ///
    /// Relative `ssh_key`, `font_file` and `cache_dir` paths are resolved
    /// against the directory containing the configuration file; `~` is
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, a
    /// value is invalid, or the SSH key or font file does not exist.
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let _span = tracing::info_span!(span_names::CONFIG_LOAD, path = %self.path.display()).entered();

        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut config = parse_config(&content)?;
        let base = self
            .path
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        config.ssh_key = resolve_path(&base, &config.ssh_key);
        config.cache_dir = resolve_path(&base, &config.cache_dir);
        config.font_file = config.font_file.map(|font| resolve_path(&base, &font));

        if !config.ssh_key.is_file() {
            return Err(ConfigError::MissingKeyFile(config.ssh_key));
        }
        if let Some(font) = config.font_file.as_ref().filter(|f| !f.is_file()) {
            return Err(ConfigError::MissingFontFile(font.clone()));
        }

        tracing::debug!(
            servers = config.servers.len(),
            line_count = config.line_count,
            display_time = config.display_time,
            title = %config.display_title,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Parses and validates YAML configuration text
///
/// Paths are left exactly as written.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed YAML and
/// [`ConfigError::Invalid`] for out-of-range values.
pub fn parse_config(content: &str) -> ConfigResult<AppConfig> {
    let config: AppConfig =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> ConfigResult<()> {
    if config.servers.is_empty() {
        return Err(ConfigError::Invalid("at least one server is required".into()));
    }
    if let Some(entry) = config.servers.iter().find(|s| s.host.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "server host must not be empty (user: {:?})",
            entry.user
        )));
    }
    if config.line_count == 0 {
        return Err(ConfigError::Invalid("line_count must be at least 1".into()));
    }
    if config.font_size == Some(0) {
        return Err(ConfigError::Invalid("font_size must be positive".into()));
    }
    if config.margin_x < 0 {
        return Err(ConfigError::Invalid("margin_x must not be negative".into()));
    }
    if config.cache_name.trim().is_empty() {
        return Err(ConfigError::Invalid("cache_name must not be empty".into()));
    }
    Ok(())
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Candidate configuration paths in lookup order
#[must_use]
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}
