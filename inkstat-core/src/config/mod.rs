//! Configuration management for `inkstat`
//!
//! This module provides the `ConfigManager` for locating and loading the
//! YAML configuration file and the immutable [`AppConfig`] it produces.

mod manager;
pub mod settings;

pub use manager::{
    APP_DIR_NAME, CONFIG_FILE_NAME, ConfigManager, default_config_paths, parse_config,
};
pub use settings::{AppConfig, DisplayLayout, HostConfig};
