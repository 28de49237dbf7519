//! Application settings
//!
//! [`AppConfig`] is built once at startup and passed by reference to every
//! component constructor. Nothing mutates it afterwards.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::display::Orientation;

/// A host to poll, as listed under `servers:`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Hostname as configured (resolved directly, then as `<host>.local`)
    pub host: String,
    /// SSH username; `None` lets ssh pick its default
    #[serde(default)]
    pub user: Option<String>,
}

impl HostConfig {
    /// Creates a host entry
    #[must_use]
    pub fn new(host: impl Into<String>, user: Option<String>) -> Self {
        Self {
            host: host.into(),
            user,
        }
    }
}

/// Line layout parameters consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLayout {
    /// Number of text lines on a page
    pub line_count: usize,
    /// Horizontal margin in pixels (ignored when centering)
    pub margin_x: i32,
    /// Vertical margin in pixels, applied above the first and below the last line
    pub margin_y: u32,
    /// Extra pixels between consecutive lines
    pub line_spacing: u32,
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self {
            line_count: default_line_count(),
            margin_x: default_margin(),
            margin_y: default_margin_y(),
            line_spacing: 0,
        }
    }
}

/// Complete application configuration (`config.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosts polled in order, one page each
    pub servers: Vec<HostConfig>,
    /// Title shown on the first line of every page
    pub display_title: String,
    /// Number of text lines on the display
    #[serde(default = "default_line_count")]
    pub line_count: usize,
    /// Dwell time per page in seconds
    pub display_time: u64,
    /// SSH private key used for remote hosts
    pub ssh_key: PathBuf,
    /// TrueType/OpenType font file; the built-in fonts are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<PathBuf>,
    /// Font height in pixels; without `font_file` the closest built-in font is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    /// Horizontal margin in pixels
    #[serde(default = "default_margin")]
    pub margin_x: i32,
    /// Vertical margin in pixels
    #[serde(default = "default_margin_y")]
    pub margin_y: u32,
    /// Extra pixels between lines
    #[serde(default)]
    pub line_spacing: u32,
    /// Directory holding the fact cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Fact cache file stem (`<cache_dir>/<cache_name>.json`)
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    /// ssh `ConnectTimeout` in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u32,
    /// Run a full refresh every N cycles to clear ghosting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_refresh_every: Option<u32>,
    /// Logical orientation of the panel
    #[serde(default)]
    pub orientation: Orientation,
}

const fn default_line_count() -> usize {
    6
}

const fn default_margin() -> i32 {
    1
}

const fn default_margin_y() -> u32 {
    1
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_cache_name() -> String {
    "facts".to_string()
}

const fn default_connect_timeout_secs() -> u32 {
    5
}

impl AppConfig {
    /// Line layout derived from the configured values
    #[must_use]
    pub const fn layout(&self) -> DisplayLayout {
        DisplayLayout {
            line_count: self.line_count,
            margin_x: self.margin_x,
            margin_y: self.margin_y,
            line_spacing: self.line_spacing,
        }
    }

    /// Page dwell time
    #[must_use]
    pub const fn display_duration(&self) -> Duration {
        Duration::from_secs(self.display_time)
    }

    /// Returns whether cycle number `cycle` (zero-based) is a full-refresh cycle
    #[must_use]
    pub fn is_maintenance_cycle(&self, cycle: u64) -> bool {
        match self.full_refresh_every {
            Some(every) if every > 0 => cycle % u64::from(every) == 0,
            _ => false,
        }
    }
}
