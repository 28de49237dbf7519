//! CLI error types and exit codes.

use inkstat_core::display::RenderError;
use inkstat_core::error::InkstatError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Configuration could not be found, read or validated
    pub const CONFIG_ERROR: i32 = 1;
    /// The display could not be initialized, or a `--once` cycle aborted
    pub const DISPLAY_ERROR: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Display or rendering error
    #[error("Display error: {0}")]
    Display(String),

    /// A `--once` cycle aborted
    #[error("Cycle aborted: {0}")]
    Cycle(String),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Tracing(String),
}

impl From<InkstatError> for CliError {
    fn from(err: InkstatError) -> Self {
        match err {
            InkstatError::Config(e) => Self::Config(e.to_string()),
            InkstatError::Font(e) => Self::Config(e.to_string()),
            InkstatError::Tracing(e) => Self::Tracing(e.to_string()),
            InkstatError::Grid(e) | InkstatError::Render(RenderError::Grid(e)) => {
                Self::Config(e.to_string())
            }
            InkstatError::Display(e) => Self::Display(e.to_string()),
            InkstatError::Render(e) => Self::Display(e.to_string()),
            InkstatError::Cache(e) => Self::Cycle(e.to_string()),
            InkstatError::Collect(e) => Self::Cycle(e.to_string()),
            InkstatError::Cycle(e) => Self::Cycle(e.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Configuration error
    /// - 2: Display error or aborted `--once` cycle
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Tracing(_) => exit_codes::CONFIG_ERROR,
            Self::Display(_) | Self::Cycle(_) => exit_codes::DISPLAY_ERROR,
        }
    }
}
