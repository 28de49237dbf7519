//! `inkstat` Core Library
//!
//! This crate provides the core functionality for `inkstat`, a host health
//! dashboard for small e-ink panels: metric probing, fact caching, page
//! layout and rendering.
//!
//! # Crate Structure
//!
//! - [`config`] - YAML configuration and the immutable [`AppConfig`]
//! - [`cache`] - Persistent per-host fact cache
//! - [`probe`] - Address resolution and local/SSH command execution
//! - [`collector`] - Per-host snapshots and cycle summaries
//! - [`display`] - Line grid, framebuffer, surface and panel drivers
//! - [`dashboard`] - Host, offline, summary and line-test pages
//! - [`cycle`] - The polling loop
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod cache;
pub mod collector;
pub mod config;
pub mod cycle;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod probe;
pub mod tracing;

pub use cache::{FactCache, FactKey};
pub use collector::{
    CollectError, CycleSummary, FactSource, HostCollector, HostReport, HostSnapshot,
    ResolvedFact, StableFacts,
};
pub use config::{AppConfig, ConfigManager, DisplayLayout, HostConfig};
pub use cycle::{CycleError, Monitor, remaining_dwell};
pub use dashboard::Dashboard;
pub use display::{
    DisplayDriver, FontChoice, FontFace, Justify, LineGrid, LineSpec, MemoryDriver, Orientation,
    PbmFileDriver, RefreshMode, Renderer, Surface,
};
pub use error::{CacheError, ConfigError, InkstatError};
pub use probe::{
    AddressResolver, CommandRunner, ProbeCommand, ProbeError, ProbeTarget, ShellProbe,
    SystemResolver,
};
pub use tracing::{TracingConfig, TracingError, TracingLevel, TracingOutput, init_tracing};
