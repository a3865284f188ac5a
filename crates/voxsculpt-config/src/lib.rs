//! Sculptor settings persisted as `config.ron`, with command-line overrides.
//!
//! Every section is `#[serde(default)]`, so older or partial files still load
//! and unknown keys are ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BrushConfig, Config, DebugConfig, FlatFormat, GeneratorConfig, GeneratorKind, GridConfig,
    StorageConfig, TraceConfig,
};
pub use error::ConfigError;
