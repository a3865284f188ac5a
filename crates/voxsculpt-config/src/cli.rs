//! Command-line arguments for the `voxsculpt` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, FlatFormat, GeneratorKind};

/// Headless voxel sculpting.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "voxsculpt", about = "Headless voxel sculpting sandbox")]
pub struct CliArgs {
    /// Cubic grid size in voxels.
    #[arg(long)]
    pub size: Option<u32>,

    /// Procedural generator for the initial grid.
    #[arg(long, value_enum)]
    pub generator: Option<GeneratorKind>,

    /// Seed for the noise generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Import a `.vox` model as the initial grid.
    #[arg(long, conflicts_with = "load")]
    pub vox: Option<PathBuf>,

    /// Load a flat grid file as the initial grid.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Save the grid to this flat file when done.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Flat file encoding for `--load` and `--save`.
    #[arg(long, value_enum)]
    pub format: Option<FlatFormat>,

    /// Number of scripted sculpt strokes to run.
    #[arg(long, default_value_t = 0)]
    pub strokes: u32,

    /// Erase instead of add.
    #[arg(long)]
    pub erase: bool,

    /// Brush edge length in voxels.
    #[arg(long)]
    pub brush_radius: Option<u32>,

    /// Maximum cell advances per pick ray.
    #[arg(long)]
    pub trace_steps: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `--vox`, `--load`, `--strokes` and `--erase` describe the run rather
    /// than settings and are left for the caller.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.size {
            self.grid.size = [size; 3];
        }
        if let Some(kind) = args.generator {
            self.generator.kind = kind;
        }
        if let Some(seed) = args.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(ref path) = args.save {
            self.storage.save_path = path.display().to_string();
        }
        if let Some(format) = args.format {
            self.storage.format = format;
        }
        if let Some(radius) = args.brush_radius {
            self.brush.radius = radius;
        }
        if let Some(steps) = args.trace_steps {
            self.trace.max_steps = steps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
