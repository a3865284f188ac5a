//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level sculptor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub brush: BrushConfig,
    pub trace: TraceConfig,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
    pub debug: DebugConfig,
}

/// Voxel grid dimensions and occlusion block size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Grid size in voxels along X, Y, Z.
    pub size: [u32; 3],
    /// Edge length of one occlusion block, in voxels.
    pub occlusion_block_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: [256, 256, 256],
            occlusion_block_size: 32,
        }
    }
}

/// Sculpt brush settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrushConfig {
    /// Edge length of the brush cube; the sphere radius is half of it.
    pub radius: u32,
    /// RGB colour written by add strokes.
    pub color: [f32; 3],
    /// Maximum sculpt strokes per second.
    pub tick_rate_hz: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 32,
            color: [0.6, 0.6, 0.6],
            tick_rate_hz: 60.0,
        }
    }
}

/// Ray traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    /// Maximum cell advances per pick ray.
    pub max_steps: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { max_steps: 1024 }
    }
}

/// Which procedural generator builds the initial grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum GeneratorKind {
    #[default]
    Sphere,
    Noise,
    OcclusionTest,
}

/// Procedural generator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub kind: GeneratorKind,
    /// Sphere radius in voxels; `None` picks one from the grid size.
    pub sphere_radius: Option<f32>,
    pub noise_frequency: f64,
    pub noise_octaves: u32,
    /// Normalized noise level above which a voxel is filled.
    pub noise_threshold: f64,
    /// Noise seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::Sphere,
            sphere_radius: None,
            noise_frequency: 0.0075,
            noise_octaves: 4,
            noise_threshold: 0.5,
            seed: None,
        }
    }
}

/// Encoding of the flat grid file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum FlatFormat {
    /// JSON array of floats.
    #[default]
    Json,
    /// Raw little-endian `f32` stream.
    Binary,
}

/// Flat grid file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the flat grid file.
    pub save_path: String,
    pub format: FlatFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_path: "voxeldata".to_string(),
            format: FlatFormat::Json,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(config_dir)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-reads `config.ron`; returns `Some(new_config)` only if it differs.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(config_dir)?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_dir: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
