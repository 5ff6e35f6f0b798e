//! Configuration sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Procedural mesh generation.
    pub generation: GenerationConfig,
    /// Placement and motion of the asteroid field.
    pub field: FieldConfig,
    pub debug: DebugConfig,
}

/// Texture coordinate projection used for every asteroid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UvMapping {
    /// Raw `(x, y)` of the displaced position.
    #[default]
    Planar,
    Spherical,
}

/// Mesh generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of unique asteroid meshes.
    pub instance_count: u32,
    /// Subdivisions applied to the base icosahedron.
    pub subdiv_levels: u32,
    /// Seed of the generator that draws per-asteroid noise parameters.
    pub seed: u64,
    /// Position scale applied before sampling noise.
    pub noise_scale: f32,
    /// Radius contributed by the noise term.
    pub radius_scale: f32,
    /// Radius every vertex keeps regardless of noise.
    pub radius_bias: f32,
    pub persistence_mean: f32,
    pub persistence_std_dev: f32,
    /// Noise offsets are drawn from `[0, noise_offset_max)`.
    pub noise_offset_max: f32,
    pub octaves: u32,
    pub uv_mapping: UvMapping,
    /// Build instances on a thread pool (needs the `parallel` feature).
    pub parallel: bool,
}

/// Asteroid field layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Distance between neighbours in the showcase row.
    pub row_spacing: f32,
    pub row_height: f32,
    pub row_depth: f32,
    /// Extra asteroids orbiting the origin, reusing the generated meshes.
    pub revolving_count: u32,
    /// Fraction of the field radius the orbiting shell is thick.
    pub shell_thickness: f32,
    pub field_radius: f32,
    /// Seed for placement, spin axes and speeds.
    pub layout_seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "debug", "info", "asteroids_mesh=trace").
    pub log_level: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            subdiv_levels: 3,
            seed: 100,
            noise_scale: 0.5,
            radius_scale: 0.9,
            radius_bias: 0.3,
            persistence_mean: 0.95,
            persistence_std_dev: 0.04,
            noise_offset_max: 10_000.0,
            octaves: 4,
            uv_mapping: UvMapping::Planar,
            parallel: false,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            row_spacing: 3.0,
            row_height: 1.2,
            row_depth: -10.5,
            revolving_count: 1000,
            shell_thickness: 0.5,
            field_radius: 100.0,
            layout_seed: 7,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Per-user config directory, or the working directory if none exists.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("asteroids"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)
    }

    /// Re-read the file; `Some` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE_NAME))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
