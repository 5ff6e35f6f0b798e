//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Asteroid field demo arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "asteroids", about = "Procedural asteroid field")]
pub struct CliArgs {
    /// Number of unique asteroid meshes.
    #[arg(long)]
    pub instances: Option<u32>,

    /// Subdivision levels of the base geosphere.
    #[arg(long)]
    pub subdiv: Option<u32>,

    /// Generation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of orbiting asteroids.
    #[arg(long)]
    pub revolving: Option<u32>,

    /// Build meshes on a thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fixed simulation ticks to run after setup.
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,

    /// Upload the meshes to a headless GPU device if one is available.
    #[arg(long)]
    pub gpu: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.instances {
            self.generation.instance_count = n;
        }
        if let Some(levels) = args.subdiv {
            self.generation.subdiv_levels = levels;
        }
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(n) = args.revolving {
            self.field.revolving_count = n;
        }
        if args.parallel {
            self.generation.parallel = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            instances: Some(8),
            seed: Some(42),
            parallel: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.instance_count, 8);
        assert_eq!(config.generation.seed, 42);
        assert!(config.generation.parallel);
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.subdiv_levels, 3);
        assert_eq!(config.field.revolving_count, 1000);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "asteroids",
            "--subdiv",
            "2",
            "--revolving",
            "10",
            "--log-level",
            "debug",
            "--ticks",
            "5",
        ]);
        assert_eq!(args.subdiv, Some(2));
        assert_eq!(args.revolving, Some(10));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.ticks, 5);
        assert!(!args.gpu);
    }

    #[test]
    fn test_ticks_default() {
        assert_eq!(CliArgs::parse_from(["asteroids"]).ticks, 600);
    }
}
