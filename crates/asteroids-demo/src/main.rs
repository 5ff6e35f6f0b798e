//! Builds a procedural asteroid field and steps it headlessly.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p asteroids-demo -- --instances 20 --ticks 120`.
//! Add `--gpu` to upload the meshes to a headless wgpu device.

mod field;

use std::process::ExitCode;

use asteroids_config::{CliArgs, Config, GenerationConfig, UvMapping, default_config_dir};
use asteroids_mesh::{
    AsteroidParams, MeshError, MeshLibrary, UvProjection, asteroid_rng, build_asteroid_meshes,
};
use asteroids_render::{GpuContext, GpuMeshFactory};
use clap::Parser;
use tracing::{error, info, warn};

use crate::field::{HeadlessScene, run_field};

/// Generator parameters from the `generation` config section.
fn asteroid_params(config: &GenerationConfig) -> AsteroidParams {
    AsteroidParams {
        subdiv_levels: config.subdiv_levels,
        instance_count: config.instance_count,
        noise_scale: config.noise_scale,
        radius_scale: config.radius_scale,
        radius_bias: config.radius_bias,
        persistence_mean: config.persistence_mean,
        persistence_std_dev: config.persistence_std_dev,
        noise_offset_max: config.noise_offset_max,
        octaves: config.octaves,
        uv_projection: match config.uv_mapping {
            UvMapping::Planar => UvProjection::Planar,
            UvMapping::Spherical => UvProjection::Spherical,
        },
        parallel: config.parallel,
    }
}

fn run(config: &Config, args: &CliArgs) -> Result<(), MeshError> {
    let params = asteroid_params(&config.generation);
    let mut rng = asteroid_rng(config.generation.seed);

    if args.gpu {
        match GpuContext::headless_blocking() {
            Ok(gpu) => {
                let mut factory = GpuMeshFactory::new(&gpu.device);
                let handles = build_asteroid_meshes(&params, &mut rng, &mut factory)?;
                info!(
                    meshes = handles.len(),
                    gpu_bytes = factory.total_gpu_bytes(),
                    "Uploaded asteroid meshes"
                );
                let mut scene = HeadlessScene::default();
                run_field(&handles, &config.field, &mut scene, args.ticks);
                return Ok(());
            }
            Err(e) => warn!(%e, "No GPU available, keeping meshes in memory"),
        }
    }

    let mut library = MeshLibrary::new();
    let handles = build_asteroid_meshes(&params, &mut rng, &mut library)?;
    info!(
        meshes = library.len(),
        bytes = library.total_bytes(),
        "Stored asteroid meshes"
    );
    let mut scene = HeadlessScene::default();
    run_field(&handles, &config.field, &mut scene, args.ticks);
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    asteroids_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "Asteroid generation failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_gives_default_params() {
        assert_eq!(
            asteroid_params(&GenerationConfig::default()),
            AsteroidParams::default()
        );
    }

    #[test]
    fn test_spherical_mapping_is_forwarded() {
        let config = GenerationConfig {
            uv_mapping: UvMapping::Spherical,
            ..Default::default()
        };
        assert_eq!(asteroid_params(&config).uv_projection, UvProjection::Spherical);
    }

    #[test]
    fn test_run_headless_small_scene() {
        let mut config = Config::default();
        config.generation.instance_count = 3;
        config.generation.subdiv_levels = 1;
        config.field.revolving_count = 6;
        let args = CliArgs {
            ticks: 2,
            ..Default::default()
        };
        assert!(run(&config, &args).is_ok());
    }

    #[test]
    fn test_run_reports_bad_parameters() {
        let mut config = Config::default();
        config.generation.radius_bias = 0.0;
        assert!(run(&config, &CliArgs::default()).is_err());
    }
}
