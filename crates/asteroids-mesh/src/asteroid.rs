//! Noise-displaced asteroid instances built from one shared geosphere.
//!
//! Every instance is a copy of the geosphere's vertex pool pushed in or out
//! along each vertex direction by multi-octave noise. Topology never changes,
//! so all instances reuse the geosphere's index buffer and differ only in
//! their vertex attributes.
//!
//! Randomness comes from one caller-owned generator. Per-instance parameters
//! are drawn from it strictly in instance order (persistence, then noise
//! offset) before any numeric work starts, so the output for a given seed is
//! the same whether instances are built sequentially or in parallel.

use glam::{Vec2, Vec3, Vec4};
use rand::distr::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use tracing::{debug, info};

use crate::error::MeshError;
use crate::geosphere::{Geosphere, create_geospheres};
use crate::mesh::IndexType;
use crate::normals::compute_avg_normals;
use crate::surface_noise::{DEFAULT_OCTAVES, NoiseOctaves};
use crate::tangents::{AttributeView, calculate_tangents};
use crate::uv::{UvProjection, create_uv_map};

/// Generator used for asteroid seeding.
pub type AsteroidRng = ChaCha8Rng;

/// Create the generator that seeds an asteroid batch.
pub fn asteroid_rng(seed: u64) -> AsteroidRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Tunables for a batch of asteroid meshes.
///
/// The defaults reproduce the reference look. None of the values are
/// load-bearing for correctness.
#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidParams {
    /// Subdivision level the instances are rendered at. All coarser levels
    /// are built as well and stay addressable.
    pub subdiv_levels: u32,
    /// Number of unique meshes to generate.
    pub instance_count: u32,
    /// Scale applied to positions before sampling noise.
    pub noise_scale: f32,
    /// Radius range covered by the noise.
    pub radius_scale: f32,
    /// Radius at noise value zero.
    pub radius_bias: f32,
    /// Mean of the per-instance octave persistence.
    pub persistence_mean: f32,
    /// Standard deviation of the per-instance octave persistence.
    pub persistence_std_dev: f32,
    /// Noise offsets are drawn from `[0, noise_offset_max)`.
    pub noise_offset_max: f32,
    /// Octaves summed per noise sample.
    pub octaves: u32,
    /// Texture coordinate projection.
    pub uv_projection: UvProjection,
    /// Build instances on the rayon pool when the `parallel` feature is on.
    pub parallel: bool,
}

impl Default for AsteroidParams {
    fn default() -> Self {
        Self {
            subdiv_levels: 3,
            instance_count: 100,
            noise_scale: 0.5,
            radius_scale: 0.9,
            radius_bias: 0.3,
            persistence_mean: 0.95,
            persistence_std_dev: 0.04,
            noise_offset_max: 10_000.0,
            octaves: DEFAULT_OCTAVES,
            uv_projection: UvProjection::Planar,
            parallel: false,
        }
    }
}

impl AsteroidParams {
    /// Reject values that would make sampling or displacement meaningless.
    pub fn validate(&self) -> Result<(), MeshError> {
        let checks: [(&'static str, f32, bool); 6] = [
            ("noise_scale", self.noise_scale, self.noise_scale.is_finite()),
            (
                "radius_scale",
                self.radius_scale,
                self.radius_scale.is_finite() && self.radius_scale >= 0.0,
            ),
            (
                "radius_bias",
                self.radius_bias,
                self.radius_bias.is_finite() && self.radius_bias > 0.0,
            ),
            (
                "persistence_mean",
                self.persistence_mean,
                self.persistence_mean.is_finite() && self.persistence_mean > 0.0,
            ),
            (
                "persistence_std_dev",
                self.persistence_std_dev,
                self.persistence_std_dev.is_finite() && self.persistence_std_dev >= 0.0,
            ),
            (
                "noise_offset_max",
                self.noise_offset_max,
                self.noise_offset_max.is_finite() && self.noise_offset_max > 0.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok {
                return Err(MeshError::InvalidParameter { name, value });
            }
        }
        if self.octaves == 0 {
            return Err(MeshError::InvalidParameter {
                name: "octaves",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Random parameters of one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceSeed {
    /// Instance number, also the position in the batch.
    pub id: u32,
    /// Octave persistence of this instance's noise.
    pub persistence: f32,
    /// Fourth noise coordinate selecting this instance's slice of the field.
    pub noise_offset: f32,
}

/// Draw the parameters of every instance, in order, from `rng`.
pub fn draw_instance_seeds<R: Rng + ?Sized>(
    rng: &mut R,
    params: &AsteroidParams,
) -> Result<Vec<InstanceSeed>, MeshError> {
    let persistence_dist = Normal::new(params.persistence_mean, params.persistence_std_dev)
        .map_err(|_| MeshError::InvalidParameter {
            name: "persistence_std_dev",
            value: params.persistence_std_dev,
        })?;
    let offset_dist =
        Uniform::new(0.0, params.noise_offset_max).map_err(|_| MeshError::InvalidParameter {
            name: "noise_offset_max",
            value: params.noise_offset_max,
        })?;

    let mut seeds = Vec::with_capacity(params.instance_count as usize);
    for id in 0..params.instance_count {
        let persistence = persistence_dist.sample(rng);
        let noise_offset = offset_dist.sample(rng);
        seeds.push(InstanceSeed {
            id,
            persistence,
            noise_offset,
        });
    }
    Ok(seeds)
}

/// One displaced copy of the geosphere's vertex pool.
///
/// Attribute arrays are index-aligned and cover the whole combined pool,
/// so every subdivision level of the geosphere stays renderable.
#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidInstance {
    /// Parameters this instance was built from.
    pub seed: InstanceSeed,
    /// Displaced positions.
    pub positions: Vec<Vec3>,
    /// Smooth normals of the displaced surface.
    pub normals: Vec<Vec3>,
    /// Texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Tangents with handedness in `w`.
    pub tangents: Vec<Vec4>,
    /// Largest vertex distance from the origin.
    pub bounding_radius: f32,
}

impl AsteroidInstance {
    /// Instance number.
    pub fn id(&self) -> u32 {
        self.seed.id
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Displace `positions` radially: `v * (noise(v * scale) * radius_scale + radius_bias)`.
pub fn displace_positions(
    positions: &[Vec3],
    seed: &InstanceSeed,
    params: &AsteroidParams,
) -> Vec<Vec3> {
    let noise = NoiseOctaves::new(params.octaves, seed.persistence);
    positions
        .iter()
        .map(|&v| {
            let n = noise.sample(v * params.noise_scale, seed.noise_offset);
            v * (n * params.radius_scale + params.radius_bias)
        })
        .collect()
}

/// Build one instance: displacement, normals, UVs and tangents.
///
/// Normals and tangents use the combined index list. Levels share no
/// vertices, so each level's vertices get exactly the frame their own
/// triangles define.
pub fn build_instance(
    geosphere: &Geosphere,
    seed: &InstanceSeed,
    params: &AsteroidParams,
) -> Result<AsteroidInstance, MeshError> {
    let indices: &[IndexType] = &geosphere.mesh.indices;

    let positions = displace_positions(&geosphere.mesh.positions, seed, params);

    let mut normals = Vec::with_capacity(positions.len());
    compute_avg_normals(&positions, indices, &mut normals)?;

    let uvs = create_uv_map(&positions, params.uv_projection);

    let tangents = calculate_tangents(
        &AttributeView::packed(&positions),
        &AttributeView::packed(&normals),
        &AttributeView::packed(&uvs),
        indices,
    )?;

    let bounding_radius = positions.iter().map(|p| p.length()).fold(0.0, f32::max);

    debug!(
        id = seed.id,
        persistence = seed.persistence,
        noise_offset = seed.noise_offset,
        bounding_radius,
        "Displaced asteroid instance"
    );

    Ok(AsteroidInstance {
        seed: *seed,
        positions,
        normals,
        uvs,
        tangents,
        bounding_radius,
    })
}

/// A batch of asteroid instances sharing one geosphere.
#[derive(Clone, Debug)]
pub struct AsteroidSet {
    /// Base geometry; its index buffer is shared by every instance.
    pub geosphere: Geosphere,
    /// Level the instances are rendered at.
    pub level: usize,
    /// Instances in id order.
    pub instances: Vec<AsteroidInstance>,
}

impl AsteroidSet {
    /// Vertices in every instance (the whole combined pool).
    pub fn vertex_count_per_mesh(&self) -> usize {
        self.geosphere.vertex_count()
    }

    /// Index offsets of every level in the shared buffer.
    pub fn index_offsets(&self) -> &[u32] {
        &self.geosphere.index_offsets
    }

    /// The triangle list every instance is rendered with.
    pub fn shared_indices(&self) -> &[IndexType] {
        let range = self.geosphere.index_offsets[self.level] as usize
            ..self.geosphere.index_offsets[self.level + 1] as usize;
        &self.geosphere.mesh.indices[range]
    }
}

/// Generate `params.instance_count` asteroids, seeding from `rng`.
pub fn create_asteroids<R: Rng + ?Sized>(
    params: &AsteroidParams,
    rng: &mut R,
) -> Result<AsteroidSet, MeshError> {
    params.validate()?;

    let geosphere = create_geospheres(params.subdiv_levels)?;
    let seeds = draw_instance_seeds(rng, params)?;
    let instances = build_instances(&geosphere, &seeds, params)?;

    info!(
        instances = instances.len(),
        subdiv_levels = params.subdiv_levels,
        vertices_per_mesh = geosphere.vertex_count(),
        "Generated asteroid meshes"
    );

    Ok(AsteroidSet {
        level: params.subdiv_levels as usize,
        geosphere,
        instances,
    })
}

#[cfg(feature = "parallel")]
fn build_instances(
    geosphere: &Geosphere,
    seeds: &[InstanceSeed],
    params: &AsteroidParams,
) -> Result<Vec<AsteroidInstance>, MeshError> {
    use rayon::prelude::*;

    if params.parallel {
        seeds
            .par_iter()
            .map(|seed| build_instance(geosphere, seed, params))
            .collect()
    } else {
        seeds
            .iter()
            .map(|seed| build_instance(geosphere, seed, params))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn build_instances(
    geosphere: &Geosphere,
    seeds: &[InstanceSeed],
    params: &AsteroidParams,
) -> Result<Vec<AsteroidInstance>, MeshError> {
    if params.parallel {
        tracing::warn!("Parallel instance generation requested without the `parallel` feature");
    }
    seeds
        .iter()
        .map(|seed| build_instance(geosphere, seed, params))
        .collect()
}
