//! Asteroid field layout and motion.
//!
//! Every generated mesh is shown once in a row in front of the camera. A
//! larger population reuses those meshes round-robin and is scattered
//! through a thick spherical shell around the origin, slowly orbiting +Y.
//! All asteroids tumble about a random axis.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use asteroids_config::FieldConfig;

const SPIN_SPEED_MIN: f32 = 0.005;
const SPIN_SPEED_RANGE: f32 = 0.005;
const ORBIT_SPEED_MIN: f32 = 0.0005;
const ORBIT_SPEED_RANGE: f32 = 0.0005;

/// Position and orientation of a placed asteroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Constant tumble about a fixed axis. `speed` is radians per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spinner {
    pub axis: Vec3,
    pub speed: f32,
}

impl Spinner {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let axis = random_unit_vector(rng);
        let speed = rng.random::<f32>() * SPIN_SPEED_RANGE + SPIN_SPEED_MIN;
        Self { axis, speed }
    }

    pub fn apply(&self, transform: &mut Transform) {
        transform.rotation =
            (Quat::from_axis_angle(self.axis, self.speed) * transform.rotation).normalize();
    }
}

/// Circular motion about the +Y axis through the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbiter {
    pub speed: f32,
}

impl Orbiter {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            speed: rng.random::<f32>() * ORBIT_SPEED_RANGE + ORBIT_SPEED_MIN,
        }
    }

    pub fn apply(&self, transform: &mut Transform) {
        transform.translation = Quat::from_rotation_y(self.speed) * transform.translation;
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Uniform point in the shell between radius `1 - thickness` and `1`.
///
/// The radius is drawn by volume, so the inner part of a thick shell is not
/// overpopulated. `thickness` is clamped to `[0, 1]`.
pub fn point_in_sphere_shell<R: Rng + ?Sized>(rng: &mut R, thickness: f32) -> Vec3 {
    let inner = 1.0 - thickness.clamp(0.0, 1.0);
    let inner_cubed = inner * inner * inner;
    let u = rng.random::<f32>();
    let radius = (inner_cubed + u * (1.0 - inner_cubed)).cbrt();
    random_unit_vector(rng) * radius
}

/// One asteroid in the field.
#[derive(Clone, Debug)]
pub struct FieldNode<H> {
    pub mesh: H,
    pub transform: Transform,
    pub spinner: Spinner,
    pub orbiter: Option<Orbiter>,
}

/// Receives placed asteroids; stands in for a scene graph.
pub trait SceneSink<H> {
    /// Create a node and return its index.
    fn spawn(&mut self, mesh: H, transform: Transform) -> usize;

    fn set_transform(&mut self, node: usize, transform: Transform);
}

/// Scene sink that only records what it is told.
#[derive(Debug)]
pub struct HeadlessScene<H> {
    pub nodes: Vec<(H, Transform)>,
    pub updates: u64,
}

impl<H> Default for HeadlessScene<H> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            updates: 0,
        }
    }
}

impl<H> SceneSink<H> for HeadlessScene<H> {
    fn spawn(&mut self, mesh: H, transform: Transform) -> usize {
        self.nodes.push((mesh, transform));
        self.nodes.len() - 1
    }

    fn set_transform(&mut self, node: usize, transform: Transform) {
        if let Some(slot) = self.nodes.get_mut(node) {
            slot.1 = transform;
            self.updates += 1;
        }
    }
}

/// Summary of a field's current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub row: usize,
    pub revolving: usize,
    pub ticks: u64,
    pub min_orbit_radius: f32,
    pub max_orbit_radius: f32,
}

/// All placed asteroids plus their scene node indices.
pub struct AsteroidField<H> {
    nodes: Vec<FieldNode<H>>,
    scene_ids: Vec<usize>,
    row_len: usize,
    ticks: u64,
}

impl<H: Clone> AsteroidField<H> {
    /// Lay out the row and the revolving shell for `meshes`.
    pub fn layout(meshes: &[H], config: &FieldConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.layout_seed);
        let mut nodes = Vec::with_capacity(meshes.len() + config.revolving_count as usize);

        for (i, mesh) in meshes.iter().enumerate() {
            let translation = Vec3::new(
                i as f32 * config.row_spacing,
                config.row_height,
                config.row_depth,
            );
            nodes.push(FieldNode {
                mesh: mesh.clone(),
                transform: Transform::from_translation(translation),
                spinner: Spinner::random(&mut rng),
                orbiter: None,
            });
        }

        if meshes.is_empty() && config.revolving_count > 0 {
            warn!(
                revolving = config.revolving_count,
                "No meshes to populate the revolving shell"
            );
        } else {
            for i in 0..config.revolving_count as usize {
                let translation =
                    point_in_sphere_shell(&mut rng, config.shell_thickness) * config.field_radius;
                nodes.push(FieldNode {
                    mesh: meshes[i % meshes.len()].clone(),
                    transform: Transform::from_translation(translation),
                    spinner: Spinner::random(&mut rng),
                    orbiter: Some(Orbiter::random(&mut rng)),
                });
            }
        }

        debug!(nodes = nodes.len(), "Laid out asteroid field");
        Self {
            nodes,
            scene_ids: Vec::new(),
            row_len: meshes.len(),
            ticks: 0,
        }
    }

    /// Hand every node to `scene`.
    pub fn spawn_into<S: SceneSink<H>>(&mut self, scene: &mut S) {
        self.scene_ids = self
            .nodes
            .iter()
            .map(|node| scene.spawn(node.mesh.clone(), node.transform))
            .collect();
    }

    /// Advance every spinner and orbiter by one fixed tick.
    pub fn tick(&mut self) {
        for node in &mut self.nodes {
            node.spinner.apply(&mut node.transform);
            if let Some(orbiter) = node.orbiter {
                orbiter.apply(&mut node.transform);
            }
        }
        self.ticks += 1;
    }

    /// Push current transforms to `scene`.
    pub fn sync<S: SceneSink<H>>(&self, scene: &mut S) {
        for (node, &id) in self.nodes.iter().zip(&self.scene_ids) {
            scene.set_transform(id, node.transform);
        }
    }

    pub fn nodes(&self) -> &[FieldNode<H>] {
        &self.nodes
    }

    pub fn stats(&self) -> FieldStats {
        let radii = self.nodes[self.row_len..]
            .iter()
            .map(|n| n.transform.translation.length());
        let (min, max) = radii.fold((f32::INFINITY, 0.0f32), |(lo, hi), r| (lo.min(r), hi.max(r)));
        FieldStats {
            row: self.row_len,
            revolving: self.nodes.len() - self.row_len,
            ticks: self.ticks,
            min_orbit_radius: if min.is_finite() { min } else { 0.0 },
            max_orbit_radius: max,
        }
    }
}

/// Place the field, spawn it, run `ticks` updates and log the outcome.
pub fn run_field<H: Clone, S: SceneSink<H>>(
    meshes: &[H],
    config: &FieldConfig,
    scene: &mut S,
    ticks: u32,
) -> FieldStats {
    let mut field = AsteroidField::layout(meshes, config);
    field.spawn_into(scene);
    for _ in 0..ticks {
        field.tick();
        field.sync(scene);
    }

    let stats = field.stats();
    info!(
        row = stats.row,
        revolving = stats.revolving,
        ticks = stats.ticks,
        min_orbit_radius = stats.min_orbit_radius,
        max_orbit_radius = stats.max_orbit_radius,
        "Asteroid field simulated"
    );
    stats
}
