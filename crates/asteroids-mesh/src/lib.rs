//! Procedural asteroid meshes: geodesic spheres, per-instance noise
//! displacement, smooth normals, tangents and interleaved GPU packing.

pub mod asteroid;
pub mod error;
pub mod geosphere;
pub mod icosahedron;
pub mod mesh;
pub mod normals;
pub mod packer;
pub mod resource;
pub mod spherify;
pub mod subdivide;
pub mod surface_noise;
pub mod tangents;
pub mod topology;
pub mod uv;
pub mod vertex_format;

pub use asteroid::{
    AsteroidInstance, AsteroidParams, AsteroidRng, AsteroidSet, InstanceSeed, asteroid_rng,
    create_asteroids, draw_instance_seeds,
};
pub use error::MeshError;
pub use geosphere::{Geosphere, MAX_SUBDIV_LEVELS, create_geospheres};
pub use icosahedron::{create_icosahedron, icosahedron};
pub use mesh::{IndexType, Mesh};
pub use normals::compute_avg_normals;
pub use packer::{PackedAsteroidMesh, build_asteroid_meshes, pack_asteroids, pack_instance};
pub use resource::{MeshHandle, MeshLibrary, MeshResourceFactory};
pub use spherify::spherify_in_place;
pub use subdivide::subdivide_in_place;
pub use surface_noise::NoiseOctaves;
pub use tangents::{AttributeView, TangentFormat, TangentTarget, calculate_tangents};
pub use uv::UvProjection;
pub use vertex_format::{
    ASTEROID_VERTEX_ATTRIBUTES, ASTEROID_VERTEX_LAYOUT, AsteroidVertex,
    asteroid_vertex_buffer_layout,
};
