//! GPU side of the asteroid meshes: device setup and buffer upload.

pub mod gpu;
pub mod gpu_asteroid_mesh;

pub use gpu::{GpuContext, GpuContextError};
pub use gpu_asteroid_mesh::{GpuAsteroidMesh, GpuMeshFactory};
