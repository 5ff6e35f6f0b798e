//! GPU-resident asteroid mesh.
//!
//! [`GpuAsteroidMesh`] wraps the buffers produced by uploading a
//! [`PackedAsteroidMesh`] and keeps what an indexed draw needs.
//! [`GpuMeshFactory`] plugs the upload into the generator's
//! [`MeshResourceFactory`] hand-off.

use asteroids_mesh::{MeshResourceFactory, PackedAsteroidMesh};
use wgpu::util::DeviceExt;

/// An asteroid mesh that has been uploaded to the GPU.
pub struct GpuAsteroidMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Number of indices (used in `draw_indexed`).
    pub index_count: u32,
    pub vertex_count: u32,
    /// Radius of the origin-centred sphere enclosing every vertex.
    pub bounding_radius: f32,
    pub instance_id: u32,
    vertex_buffer_size: u64,
    index_buffer_size: u64,
}

impl GpuAsteroidMesh {
    /// Upload a [`PackedAsteroidMesh`], creating new buffers.
    pub fn upload(device: &wgpu::Device, mesh: &PackedAsteroidMesh) -> Self {
        let vertex_bytes = mesh.vertex_bytes();
        let index_bytes = mesh.index_bytes();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("asteroid_vertex_buffer"),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("asteroid_index_buffer"),
            contents: index_bytes,
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
            vertex_count: mesh.vertex_count() as u32,
            bounding_radius: mesh.bounding_radius,
            instance_id: mesh.instance_id,
            vertex_buffer_size: vertex_bytes.len() as u64,
            index_buffer_size: index_bytes.len() as u64,
        }
    }

    /// Total GPU memory consumed by this mesh's buffers in bytes.
    pub fn total_gpu_bytes(&self) -> u64 {
        self.vertex_buffer_size + self.index_buffer_size
    }

    pub fn vertex_buffer_size(&self) -> u64 {
        self.vertex_buffer_size
    }

    pub fn index_buffer_size(&self) -> u64 {
        self.index_buffer_size
    }

    /// Bind this mesh's buffers to a render pass.
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Issue an indexed draw call for this mesh.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Uploads every mesh it is handed and keeps the GPU copies.
pub struct GpuMeshFactory<'a> {
    device: &'a wgpu::Device,
    meshes: Vec<GpuAsteroidMesh>,
}

impl<'a> GpuMeshFactory<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            meshes: Vec::new(),
        }
    }

    pub fn meshes(&self) -> &[GpuAsteroidMesh] {
        &self.meshes
    }

    pub fn into_meshes(self) -> Vec<GpuAsteroidMesh> {
        self.meshes
    }

    pub fn total_gpu_bytes(&self) -> u64 {
        self.meshes.iter().map(GpuAsteroidMesh::total_gpu_bytes).sum()
    }
}

impl MeshResourceFactory for GpuMeshFactory<'_> {
    /// Index into [`GpuMeshFactory::meshes`].
    type Handle = usize;

    fn create_mesh(&mut self, mesh: PackedAsteroidMesh) -> usize {
        let gpu_mesh = GpuAsteroidMesh::upload(self.device, &mesh);
        log::debug!(
            "Uploaded asteroid {} ({} bytes)",
            gpu_mesh.instance_id,
            gpu_mesh.total_gpu_bytes()
        );
        self.meshes.push(gpu_mesh);
        self.meshes.len() - 1
    }
}
