//! Interleaving per-instance attributes into GPU-ready meshes.

use std::mem;

use rand::Rng;
use tracing::{debug, info};

use crate::asteroid::{AsteroidInstance, AsteroidParams, AsteroidSet, create_asteroids};
use crate::error::MeshError;
use crate::mesh::{IndexType, check_len, validate_triangle_list};
use crate::resource::MeshResourceFactory;
use crate::tangents::{AttributeView, calculate_tangents, write_tangents};
use crate::vertex_format::{
    AsteroidVertex, NORMAL_OFFSET, POSITION_OFFSET, TANGENT_TARGET, UV_OFFSET, VERTEX_STRIDE,
};

/// One asteroid ready for upload: interleaved vertices plus a triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackedAsteroidMesh {
    pub instance_id: u32,
    /// Subdivision level the index list was sliced from.
    pub level: usize,
    pub vertices: Vec<AsteroidVertex>,
    pub indices: Vec<u32>,
    pub bounding_radius: f32,
}

impl PackedAsteroidMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_buffer_bytes(&self) -> usize {
        self.vertices.len() * mem::size_of::<AsteroidVertex>()
    }

    pub fn index_buffer_bytes(&self) -> usize {
        self.indices.len() * mem::size_of::<u32>()
    }

    /// Vertex data as bytes for GPU upload (zero-copy).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes for GPU upload (zero-copy).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Recompute the tangent slot of every vertex from the interleaved
    /// positions, normals and UVs, using this mesh's own triangles.
    ///
    /// Vertices the triangle list does not reference get an arbitrary
    /// tangent orthogonal to their normal.
    pub fn regenerate_tangents(&mut self) -> Result<(), MeshError> {
        let count = self.vertices.len();
        let tangents = {
            let bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
            calculate_tangents(
                &AttributeView::new(bytes, POSITION_OFFSET, VERTEX_STRIDE, 12, count)?,
                &AttributeView::new(bytes, NORMAL_OFFSET, VERTEX_STRIDE, 12, count)?,
                &AttributeView::new(bytes, UV_OFFSET, VERTEX_STRIDE, 8, count)?,
                &self.indices,
            )?
        };
        write_tangents(
            bytemuck::cast_slice_mut(&mut self.vertices),
            TANGENT_TARGET,
            &tangents,
        )
    }
}

/// Interleave `instance` and attach a copy of `indices`.
///
/// Attribute lengths and the index list are checked before anything is
/// copied.
pub fn pack_instance(
    instance: &AsteroidInstance,
    level: usize,
    indices: &[IndexType],
) -> Result<PackedAsteroidMesh, MeshError> {
    let count = instance.positions.len();
    check_len("normals", count, instance.normals.len())?;
    check_len("uvs", count, instance.uvs.len())?;
    check_len("tangents", count, instance.tangents.len())?;
    validate_triangle_list(indices, count)?;

    let vertices = instance
        .positions
        .iter()
        .zip(&instance.normals)
        .zip(&instance.tangents)
        .zip(&instance.uvs)
        .map(|(((&p, &n), &t), &uv)| AsteroidVertex::new(p, n, t, uv))
        .collect();

    Ok(PackedAsteroidMesh {
        instance_id: instance.id(),
        level,
        vertices,
        indices: indices.to_vec(),
        bounding_radius: instance.bounding_radius,
    })
}

/// Pack every instance of `set` at the set's level.
pub fn pack_asteroids(set: &AsteroidSet) -> Result<Vec<PackedAsteroidMesh>, MeshError> {
    let indices = set.shared_indices();
    let packed = set
        .instances
        .iter()
        .map(|instance| pack_instance(instance, set.level, indices))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        meshes = packed.len(),
        vertices_per_mesh = set.vertex_count_per_mesh(),
        indices_per_mesh = indices.len(),
        "Packed asteroid meshes"
    );
    Ok(packed)
}

/// Run the whole pipeline and hand every mesh to `factory`.
///
/// Nothing reaches the factory unless generation and packing of every
/// instance succeeded.
pub fn build_asteroid_meshes<R, F>(
    params: &AsteroidParams,
    rng: &mut R,
    factory: &mut F,
) -> Result<Vec<F::Handle>, MeshError>
where
    R: Rng + ?Sized,
    F: MeshResourceFactory,
{
    let set = create_asteroids(params, rng)?;
    let packed = pack_asteroids(&set)?;
    let bytes: usize = packed
        .iter()
        .map(|m| m.vertex_buffer_bytes() + m.index_buffer_bytes())
        .sum();

    let handles: Vec<_> = packed.into_iter().map(|m| factory.create_mesh(m)).collect();
    info!(meshes = handles.len(), bytes, "Created asteroid mesh resources");
    Ok(handles)
}
