//! Vertex pool and triangle-list container shared by every generation stage.

use glam::{Vec2, Vec3, Vec4};

use crate::error::MeshError;

/// Index type used by every triangle list in this crate.
pub type IndexType = u32;

/// A triangle-list mesh with index-aligned attribute arrays.
///
/// `positions`, `normals` and `uvs` have the same length once the mesh is
/// fully built. `tangents` stays empty until the tangent pass has run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex normals, index-aligned with `positions`.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, index-aligned with `positions`.
    pub uvs: Vec<Vec2>,
    /// Tangents (xyz + handedness sign), empty before the tangent pass.
    pub tangents: Vec<Vec4>,
    /// Flat triangle list into the vertex pool.
    pub indices: Vec<IndexType>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all vertex and index data, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.tangents.clear();
        self.indices.clear();
    }

    /// Number of vertices in the pool.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the index list.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the index list is a valid triangle list over this pool.
    pub fn validate_topology(&self) -> Result<(), MeshError> {
        validate_triangle_list(&self.indices, self.positions.len())
    }

    /// Checks that every populated attribute array matches the position count.
    ///
    /// An empty `tangents` array is accepted because tangents are produced
    /// by a later pass.
    pub fn validate_attributes(&self) -> Result<(), MeshError> {
        let expected = self.positions.len();
        check_len("normals", expected, self.normals.len())?;
        check_len("uvs", expected, self.uvs.len())?;
        if !self.tangents.is_empty() {
            check_len("tangents", expected, self.tangents.len())?;
        }
        Ok(())
    }
}

/// Verify that `indices` is a triangle list whose every entry is below `vertex_count`.
pub fn validate_triangle_list(indices: &[IndexType], vertex_count: usize) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::InvalidTopology {
            index_count: indices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MeshError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(())
}

pub(crate) fn check_len(
    attribute: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), MeshError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MeshError::ParameterMismatch {
            attribute,
            expected,
            actual,
        })
    }
}
