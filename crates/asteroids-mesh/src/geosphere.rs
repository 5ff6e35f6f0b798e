//! Geodesic spheres at every subdivision level, stored in one shared buffer.
//!
//! Level 0 is the bare icosahedron; level `i + 1` is level `i` subdivided
//! once. Every level keeps its own vertices, appended after the previous
//! levels, and its triangle list is rebased onto the combined vertex pool.
//! A caller picks a level of detail by slicing the shared index buffer with
//! [`Geosphere::level_indices`].

use std::ops::Range;

use tracing::debug;

use crate::error::MeshError;
use crate::icosahedron::create_icosahedron;
use crate::mesh::{IndexType, Mesh};
use crate::spherify::spherify_in_place;
use crate::subdivide::subdivide_in_place;

/// Highest subdivision level accepted by [`create_geospheres`].
///
/// Every instance copies the whole combined pool, which is already ~14M
/// vertices at level 10; multiplied by the instance count, deeper levels
/// exhaust memory long before they could be rendered.
pub const MAX_SUBDIV_LEVELS: u32 = 10;

/// Every subdivision level of a unit geosphere packed into one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Geosphere {
    /// Combined vertices and indices of all levels.
    pub mesh: Mesh,
    /// `subdiv_levels + 2` entries; level `i` owns indices
    /// `index_offsets[i]..index_offsets[i + 1]`.
    pub index_offsets: Vec<u32>,
    /// `subdiv_levels + 2` entries; level `i` owns vertices
    /// `vertex_offsets[i]..vertex_offsets[i + 1]`.
    pub vertex_offsets: Vec<u32>,
}

impl Geosphere {
    /// Number of stored levels, including the base icosahedron.
    pub fn level_count(&self) -> usize {
        self.index_offsets.len() - 1
    }

    /// Finest stored subdivision level.
    pub fn max_level(&self) -> usize {
        self.level_count() - 1
    }

    /// Total vertex count of the combined pool.
    pub fn vertex_count(&self) -> usize {
        self.mesh.positions.len()
    }

    fn check_level(&self, level: usize) -> Result<(), MeshError> {
        if level < self.level_count() {
            Ok(())
        } else {
            Err(MeshError::InvalidLevel {
                level,
                level_count: self.level_count(),
            })
        }
    }

    /// Range of the shared index buffer holding `level`'s triangle list.
    pub fn level_index_range(&self, level: usize) -> Result<Range<usize>, MeshError> {
        self.check_level(level)?;
        Ok(self.index_offsets[level] as usize..self.index_offsets[level + 1] as usize)
    }

    /// Range of the combined vertex pool that `level` references.
    pub fn level_vertex_range(&self, level: usize) -> Result<Range<usize>, MeshError> {
        self.check_level(level)?;
        Ok(self.vertex_offsets[level] as usize..self.vertex_offsets[level + 1] as usize)
    }

    /// The triangle list of `level`, indexing the combined vertex pool.
    pub fn level_indices(&self, level: usize) -> Result<&[IndexType], MeshError> {
        let range = self.level_index_range(level)?;
        Ok(&self.mesh.indices[range])
    }
}

/// Build a unit geosphere holding levels `0..=subdiv_levels`.
pub fn create_geospheres(subdiv_levels: u32) -> Result<Geosphere, MeshError> {
    if subdiv_levels > MAX_SUBDIV_LEVELS {
        return Err(MeshError::InvalidParameter {
            name: "subdiv_levels",
            value: subdiv_levels as f32,
        });
    }

    let mut level = Mesh::new();
    create_icosahedron(&mut level);

    let mut combined = level.clone();
    let mut index_offsets = Vec::with_capacity(subdiv_levels as usize + 2);
    let mut vertex_offsets = Vec::with_capacity(subdiv_levels as usize + 2);
    index_offsets.push(0);
    vertex_offsets.push(0);

    for _ in 0..subdiv_levels {
        index_offsets.push(combined.indices.len() as u32);
        vertex_offsets.push(combined.positions.len() as u32);

        subdivide_in_place(&mut level)?;

        // Rebase so every level indexes the combined pool directly.
        let base_vertex = combined.positions.len() as IndexType;
        combined.positions.extend_from_slice(&level.positions);
        combined
            .indices
            .extend(level.indices.iter().map(|&i| i + base_vertex));
    }
    index_offsets.push(combined.indices.len() as u32);
    vertex_offsets.push(combined.positions.len() as u32);

    spherify_in_place(&mut combined, 1.0)?;
    combined.normals = combined.positions.clone();

    debug!(
        subdiv_levels,
        vertices = combined.positions.len(),
        indices = combined.indices.len(),
        "Built geosphere levels"
    );

    Ok(Geosphere {
        mesh: combined,
        index_offsets,
        vertex_offsets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::is_closed;

    #[test]
    fn test_level_zero_only() {
        let geo = create_geospheres(0).unwrap();
        assert_eq!(geo.index_offsets, vec![0, 60]);
        assert_eq!(geo.vertex_offsets, vec![0, 12]);
        assert_eq!(geo.level_count(), 1);
    }

    #[test]
    fn test_offsets_for_three_levels() {
        let geo = create_geospheres(3).unwrap();
        assert_eq!(geo.index_offsets.len(), 5);
        assert_eq!(geo.index_offsets[0], 0);
        assert_eq!(geo.index_offsets, vec![0, 60, 300, 1260, 5100]);
        assert_eq!(geo.vertex_offsets, vec![0, 12, 54, 216, 858]);
        assert_eq!(geo.vertex_count(), 858);
    }

    #[test]
    fn test_offsets_strictly_increase() {
        let geo = create_geospheres(4).unwrap();
        for w in geo.index_offsets.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn test_each_level_is_closed_and_local() {
        let geo = create_geospheres(3).unwrap();
        for level in 0..geo.level_count() {
            let indices = geo.level_indices(level).unwrap();
            assert!(is_closed(indices), "level {level} is not watertight");

            let vertices = geo.level_vertex_range(level).unwrap();
            for &i in indices {
                assert!(vertices.contains(&(i as usize)));
            }
        }
    }

    #[test]
    fn test_level_triangle_counts() {
        let geo = create_geospheres(3).unwrap();
        for level in 0..=3 {
            let tris = geo.level_indices(level).unwrap().len() / 3;
            assert_eq!(tris, 20 * 4usize.pow(level as u32));
        }
    }

    #[test]
    fn test_all_vertices_on_unit_sphere() {
        let geo = create_geospheres(3).unwrap();
        for (p, n) in geo.mesh.positions.iter().zip(&geo.mesh.normals) {
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert!((*p - *n).length() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_level_request() {
        let geo = create_geospheres(2).unwrap();
        assert_eq!(
            geo.level_indices(3).unwrap_err(),
            MeshError::InvalidLevel {
                level: 3,
                level_count: 3
            }
        );
    }

    #[test]
    fn test_too_many_levels_rejected() {
        assert!(create_geospheres(MAX_SUBDIV_LEVELS + 1).is_err());
    }
}
