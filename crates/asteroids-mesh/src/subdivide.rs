//! 1-to-4 triangle subdivision with shared edge midpoints.

use rustc_hash::FxHashMap;

use crate::error::MeshError;
use crate::mesh::{IndexType, Mesh, check_len};
use crate::topology::Edge;

/// Maps a canonical edge to the vertex created at its midpoint.
pub type MidpointMap = FxHashMap<Edge, IndexType>;

/// Return the midpoint vertex of `edge`, appending it to `mesh` the first
/// time the edge is seen.
fn edge_midpoint(mesh: &mut Mesh, midpoints: &mut MidpointMap, edge: Edge) -> IndexType {
    if let Some(&index) = midpoints.get(&edge) {
        return index;
    }

    let (i0, i1) = (edge.v0 as usize, edge.v1 as usize);
    let index = mesh.positions.len() as IndexType;
    let midpoint = (mesh.positions[i0] + mesh.positions[i1]) * 0.5;
    mesh.positions.push(midpoint);
    if !mesh.uvs.is_empty() {
        let uv = (mesh.uvs[i0] + mesh.uvs[i1]) * 0.5;
        mesh.uvs.push(uv);
    }
    midpoints.insert(edge, index);
    index
}

/// Split every triangle of `mesh` into four, in place.
///
/// One new vertex is appended per distinct edge, so a mesh with `V`
/// vertices, `E` edges and `F` faces ends up with `V + E` vertices and `4F`
/// faces. Normals are resized with zero placeholders and tangents are
/// discarded, since neither is valid for the new topology.
pub fn subdivide_in_place(mesh: &mut Mesh) -> Result<(), MeshError> {
    mesh.validate_topology()?;
    if !mesh.uvs.is_empty() {
        check_len("uvs", mesh.positions.len(), mesh.uvs.len())?;
    }

    let mut midpoints = MidpointMap::default();
    let mut new_indices = Vec::with_capacity(mesh.indices.len() * 4);
    mesh.positions.reserve(mesh.positions.len() * 2);

    let indices = std::mem::take(&mut mesh.indices);
    for tri in indices.chunks_exact(3) {
        let (v0, v1, v2) = (tri[0], tri[1], tri[2]);

        let m01 = edge_midpoint(mesh, &mut midpoints, Edge::new(v0, v1));
        let m12 = edge_midpoint(mesh, &mut midpoints, Edge::new(v1, v2));
        let m20 = edge_midpoint(mesh, &mut midpoints, Edge::new(v2, v0));

        new_indices.extend_from_slice(&[
            v0, m01, m20, //
            m01, v1, m12, //
            m01, m12, m20, //
            m20, m12, v2, //
        ]);
    }

    mesh.indices = new_indices;
    mesh.normals.resize(mesh.positions.len(), glam::Vec3::ZERO);
    mesh.tangents.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icosahedron::icosahedron;
    use crate::topology::{distinct_edge_count, is_closed};
    use glam::{Vec2, Vec3};

    #[test]
    fn test_single_subdivision_counts() {
        let mut mesh = icosahedron();
        subdivide_in_place(&mut mesh).unwrap();
        assert_eq!(mesh.vertex_count(), 42);
        assert_eq!(mesh.triangle_count(), 80);
        assert_eq!(mesh.normals.len(), 42);
    }

    #[test]
    fn test_double_subdivision_counts() {
        let mut mesh = icosahedron();
        subdivide_in_place(&mut mesh).unwrap();
        subdivide_in_place(&mut mesh).unwrap();
        assert_eq!(mesh.vertex_count(), 162);
        assert_eq!(mesh.triangle_count(), 320);
    }

    #[test]
    fn test_vertex_growth_equals_edge_count() {
        let mut mesh = icosahedron();
        for _ in 0..3 {
            let v = mesh.vertex_count();
            let e = distinct_edge_count(&mesh.indices);
            let f = mesh.triangle_count();
            subdivide_in_place(&mut mesh).unwrap();
            assert_eq!(mesh.vertex_count(), v + e);
            assert_eq!(mesh.triangle_count(), 4 * f);
        }
    }

    #[test]
    fn test_subdivided_mesh_stays_closed() {
        let mut mesh = icosahedron();
        for _ in 0..4 {
            subdivide_in_place(&mut mesh).unwrap();
            assert!(is_closed(&mesh.indices));
        }
    }

    #[test]
    fn test_midpoint_is_average_of_endpoints() {
        let mut mesh = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X * 2.0, Vec3::Y * 2.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        subdivide_in_place(&mut mesh).unwrap();
        assert_eq!(mesh.positions[3], Vec3::X);
        assert_eq!(mesh.positions[4], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.positions[5], Vec3::Y);
        assert_eq!(
            &mesh.indices[..],
            &[0, 3, 5, 3, 1, 4, 3, 4, 5, 5, 4, 2]
        );
    }

    #[test]
    fn test_uvs_follow_midpoints() {
        let mut mesh = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        subdivide_in_place(&mut mesh).unwrap();
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert_eq!(mesh.uvs[3], Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let mut mesh = Mesh {
            positions: vec![Vec3::X, Vec3::Y],
            indices: vec![0, 1],
            ..Default::default()
        };
        assert_eq!(
            subdivide_in_place(&mut mesh).unwrap_err(),
            MeshError::InvalidTopology { index_count: 2 }
        );
    }
}
