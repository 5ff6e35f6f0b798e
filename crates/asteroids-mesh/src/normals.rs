//! Area-weighted smooth vertex normals.

use glam::Vec3;
use tracing::debug;

use crate::error::MeshError;
use crate::mesh::{IndexType, Mesh, validate_triangle_list};

/// Recompute `normals` from the triangles in `indices`.
///
/// Each face contributes its unnormalized edge cross product, so larger
/// faces weigh more. `normals` is resized to match `positions` and zeroed
/// before accumulation.
///
/// A vertex that no triangle touches has nothing to average. It receives
/// its radial direction instead (or `+Y` at the origin) rather than a NaN.
pub fn compute_avg_normals(
    positions: &[Vec3],
    indices: &[IndexType],
    normals: &mut Vec<Vec3>,
) -> Result<(), MeshError> {
    validate_triangle_list(indices, positions.len())?;

    normals.clear();
    normals.resize(positions.len(), Vec3::ZERO);

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let u = positions[i1] - positions[i0];
        let v = positions[i2] - positions[i0];
        let face = u.cross(v);

        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }

    let mut isolated = 0usize;
    for (n, p) in normals.iter_mut().zip(positions) {
        *n = match n.try_normalize() {
            Some(unit) => unit,
            None => {
                isolated += 1;
                p.try_normalize().unwrap_or(Vec3::Y)
            }
        };
    }
    if isolated > 0 {
        debug!(isolated, "Vertices without incident area fell back to radial normals");
    }
    Ok(())
}

/// Recompute the normals of `mesh` from its own index list.
pub fn compute_avg_normals_in_place(mesh: &mut Mesh) -> Result<(), MeshError> {
    compute_avg_normals(&mesh.positions, &mesh.indices, &mut mesh.normals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geosphere::create_geospheres;

    #[test]
    fn test_flat_triangle_normal() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mut normals = Vec::new();
        compute_avg_normals(&positions, &[0, 1, 2], &mut normals).unwrap();
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_normals_point_outward_and_are_unit() {
        let geo = create_geospheres(3).unwrap();
        let mut normals = Vec::new();
        compute_avg_normals(&geo.mesh.positions, &geo.mesh.indices, &mut normals).unwrap();
        for (n, p) in normals.iter().zip(&geo.mesh.positions) {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(*p) > 0.9, "normal {n} not radial for {p}");
        }
    }

    #[test]
    fn test_stale_values_are_discarded() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let mut normals = vec![Vec3::splat(100.0); 3];
        compute_avg_normals(&positions, &[0, 1, 2], &mut normals).unwrap();
        assert!((normals[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_larger_face_dominates() {
        // Vertex 0 is shared by a large +Z face and a tiny +X face.
        let positions = [
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(0.0, 0.0, 0.1),
        ];
        let indices = [0, 1, 2, 0, 3, 4];
        let mut normals = Vec::new();
        compute_avg_normals(&positions, &indices, &mut normals).unwrap();
        assert!(normals[0].z > 0.99);
    }

    #[test]
    fn test_unreferenced_vertex_gets_radial_normal() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(0.0, 0.0, -3.0)];
        let mut normals = Vec::new();
        compute_avg_normals(&positions, &[0, 1, 2], &mut normals).unwrap();
        assert_eq!(normals[3], Vec3::NEG_Z);
        assert!(normals.iter().all(|n| n.is_finite()));
    }

    #[test]
    fn test_out_of_range_index_fails_fast() {
        let mut normals = Vec::new();
        let err = compute_avg_normals(&[Vec3::X], &[0, 0, 1], &mut normals).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 1, .. }));
    }
}
