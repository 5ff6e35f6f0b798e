//! The 12-vertex, 20-face base solid every geosphere starts from.

use glam::Vec3;

use crate::mesh::{IndexType, Mesh};

/// Number of icosahedron vertices.
pub const ICOSAHEDRON_VERTEX_COUNT: usize = 12;

/// Number of icosahedron faces.
pub const ICOSAHEDRON_TRIANGLE_COUNT: usize = 20;

/// Face table, counter-clockwise seen from outside.
const ICOSAHEDRON_INDICES: [IndexType; ICOSAHEDRON_TRIANGLE_COUNT * 3] = [
    0, 11, 5, //
    0, 5, 1, //
    0, 1, 7, //
    0, 7, 10, //
    0, 10, 11, //
    1, 5, 9, //
    5, 11, 4, //
    11, 10, 2, //
    10, 7, 6, //
    7, 1, 8, //
    3, 9, 4, //
    3, 4, 2, //
    3, 2, 6, //
    3, 6, 8, //
    3, 8, 9, //
    4, 9, 5, //
    2, 4, 11, //
    6, 2, 10, //
    8, 6, 7, //
    9, 8, 1, //
];

/// Vertex positions on the unit sphere.
///
/// `a` and `b` are the golden-ratio rectangle half-extents scaled so that
/// `a^2 + b^2 == 1`.
fn icosahedron_positions() -> [Vec3; ICOSAHEDRON_VERTEX_COUNT] {
    let sqrt5 = 5.0_f32.sqrt();
    let a = (2.0 / (5.0 - sqrt5)).sqrt();
    let b = (2.0 / (5.0 + sqrt5)).sqrt();

    [
        Vec3::new(-b, a, 0.0),
        Vec3::new(b, a, 0.0),
        Vec3::new(-b, -a, 0.0),
        Vec3::new(b, -a, 0.0),
        Vec3::new(0.0, -b, a),
        Vec3::new(0.0, b, a),
        Vec3::new(0.0, -b, -a),
        Vec3::new(0.0, b, -a),
        Vec3::new(a, 0.0, -b),
        Vec3::new(a, 0.0, b),
        Vec3::new(-a, 0.0, -b),
        Vec3::new(-a, 0.0, b),
    ]
}

/// Replace the contents of `mesh` with a unit icosahedron.
///
/// Normals are zero placeholders sized to the vertex count; they carry no
/// meaning until a normal pass runs.
pub fn create_icosahedron(mesh: &mut Mesh) {
    mesh.clear();
    mesh.positions.extend_from_slice(&icosahedron_positions());
    mesh.indices.extend_from_slice(&ICOSAHEDRON_INDICES);
    mesh.normals.resize(mesh.positions.len(), Vec3::ZERO);
}

/// Build a fresh unit icosahedron.
pub fn icosahedron() -> Mesh {
    let mut mesh = Mesh::new();
    create_icosahedron(&mut mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::is_closed;

    #[test]
    fn test_counts() {
        let mesh = icosahedron();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.indices.len(), 60);
        assert_eq!(mesh.normals.len(), 12);
        assert!(mesh.validate_topology().is_ok());
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for p in icosahedron().positions {
            assert!((p.length() - 1.0).abs() < 1e-6, "length = {}", p.length());
        }
    }

    #[test]
    fn test_closed() {
        let mesh = icosahedron();
        assert!(is_closed(&mesh.indices));
    }

    #[test]
    fn test_faces_wind_outward() {
        let mesh = icosahedron();
        for tri in mesh.indices.chunks_exact(3) {
            let [p0, p1, p2] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(
                face_normal.dot(centroid) > 0.0,
                "triangle {tri:?} faces inward"
            );
        }
    }

    #[test]
    fn test_recreate_clears_previous_contents() {
        let mut mesh = icosahedron();
        mesh.positions.push(Vec3::ONE);
        create_icosahedron(&mut mesh);
        assert_eq!(mesh.vertex_count(), ICOSAHEDRON_VERTEX_COUNT);
    }
}
