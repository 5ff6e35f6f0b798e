//! Per-vertex texture coordinates.

use glam::{Vec2, Vec3};

use crate::mesh::Mesh;

/// How positions are mapped to texture coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UvProjection {
    /// `uv = (x, y)` of the position.
    ///
    /// Cheap, but not seam-free: the texture is mirrored through the z = 0
    /// plane and stretched where the surface turns edge-on to it. A slowly
    /// tumbling distant rock hides both.
    #[default]
    Planar,
    /// Equirectangular longitude/latitude of the position direction.
    Spherical,
}

impl UvProjection {
    /// Project one position.
    pub fn project(self, p: Vec3) -> Vec2 {
        match self {
            UvProjection::Planar => Vec2::new(p.x, p.y),
            UvProjection::Spherical => {
                let d = p.normalize_or_zero();
                let u = 0.5 + d.z.atan2(d.x) / std::f32::consts::TAU;
                let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
                Vec2::new(u, v)
            }
        }
    }
}

/// Compute one UV per position.
pub fn create_uv_map(positions: &[Vec3], projection: UvProjection) -> Vec<Vec2> {
    positions.iter().map(|&p| projection.project(p)).collect()
}

/// Replace the UVs of `mesh` with a projection of its positions.
pub fn create_uv_map_in_place(mesh: &mut Mesh, projection: UvProjection) {
    mesh.uvs = create_uv_map(&mesh.positions, projection);
}
