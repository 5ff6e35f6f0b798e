//! Radial projection of a vertex pool onto a sphere.

use glam::Vec3;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Scale every position so its distance from the origin equals `radius`.
///
/// All positions are checked before any is modified: a zero-length vertex
/// yields [`MeshError::DegenerateVertex`] and leaves the slice untouched.
pub fn spherify_positions(positions: &mut [Vec3], radius: f32) -> Result<(), MeshError> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(MeshError::InvalidParameter {
            name: "radius",
            value: radius,
        });
    }
    if let Some(index) = positions.iter().position(|p| p.length_squared() == 0.0) {
        return Err(MeshError::DegenerateVertex { index });
    }

    for p in positions.iter_mut() {
        *p *= radius / p.length();
    }
    Ok(())
}

/// Project the vertices of `mesh` onto a sphere of the given radius.
pub fn spherify_in_place(mesh: &mut Mesh, radius: f32) -> Result<(), MeshError> {
    spherify_positions(&mut mesh.positions, radius)
}
