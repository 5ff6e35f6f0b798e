//! Per-vertex tangent frames for normal-mapped shading.
//!
//! Attributes are read through [`AttributeView`], which addresses one
//! attribute inside a byte buffer by offset and stride. The same code
//! therefore runs on tightly packed arrays (`stride == element size`) and on
//! interleaved GPU vertex buffers where position, normal, tangent and UV sit
//! side by side in every vertex.
//!
//! Per triangle the tangent and bitangent come from the UV-to-position
//! Jacobian and are summed unnormalized into the three corner vertices, so
//! larger faces weigh more. Each vertex tangent is then orthogonalized against its normal,
//! and `w` records whether `cross(normal, tangent)` agrees with the averaged
//! bitangent (+1) or opposes it (-1).

use std::mem::size_of;

use glam::{Vec2, Vec3, Vec4};

use crate::error::MeshError;
use crate::mesh::{IndexType, Mesh, check_len, validate_triangle_list};

/// UV-space triangles with a smaller absolute determinant are skipped.
const MIN_UV_DETERMINANT: f32 = 1e-12;

/// Read-only view of one `f32`-vector attribute inside a byte buffer.
#[derive(Clone, Copy, Debug)]
pub struct AttributeView<'a> {
    bytes: &'a [u8],
    offset: usize,
    stride: usize,
    element_size: usize,
    len: usize,
}

impl<'a> AttributeView<'a> {
    /// View `vertex_count` elements of `element_size` bytes starting at
    /// `offset`, `stride` bytes apart.
    pub fn new(
        bytes: &'a [u8],
        offset: usize,
        stride: usize,
        element_size: usize,
        vertex_count: usize,
    ) -> Result<Self, MeshError> {
        let invalid = || MeshError::InvalidStride {
            offset,
            element_size,
            stride,
            vertex_count,
            buffer_len: bytes.len(),
        };
        if vertex_count > 0 {
            if stride < element_size && vertex_count > 1 {
                return Err(invalid());
            }
            let end = (vertex_count - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(offset))
                .and_then(|n| n.checked_add(element_size))
                .ok_or_else(invalid)?;
            if end > bytes.len() {
                return Err(invalid());
            }
        }
        Ok(Self {
            bytes,
            offset,
            stride,
            element_size,
            len: vertex_count,
        })
    }

    /// View a tightly packed slice of POD vectors.
    pub fn packed<T: bytemuck::Pod>(items: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(items),
            offset: 0,
            stride: size_of::<T>(),
            element_size: size_of::<T>(),
            len: items.len(),
        }
    }

    /// Narrow the view to `count` elements starting at element `first`.
    pub fn subrange(&self, first: usize, count: usize) -> Result<Self, MeshError> {
        let offset = self.offset + first * self.stride;
        if first + count > self.len {
            return Err(MeshError::InvalidStride {
                offset,
                element_size: self.element_size,
                stride: self.stride,
                vertex_count: count,
                buffer_len: self.bytes.len(),
            });
        }
        Ok(Self {
            offset,
            len: count,
            ..*self
        })
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per element.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Fail unless every element holds at least `components` floats.
    fn require_components(&self, components: usize) -> Result<(), MeshError> {
        if self.element_size >= components * size_of::<f32>() {
            Ok(())
        } else {
            Err(MeshError::InvalidStride {
                offset: self.offset,
                element_size: self.element_size,
                stride: self.stride,
                vertex_count: self.len,
                buffer_len: self.bytes.len(),
            })
        }
    }

    fn read<const N: usize>(&self, index: usize) -> [f32; N] {
        debug_assert!(N * size_of::<f32>() <= self.element_size);
        let start = self.offset + index * self.stride;
        bytemuck::pod_read_unaligned(&self.bytes[start..start + N * size_of::<f32>()])
    }

    /// Read element `index` as a 3-vector.
    pub fn vec3(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.read::<3>(index))
    }

    /// Read element `index` as a 2-vector.
    pub fn vec2(&self, index: usize) -> Vec2 {
        Vec2::from_array(self.read::<2>(index))
    }
}

/// How many tangent components a destination slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TangentFormat {
    /// Direction only; the handedness sign is dropped.
    Xyz,
    /// Direction plus handedness sign in `w`.
    Xyzw,
}

impl TangentFormat {
    /// Size of one stored tangent in bytes.
    pub fn size(self) -> usize {
        match self {
            TangentFormat::Xyz => 3 * size_of::<f32>(),
            TangentFormat::Xyzw => 4 * size_of::<f32>(),
        }
    }
}

/// Where tangents go inside an interleaved vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TangentTarget {
    /// Byte offset of the tangent inside one vertex.
    pub offset: usize,
    /// Distance between consecutive vertices in bytes.
    pub stride: usize,
    /// Components stored per vertex.
    pub format: TangentFormat,
}

/// Compute one tangent per vertex of the views.
///
/// `indices` address the views directly, so a sub-range of a larger shared
/// buffer is handled by narrowing the views with [`AttributeView::subrange`]
/// and slicing the index list.
///
/// Vertices that no usable triangle touches (unreferenced, or only in
/// triangles that are degenerate in UV space) get an arbitrary unit tangent
/// orthogonal to their normal and `w = +1`.
pub fn calculate_tangents(
    positions: &AttributeView<'_>,
    normals: &AttributeView<'_>,
    uvs: &AttributeView<'_>,
    indices: &[IndexType],
) -> Result<Vec<Vec4>, MeshError> {
    positions.require_components(3)?;
    normals.require_components(3)?;
    uvs.require_components(2)?;
    let vertex_count = positions.len();
    check_len("normals", vertex_count, normals.len())?;
    check_len("uvs", vertex_count, uvs.len())?;
    validate_triangle_list(indices, vertex_count)?;

    let mut tangents = vec![Vec3::ZERO; vertex_count];
    let mut bitangents = vec![Vec3::ZERO; vertex_count];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let p0 = positions.vec3(i0);
        let e1 = positions.vec3(i1) - p0;
        let e2 = positions.vec3(i2) - p0;

        let w0 = uvs.vec2(i0);
        let d1 = uvs.vec2(i1) - w0;
        let d2 = uvs.vec2(i2) - w0;

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < MIN_UV_DETERMINANT {
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * d2.y - e2 * d1.y) * r;
        let b = (e2 * d1.x - e1 * d2.x) * r;
        if !(t.is_finite() && b.is_finite()) {
            continue;
        }

        for i in [i0, i1, i2] {
            tangents[i] += t;
            bitangents[i] += b;
        }
    }

    let packed = (0..vertex_count)
        .map(|i| {
            let n = normals.vec3(i).try_normalize().unwrap_or(Vec3::Y);
            let t = tangents[i];
            match (t - n * n.dot(t)).try_normalize() {
                Some(tangent) => {
                    let sign = if n.cross(tangent).dot(bitangents[i]) > 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    tangent.extend(sign)
                }
                None => n.any_orthonormal_vector().extend(1.0),
            }
        })
        .collect();
    Ok(packed)
}

/// Write `tangents` into the tangent slot of an interleaved buffer.
///
/// Only `target.format.size()` bytes per vertex are touched, so a 3-float
/// slot never spills into the attribute that follows it.
pub fn write_tangents(
    bytes: &mut [u8],
    target: TangentTarget,
    tangents: &[Vec4],
) -> Result<(), MeshError> {
    let size = target.format.size();
    AttributeView::new(bytes, target.offset, target.stride, size, tangents.len())?;

    for (i, t) in tangents.iter().enumerate() {
        let start = target.offset + i * target.stride;
        let dst = &mut bytes[start..start + size];
        match target.format {
            TangentFormat::Xyz => dst.copy_from_slice(bytemuck::bytes_of(&t.truncate().to_array())),
            TangentFormat::Xyzw => dst.copy_from_slice(bytemuck::bytes_of(&t.to_array())),
        }
    }
    Ok(())
}

/// Generate tangents for `mesh` from its positions, normals and UVs.
///
/// `indices` selects the triangles to use; `None` uses the mesh's own list.
pub fn generate_tangents_in_place(
    mesh: &mut Mesh,
    indices: Option<&[IndexType]>,
) -> Result<(), MeshError> {
    let indices = indices.unwrap_or(&mesh.indices);
    let tangents = calculate_tangents(
        &AttributeView::packed(&mesh.positions),
        &AttributeView::packed(&mesh.normals),
        &AttributeView::packed(&mesh.uvs),
        indices,
    )?;
    mesh.tangents = tangents;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geosphere::create_geospheres;
    use crate::uv::{UvProjection, create_uv_map};

    fn quad() -> (Vec<Vec3>, Vec<Vec3>, Vec<Vec2>, Vec<IndexType>) {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = vec![Vec3::Z; 4];
        let uvs = positions.iter().map(|p| p.truncate()).collect();
        (positions, normals, uvs, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_planar_quad_tangent_follows_u() {
        let (p, n, uv, idx) = quad();
        let t = calculate_tangents(
            &AttributeView::packed(&p),
            &AttributeView::packed(&n),
            &AttributeView::packed(&uv),
            &idx,
        )
        .unwrap();
        for tangent in t {
            assert!((tangent.truncate() - Vec3::X).length() < 1e-6);
            assert_eq!(tangent.w, 1.0);
        }
    }

    #[test]
    fn test_mirrored_uv_flips_handedness() {
        let (p, n, mut uv, idx) = quad();
        for w in &mut uv {
            w.y = -w.y;
        }
        let t = calculate_tangents(
            &AttributeView::packed(&p),
            &AttributeView::packed(&n),
            &AttributeView::packed(&uv),
            &idx,
        )
        .unwrap();
        assert!(t.iter().all(|t| t.w == -1.0));
    }

    #[test]
    fn test_tangents_orthogonal_to_normals_on_sphere() {
        let geo = create_geospheres(3).unwrap();
        let uvs = create_uv_map(&geo.mesh.positions, UvProjection::Planar);
        let t = calculate_tangents(
            &AttributeView::packed(&geo.mesh.positions),
            &AttributeView::packed(&geo.mesh.normals),
            &AttributeView::packed(&uvs),
            &geo.mesh.indices,
        )
        .unwrap();
        for (tangent, n) in t.iter().zip(&geo.mesh.normals) {
            assert!(n.dot(tangent.truncate()).abs() < 1e-3);
            assert!((tangent.truncate().length() - 1.0).abs() < 1e-4);
            assert!(tangent.w == 1.0 || tangent.w == -1.0);
        }
    }

    #[test]
    fn test_unreferenced_vertex_gets_orthogonal_fallback() {
        let (mut p, mut n, mut uv, idx) = quad();
        p.push(Vec3::new(5.0, 5.0, 5.0));
        n.push(Vec3::Y);
        uv.push(Vec2::ZERO);
        let t = calculate_tangents(
            &AttributeView::packed(&p),
            &AttributeView::packed(&n),
            &AttributeView::packed(&uv),
            &idx,
        )
        .unwrap();
        let fallback = t[4];
        assert!(fallback.truncate().dot(Vec3::Y).abs() < 1e-6);
        assert!((fallback.truncate().length() - 1.0).abs() < 1e-6);
        assert_eq!(fallback.w, 1.0);
    }

    #[test]
    fn test_interleaved_matches_packed() {
        let (p, n, uv, idx) = quad();
        // position(12) + junk(4) + normal(12) + uv(8) = 36-byte stride
        let stride = 36;
        let mut bytes = vec![0u8; stride * p.len()];
        for i in 0..p.len() {
            let base = i * stride;
            bytes[base..base + 12].copy_from_slice(bytemuck::bytes_of(&p[i]));
            bytes[base + 12..base + 16].copy_from_slice(&[0xAB; 4]);
            bytes[base + 16..base + 28].copy_from_slice(bytemuck::bytes_of(&n[i]));
            bytes[base + 28..base + 36].copy_from_slice(bytemuck::bytes_of(&uv[i]));
        }

        let interleaved = calculate_tangents(
            &AttributeView::new(&bytes, 0, stride, 12, 4).unwrap(),
            &AttributeView::new(&bytes, 16, stride, 12, 4).unwrap(),
            &AttributeView::new(&bytes, 28, stride, 8, 4).unwrap(),
            &idx,
        )
        .unwrap();
        let packed = calculate_tangents(
            &AttributeView::packed(&p),
            &AttributeView::packed(&n),
            &AttributeView::packed(&uv),
            &idx,
        )
        .unwrap();
        assert_eq!(interleaved, packed);
    }

    #[test]
    fn test_subrange_uses_local_indices() {
        let (p, n, uv, idx) = quad();
        let mut p2 = vec![Vec3::splat(9.0); 2];
        p2.extend_from_slice(&p);
        let mut n2 = vec![Vec3::X; 2];
        n2.extend_from_slice(&n);
        let mut uv2 = vec![Vec2::ZERO; 2];
        uv2.extend_from_slice(&uv);

        let t = calculate_tangents(
            &AttributeView::packed(&p2).subrange(2, 4).unwrap(),
            &AttributeView::packed(&n2).subrange(2, 4).unwrap(),
            &AttributeView::packed(&uv2).subrange(2, 4).unwrap(),
            &idx,
        )
        .unwrap();
        assert_eq!(t.len(), 4);
        assert!((t[0].truncate() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_view_that_overruns_buffer_is_rejected() {
        let bytes = [0u8; 40];
        assert!(matches!(
            AttributeView::new(&bytes, 8, 16, 12, 3),
            Err(MeshError::InvalidStride { .. })
        ));
        assert!(AttributeView::new(&bytes, 8, 16, 12, 2).is_ok());
    }

    #[test]
    fn test_short_elements_are_rejected() {
        let narrow = [0u8; 24];
        let narrow = AttributeView::new(&narrow, 0, 8, 8, 3).unwrap();
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::Y];
        let normals = [Vec3::Z; 3];

        let err = calculate_tangents(&narrow, &narrow, &AttributeView::packed(&uvs), &[0, 1, 2])
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidStride {
                element_size: 8,
                ..
            }
        ));

        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let one_float = [0u8; 12];
        let one_float = AttributeView::new(&one_float, 0, 4, 4, 3).unwrap();
        assert!(matches!(
            calculate_tangents(
                &AttributeView::packed(&positions),
                &AttributeView::packed(&normals),
                &one_float,
                &[0, 1, 2],
            ),
            Err(MeshError::InvalidStride { .. })
        ));
    }

    #[test]
    fn test_larger_face_dominates_tangent() {
        // Vertex 0 is shared by a large face running +X in u and a tiny one
        // running +Y in u.
        let positions = [
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(0.0, 0.0, 0.1),
        ];
        let normals = [Vec3::Z; 5];
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::X, Vec2::Y];
        let tangents = calculate_tangents(
            &AttributeView::packed(&positions),
            &AttributeView::packed(&normals),
            &AttributeView::packed(&uvs),
            &[0, 1, 2, 0, 3, 4],
        )
        .unwrap();

        let t = tangents[0];
        assert!(t.x > 0.9999, "tangent {t}");
        assert!((t.y - 0.01).abs() < 1e-3, "tangent {t}");
        assert!(t.z.abs() < 1e-6);
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let (p, n, uv, idx) = quad();
        let err = calculate_tangents(
            &AttributeView::packed(&p),
            &AttributeView::packed(&n[..3]),
            &AttributeView::packed(&uv),
            &idx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MeshError::ParameterMismatch {
                attribute: "normals",
                ..
            }
        ));
    }

    #[test]
    fn test_xyz_write_leaves_following_bytes() {
        let stride = 16;
        let mut bytes = vec![0xEEu8; stride * 2];
        let target = TangentTarget {
            offset: 0,
            stride,
            format: TangentFormat::Xyz,
        };
        write_tangents(&mut bytes, target, &[Vec4::new(1.0, 0.0, 0.0, -1.0); 2]).unwrap();
        for v in 0..2 {
            let base = v * stride;
            let xyz: [f32; 3] = bytemuck::pod_read_unaligned(&bytes[base..base + 12]);
            assert_eq!(xyz, [1.0, 0.0, 0.0]);
            assert_eq!(&bytes[base + 12..base + 16], &[0xEE; 4]);
        }
    }

    #[test]
    fn test_xyzw_write_keeps_sign() {
        let mut bytes = vec![0u8; 16];
        let target = TangentTarget {
            offset: 0,
            stride: 16,
            format: TangentFormat::Xyzw,
        };
        write_tangents(&mut bytes, target, &[Vec4::new(0.0, 1.0, 0.0, -1.0)]).unwrap();
        let v: [f32; 4] = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(v, [0.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_generate_in_place_fills_tangents() {
        let (p, n, uv, idx) = quad();
        let mut mesh = Mesh {
            positions: p,
            normals: n,
            uvs: uv,
            tangents: Vec::new(),
            indices: idx,
        };
        generate_tangents_in_place(&mut mesh, None).unwrap();
        assert_eq!(mesh.tangents.len(), 4);
        assert!(mesh.validate_attributes().is_ok());
    }
}
