//! Interleaved vertex format shared by every asteroid render pipeline.
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x3 | normal   |
//! | 2        | 24     | Float32x3 | tangent  |
//! | 3        | 36     | Float32x2 | uv       |
//!
//! The tangent slot holds only `xyz`. Handedness is not stored; shaders
//! rebuild the bitangent as `cross(normal, tangent)`.

use std::mem;

use glam::{Vec2, Vec3, Vec4};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::tangents::{TangentFormat, TangentTarget};

/// One vertex of a packed asteroid mesh, 44 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AsteroidVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(AsteroidVertex, [u8; 44]);

impl AsteroidVertex {
    /// Interleave one vertex. The tangent's `w` is dropped.
    pub fn new(position: Vec3, normal: Vec3, tangent: Vec4, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tangent: tangent.truncate().to_array(),
            uv: uv.to_array(),
        }
    }
}

pub const POSITION_OFFSET: usize = mem::offset_of!(AsteroidVertex, position);
pub const NORMAL_OFFSET: usize = mem::offset_of!(AsteroidVertex, normal);
pub const TANGENT_OFFSET: usize = mem::offset_of!(AsteroidVertex, tangent);
pub const UV_OFFSET: usize = mem::offset_of!(AsteroidVertex, uv);
pub const VERTEX_STRIDE: usize = mem::size_of::<AsteroidVertex>();

/// Where tangent generation writes into an [`AsteroidVertex`] buffer.
pub const TANGENT_TARGET: TangentTarget = TangentTarget {
    offset: TANGENT_OFFSET,
    stride: VERTEX_STRIDE,
    format: TangentFormat::Xyz,
};

pub const ASTEROID_VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: POSITION_OFFSET as u64,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: NORMAL_OFFSET as u64,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: TANGENT_OFFSET as u64,
        shader_location: 2,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: UV_OFFSET as u64,
        shader_location: 3,
    },
];

/// Vertex buffer layout for [`AsteroidVertex`] buffers.
pub const ASTEROID_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: VERTEX_STRIDE as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &ASTEROID_VERTEX_ATTRIBUTES,
};

/// Owned copy of [`ASTEROID_VERTEX_LAYOUT`].
pub fn asteroid_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    ASTEROID_VERTEX_LAYOUT
}

const _: () = assert!(POSITION_OFFSET == 0);
const _: () = assert!(NORMAL_OFFSET == 12);
const _: () = assert!(TANGENT_OFFSET == 24);
const _: () = assert!(UV_OFFSET == 36);
const _: () = assert!(
    UV_OFFSET + 8 == VERTEX_STRIDE,
    "uv must be the last attribute and end at the stride"
);
