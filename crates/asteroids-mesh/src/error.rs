//! Error types for geosphere construction, displacement and packing.

/// Programmer-input violations detected before any geometry is emitted.
///
/// None of these are recoverable in a meaningful way: they indicate malformed
/// base geometry or mismatched buffers, and callers are expected to abort
/// scene setup rather than render partial results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The index list is not a triangle list.
    #[error("index count {index_count} is not a multiple of 3")]
    InvalidTopology {
        /// Length of the offending index list.
        index_count: usize,
    },

    /// An index points past the end of the vertex pool.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// Number of vertices in the pool.
        vertex_count: usize,
    },

    /// A vertex sits at the origin and cannot be projected onto a sphere.
    #[error("vertex {index} has zero length and cannot be spherified")]
    DegenerateVertex {
        /// Position of the vertex in the pool.
        index: usize,
    },

    /// Two index-aligned attribute arrays disagree in length.
    #[error("{attribute} has {actual} elements, expected {expected}")]
    ParameterMismatch {
        /// Name of the attribute that has the wrong length.
        attribute: &'static str,
        /// Length required by the vertex pool.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A subdivision level was requested that the geosphere does not contain.
    #[error("subdivision level {level} requested, geosphere has {level_count} levels")]
    InvalidLevel {
        /// Requested level.
        level: usize,
        /// Number of levels stored (including level 0).
        level_count: usize,
    },

    /// A strided attribute view does not fit inside its byte buffer.
    #[error(
        "attribute at offset {offset} with {element_size}-byte elements and stride {stride} does not fit {vertex_count} vertices in {buffer_len} bytes"
    )]
    InvalidStride {
        /// Byte offset of the attribute inside one vertex.
        offset: usize,
        /// Size of one attribute element in bytes.
        element_size: usize,
        /// Distance between consecutive vertices in bytes.
        stride: usize,
        /// Number of vertices the view must cover.
        vertex_count: usize,
        /// Length of the backing buffer in bytes.
        buffer_len: usize,
    },

    /// A generation parameter is outside its usable domain.
    #[error("parameter {name} = {value} is invalid")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f32,
    },
}
