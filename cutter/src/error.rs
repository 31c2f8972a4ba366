use std::collections::TryReserveError;

use thiserror::Error;

use crate::buffers::Channel;

pub type Result<T> = std::result::Result<T, CutError>;

/// Errors produced while validating or cutting a mesh. Degenerate geometry is
/// never an error, it always resolves to the below side of the plane.
#[derive(Debug, Error)]
pub enum CutError {
    #[error("mesh has no submesh to cut")]
    NoSubMesh,
    #[error("submesh range {start}..{end} exceeds index buffer of length {len}")]
    SubMeshOutOfRange { start: usize, end: usize, len: usize },
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
    #[error("{channel:?} channel has {len} elements, expected {expected}")]
    ChannelLength {
        channel: Channel,
        len: usize,
        expected: usize,
    },
    #[error("cut would need {0} vertices, more than 32-bit indices can address")]
    TooManyVertices(usize),
    #[error("failed to grow buffer: {0}")]
    Allocation(#[from] TryReserveError),
}
