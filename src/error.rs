//! Error types for room decoding and encoding.

use thiserror::Error;

/// Result type alias using ZroomError.
pub type Result<T> = std::result::Result<T, ZroomError>;

/// Main error type for room operations.
///
/// Every variant is fatal for the operation that produced it; nothing is
/// salvaged from a partially decoded or encoded room.
#[derive(Error, Debug)]
pub enum ZroomError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a room summary.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dereferenced address does not point into segment 3.
    #[error("address {0:#010x} is not a segment 3 address")]
    InvalidSegment(u32),

    /// A resolved read runs past the end of the loaded buffer.
    #[error("read of {len} bytes at offset {offset:#x} exceeds buffer of {size} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    /// No mesh header reference (0x0A) was found before the room terminator.
    #[error("failed to locate mesh header in room")]
    MissingMeshHeader,

    /// The mesh header type is not one the decoder understands.
    #[error("only mesh header type 0x02 supported; type is {0:#04x}")]
    UnsupportedMeshHeader(u8),

    /// The mesh header entry count disagrees with its entry array bounds.
    #[error("mesh header sanity check failed: header says {expected} entries, bounds hold {actual}")]
    MeshHeaderMismatch { expected: usize, actual: usize },

    /// A load-vertices command would write past the working vertex buffer.
    #[error("vertex load of {count} vertices at base {base} overflows the vertex buffer")]
    VertexBufferOverflow { base: i32, count: usize },

    /// A draw command references a slot outside the working vertex buffer.
    #[error("triangle references vertex buffer slot {0} out of range")]
    VertexIndexOutOfRange(u8),

    /// Spatial division requires a single flattened group.
    #[error("room must be flattened before dividing ({0} top-level groups)")]
    NotFlattened(usize),

    /// A division level outside `1..=64` was requested.
    #[error("invalid division count {0}")]
    InvalidDivision(u32),

    /// The mesh header entry count is a single byte.
    #[error("too many groups to encode: {0} (max 255)")]
    TooManyGroups(usize),

    /// Encoded output would reach past the 24-bit segment offset range.
    #[error("encoded room of {0} bytes does not fit in one segment")]
    OutputTooLarge(usize),

    /// The room header written by the encoder has no mesh header reference.
    #[error("room header has no mesh header reference to patch")]
    MissingHeaderReference,
}
