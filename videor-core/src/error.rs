//! Domain-specific error types for the frame codec.
//!
//! All fallible operations return `Result<T, CodecError>`.
//! No panics on malformed grids: every failure is typed so the caller
//! decides whether to abort.

use thiserror::Error;

/// The canonical error type for the frame codec.
#[derive(Debug, Error)]
pub enum CodecError {
    // ── Conversion Errors ────────────────────────────────────────
    /// A pixel was built from text that is not exactly 6 hex digits.
    #[error("malformed hex pixel: {text:?}")]
    MalformedHex { text: String },

    // ── Verification Errors ──────────────────────────────────────
    /// The SHA-256 embedded in a frame does not match its payload.
    #[error("integrity check failed: embedded {expected}, computed {actual}")]
    Integrity { expected: String, actual: String },

    /// The trailer frame lacks the magic marker or carries no data.
    #[error("unrecognized format: {0}")]
    UnrecognizedFormat(&'static str),

    // ── Geometry Errors ──────────────────────────────────────────
    /// The grid cannot hold even an empty trailer.
    #[error("resolution {width}x{height} too small: need at least {min_pixels} pixels")]
    ResolutionTooSmall {
        width: u32,
        height: u32,
        min_pixels: usize,
    },

    /// The grid's hex length does not fit in `usize`.
    #[error("resolution {width}x{height} too large")]
    ResolutionTooLarge { width: u32, height: u32 },

    /// A pixel buffer does not match the resolution it claims.
    #[error("grid size mismatch: expected {expected} pixels, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },

    /// A regular frame was handed a chunk that does not fill the grid.
    #[error("chunk of {actual} bytes does not fill a regular frame ({expected} bytes)")]
    ChunkSizeMismatch { expected: usize, actual: usize },

    /// The trailer payload does not fit in the grid.
    #[error("trailer payload too large: {len} bytes (max {capacity})")]
    TrailerOverflow { len: usize, capacity: usize },

    /// The input length leaves a tail that no frame layout can carry.
    #[error(
        "input of {len} bytes cannot be framed: a tail of {tail} bytes fits neither a \
         regular frame ({frame_capacity} bytes) nor the trailer"
    )]
    UnrepresentableLength {
        len: usize,
        tail: usize,
        frame_capacity: usize,
    },

    // ── Sequence Errors ──────────────────────────────────────────
    /// Reconstruction was asked to decode zero frames.
    #[error("frame sequence is empty")]
    EmptySequence,

    /// The frame-level worker pool could not be started.
    #[error("worker pool error: {0}")]
    WorkerPool(String),

    /// A per-frame failure, tagged with the 1-based frame number.
    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Attach a 1-based frame number to this error.
    pub fn at_frame(self, index: usize) -> Self {
        CodecError::Frame {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any frame tagging stripped.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Frame { source, .. } => source.root(),
            other => other,
        }
    }

    /// The frame number this error was tagged with, if any.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            CodecError::Frame { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for CodecError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        CodecError::WorkerPool(e.to_string())
    }
}
