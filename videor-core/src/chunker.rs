//! Input splitting.
//!
//! Every chunk but the last is exactly [`Resolution::frame_capacity`]
//! bytes, so its digest and payload fill a regular frame with no slack.
//! The last chunk holds whatever remains, which may be nothing: an exact
//! multiple of the frame capacity (or empty input) ends in an empty
//! trailer, so every artifact has at least one frame.

use bytes::Bytes;

use crate::error::CodecError;
use crate::types::Resolution;

/// Splits a byte stream into frame-sized chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    resolution: Resolution,
}

impl Chunker {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Number of frames an input of `len` bytes produces.
    pub fn frame_count(&self, len: usize) -> usize {
        len / self.resolution.frame_capacity() + 1
    }

    /// Split `data` into ordered chunks. The chunks share `data`'s buffer.
    ///
    /// A tail of `frame_capacity − 1` bytes is too long for the trailer and
    /// too short for a regular frame; such inputs fail with
    /// [`CodecError::UnrepresentableLength`].
    pub fn split(&self, data: &Bytes) -> Result<Vec<Bytes>, CodecError> {
        let capacity = self.resolution.frame_capacity();
        let full = data.len() / capacity;
        let tail = data.len() % capacity;

        if tail > self.resolution.trailer_capacity() {
            return Err(CodecError::UnrepresentableLength {
                len: data.len(),
                tail,
                frame_capacity: capacity,
            });
        }

        let mut chunks = Vec::with_capacity(full + 1);
        for i in 0..full {
            chunks.push(data.slice(i * capacity..(i + 1) * capacity));
        }
        chunks.push(data.slice(full * capacity..));
        Ok(chunks)
    }
}

// ── Tests ────────────────────────────────────────────────────────
