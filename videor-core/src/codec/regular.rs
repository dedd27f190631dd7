//! Regular frame codec.
//!
//! A regular frame carries `hex(SHA256(chunk)) ‖ hex(chunk)` and nothing
//! else. Chunks are sized by the [`Chunker`](crate::Chunker) so that this
//! stream is exactly `6·W·H` digits long; there is no length field.

use crate::codec::{DIGEST_HEX_LEN, digest_hex, verify};
use crate::error::CodecError;
use crate::pixel::pixels_from_hex;
use crate::types::{Grid, Resolution};

// ── FrameCodec ───────────────────────────────────────────────────

/// Stateless encoder/decoder for every frame except the last.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    resolution: Resolution,
}

impl FrameCodec {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Lay a full-size chunk onto a grid, prefixed by its digest.
    ///
    /// The chunk must be exactly [`Resolution::frame_capacity`] bytes.
    /// Anything else means the caller mis-sized its chunks.
    pub fn encode(&self, chunk: &[u8]) -> Result<Grid, CodecError> {
        let expected = self.resolution.frame_capacity();
        if chunk.len() != expected {
            return Err(CodecError::ChunkSizeMismatch {
                expected,
                actual: chunk.len(),
            });
        }

        let mut stream = String::with_capacity(self.resolution.hex_len());
        stream.push_str(&digest_hex(chunk));
        stream.push_str(&hex::encode(chunk));
        debug_assert_eq!(stream.len(), self.resolution.hex_len());

        Grid::from_pixels(self.resolution, pixels_from_hex(&stream)?)
    }

    /// Recover the chunk from a grid and verify it against the embedded digest.
    pub fn decode(&self, grid: &Grid) -> Result<Vec<u8>, CodecError> {
        if grid.resolution() != self.resolution {
            return Err(CodecError::GridSizeMismatch {
                expected: self.resolution.pixel_count(),
                actual: grid.resolution().pixel_count(),
            });
        }

        let stream = grid.to_hex();
        let (claimed, payload_hex) = stream.split_at(DIGEST_HEX_LEN);
        let data = hex::decode(payload_hex).map_err(|_| CodecError::MalformedHex {
            text: payload_hex.chars().take(12).collect(),
        })?;
        verify(claimed, data)
    }
}

// ── Tests ────────────────────────────────────────────────────────
