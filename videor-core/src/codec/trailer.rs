//! Trailer frame codec.
//!
//! The last chunk of a file is usually short, so its frame records where the
//! data starts instead of how long it is:
//!
//! 1. The stream `hex(SIGNATURE) ‖ hex(SHA256(last)) ‖ hex(last)` is
//!    left-padded with `'0'` digits to a multiple of six.
//! 2. The resulting pixels are right-aligned in the grid; everything in
//!    front of them is black.
//!
//! Decoding scans for the first non-black pixel. Because the signature
//! starts with a non-zero digit, stripping that pixel's leading zeros
//! removes exactly the nibble padding.

use crate::codec::{DIGEST_HEX_LEN, digest_hex, verify};
use crate::error::CodecError;
use crate::pixel::{Pixel, pixels_from_hex};
use crate::types::{DIGEST_LEN, Grid, Resolution};

/// Magic marker that opens every trailer stream.
pub const SIGNATURE: [u8; 2] = *b"DM";

/// `hex(SIGNATURE)`.
const SIGNATURE_HEX: &str = "444d";

// ── TrailerCodec ─────────────────────────────────────────────────

/// Stateless encoder/decoder for the distinguished last frame.
#[derive(Debug, Clone, Copy)]
pub struct TrailerCodec {
    resolution: Resolution,
}

impl TrailerCodec {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// Encode the terminal chunk (possibly empty).
    ///
    /// Fails with [`CodecError::TrailerOverflow`] when the chunk exceeds
    /// [`Resolution::trailer_capacity`].
    pub fn encode(&self, last: &[u8]) -> Result<Grid, CodecError> {
        let capacity = self.resolution.trailer_capacity();
        if last.len() > capacity {
            return Err(CodecError::TrailerOverflow {
                len: last.len(),
                capacity,
            });
        }

        let body_len = (SIGNATURE.len() + DIGEST_LEN + last.len()) * 2;
        let pad = (Pixel::HEX_LEN - body_len % Pixel::HEX_LEN) % Pixel::HEX_LEN;

        let mut stream = String::with_capacity(pad + body_len);
        stream.extend(std::iter::repeat_n('0', pad));
        stream.push_str(SIGNATURE_HEX);
        stream.push_str(&digest_hex(last));
        stream.push_str(&hex::encode(last));

        let data = pixels_from_hex(&stream)?;
        let mut pixels = vec![Pixel::BLACK; self.resolution.pixel_count() - data.len()];
        pixels.extend(data);

        Grid::from_pixels(self.resolution, pixels)
    }

    /// Recover and verify the terminal chunk.
    ///
    /// An all-black grid, a missing signature or a stream too short to
    /// hold a digest is [`CodecError::UnrecognizedFormat`]; a digest
    /// mismatch is [`CodecError::Integrity`].
    pub fn decode(&self, grid: &Grid) -> Result<Vec<u8>, CodecError> {
        if grid.resolution() != self.resolution {
            return Err(CodecError::GridSizeMismatch {
                expected: self.resolution.pixel_count(),
                actual: grid.resolution().pixel_count(),
            });
        }

        let pixels = grid.pixels();
        let start = pixels
            .iter()
            .position(|p| !p.is_black())
            .ok_or(CodecError::UnrecognizedFormat("trailer frame is entirely black"))?;

        let mut stream = String::with_capacity((pixels.len() - start) * Pixel::HEX_LEN);
        // Same as reading the pixel as an integer and printing it back in hex.
        stream.push_str(pixels[start].to_hex().trim_start_matches('0'));
        for p in &pixels[start + 1..] {
            p.write_hex(&mut stream);
        }

        let rest = stream
            .strip_prefix(SIGNATURE_HEX)
            .ok_or(CodecError::UnrecognizedFormat("missing magic marker"))?;
        if rest.len() < DIGEST_HEX_LEN {
            return Err(CodecError::UnrecognizedFormat("trailer too short to hold a digest"));
        }

        let (claimed, payload_hex) = rest.split_at(DIGEST_HEX_LEN);
        let data = hex::decode(payload_hex)
            .map_err(|_| CodecError::UnrecognizedFormat("trailer payload is not whole bytes"))?;
        verify(claimed, data)
    }
}

// ── Tests ────────────────────────────────────────────────────────
