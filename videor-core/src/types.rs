//! Shared geometry types for the frame pipeline.
//!
//! A [`Resolution`] is fixed for a whole encode or decode session and is
//! never stored inside the frames, so both sides must agree on it out of
//! band. A [`Grid`] is one frame's worth of pixels in row-major order.

use std::fmt;

use crate::error::CodecError;
use crate::pixel::Pixel;

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Side length used when the caller does not pick one.
pub const DEFAULT_SIDE: u32 = 500;

/// Smallest pixel count that still holds an empty trailer
/// (`4 + 64` hex digits, padded up to 12 pixels).
pub const MIN_PIXELS: usize = 12;

// ── Resolution ───────────────────────────────────────────────────

/// Width and height of every frame in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Validate a `width × height` grid.
    ///
    /// Fails with [`CodecError::ResolutionTooSmall`] when the grid has
    /// fewer than [`MIN_PIXELS`] pixels, and with
    /// [`CodecError::ResolutionTooLarge`] when its hex length overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, CodecError> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|p| p.checked_mul(Pixel::HEX_LEN).is_some())
            .ok_or(CodecError::ResolutionTooLarge { width, height })?;
        if pixels < MIN_PIXELS {
            return Err(CodecError::ResolutionTooSmall {
                width,
                height,
                min_pixels: MIN_PIXELS,
            });
        }
        Ok(Self { width, height })
    }

    /// A square `side × side` grid.
    pub fn square(side: u32) -> Result<Self, CodecError> {
        Self::new(side, side)
    }

    pub const fn width(self) -> u32 {
        self.width
    }

    pub const fn height(self) -> u32 {
        self.height
    }

    /// Pixels per frame (`W·H`).
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Hex digits per frame (`6·W·H`).
    pub const fn hex_len(self) -> usize {
        self.pixel_count() * Pixel::HEX_LEN
    }

    /// Payload bytes carried by a regular frame (`3·W·H − 32`).
    ///
    /// Hash and payload fill the grid exactly, with no slack.
    pub const fn frame_capacity(self) -> usize {
        self.pixel_count() * 3 - DIGEST_LEN
    }

    /// Largest payload the trailer frame can carry (`3·W·H − 34`).
    ///
    /// The trailer spends two extra bytes on the magic marker.
    pub const fn trailer_capacity(self) -> usize {
        self.frame_capacity() - 2
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIDE,
            height: DEFAULT_SIDE,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ── Grid ─────────────────────────────────────────────────────────

/// A `W × H` frame of pixels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    resolution: Resolution,
    pixels: Vec<Pixel>,
}

impl Grid {
    /// Wrap a row-major pixel list. The list must fill the grid exactly.
    pub fn from_pixels(resolution: Resolution, pixels: Vec<Pixel>) -> Result<Self, CodecError> {
        if pixels.len() != resolution.pixel_count() {
            return Err(CodecError::GridSizeMismatch {
                expected: resolution.pixel_count(),
                actual: pixels.len(),
            });
        }
        Ok(Self { resolution, pixels })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Hex text of the whole grid, six digits per pixel, row-major.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.resolution.hex_len());
        for p in &self.pixels {
            p.write_hex(&mut out);
        }
        out
    }
}

// ── Tests ────────────────────────────────────────────────────────
