//! Hex ⇄ pixel mapping.
//!
//! One pixel carries exactly six hex digits: two per channel, in channel
//! order. Rendering is always lowercase and zero-padded, so
//! `Pixel::from_hex(&p.to_hex()) == Ok(p)` for every pixel.

use std::fmt::Write;

use crate::error::CodecError;

/// An ordered `(first, second, third)` byte triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel(pub [u8; 3]);

impl Pixel {
    /// All channels zero. Used as trailer padding.
    pub const BLACK: Pixel = Pixel([0, 0, 0]);

    /// Hex digits per pixel.
    pub const HEX_LEN: usize = 6;

    /// Parse exactly six hex digits.
    pub fn from_hex(text: &str) -> Result<Self, CodecError> {
        let mut channels = [0u8; 3];
        if text.len() != Self::HEX_LEN || hex::decode_to_slice(text, &mut channels).is_err() {
            return Err(CodecError::MalformedHex {
                text: text.to_string(),
            });
        }
        Ok(Pixel(channels))
    }

    /// Six lowercase hex digits.
    pub fn to_hex(self) -> String {
        let mut out = String::with_capacity(Self::HEX_LEN);
        self.write_hex(&mut out);
        out
    }

    /// Append six lowercase hex digits to `out`.
    pub fn write_hex(self, out: &mut String) {
        let [a, b, c] = self.0;
        // Writing into a String cannot fail.
        let _ = write!(out, "{a:02x}{b:02x}{c:02x}");
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

/// Split a hex stream whose length is a multiple of six into pixels.
pub fn pixels_from_hex(stream: &str) -> Result<Vec<Pixel>, CodecError> {
    if stream.len() % Pixel::HEX_LEN != 0 || !stream.is_ascii() {
        return Err(CodecError::MalformedHex {
            text: stream.chars().take(Pixel::HEX_LEN * 2).collect(),
        });
    }
    (0..stream.len())
        .step_by(Pixel::HEX_LEN)
        .map(|i| Pixel::from_hex(&stream[i..i + Pixel::HEX_LEN]))
        .collect()
}
