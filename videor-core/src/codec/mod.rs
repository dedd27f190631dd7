//! Frame codecs.
//!
//! Every frame is a hex stream laid onto a pixel grid, six digits per
//! pixel, row-major. Two layouts exist:
//!
//! ```text
//! Regular:  hex(SHA256(chunk)) ‖ hex(chunk)                 fills the grid exactly
//! Trailer:  000… ‖ 000… ‖ hex("DM") ‖ hex(SHA256(last)) ‖ hex(last)
//!           └black┘ └nibble pad┘                            right-aligned
//! ```
//!
//! | Module    | Purpose                                           |
//! |-----------|---------------------------------------------------|
//! | `regular` | All frames but the last (`FrameCodec`)            |
//! | `trailer` | The last frame, variable payload (`TrailerCodec`) |

mod regular;
mod trailer;

pub use regular::FrameCodec;
pub use trailer::{SIGNATURE, TrailerCodec};

use sha2::{Digest, Sha256};

use crate::error::CodecError;

/// Hex digits in a SHA-256 digest.
pub(crate) const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of `data`.
pub(crate) fn digest_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `payload` against the digest a frame claims for it.
pub(crate) fn verify(claimed: &str, payload: Vec<u8>) -> Result<Vec<u8>, CodecError> {
    let actual = digest_hex(&payload);
    if actual != claimed {
        return Err(CodecError::Integrity {
            expected: claimed.to_string(),
            actual,
        });
    }
    Ok(payload)
}
