//! # videor-core
//!
//! Reversible, checksum-protected mapping from a byte stream to a sequence
//! of fixed-size RGB frames.
//!
//! This crate contains:
//! - **Types**: `Resolution`, `Grid`, and the `Pixel` hex mapping
//! - **Codecs**: `FrameCodec` for regular frames, `TrailerCodec` for the
//!   padded last frame
//! - **Chunker**: frame-sized splitting of the input
//! - **Pipeline**: `FramePipeline`, order-preserving parallel encode and
//!   reconstruction on a bounded worker pool
//! - **Error**: `CodecError`, typed, `thiserror`-based
//!
//! The crate does no I/O. Writing frames to images and images to video is
//! the caller's business.

pub mod chunker;
pub mod codec;
pub mod error;
pub mod pipeline;
pub mod pixel;
pub mod types;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use chunker::Chunker;
pub use codec::{FrameCodec, SIGNATURE, TrailerCodec};
pub use error::CodecError;
pub use pipeline::FramePipeline;
pub use pixel::Pixel;
pub use types::{DEFAULT_SIDE, DIGEST_LEN, Grid, MIN_PIXELS, Resolution};
