//! # videor: files as lossless video
//!
//! Turns any file into a sequence of checksum-stamped frames, stitches them
//! into a lossless video with ffmpeg, and reverses the process with
//! per-frame integrity verification.
//!
//! ## Modules
//!
//! | Module    | Purpose                                               |
//! |-----------|-------------------------------------------------------|
//! | `config`  | TOML configuration with defaults                      |
//! | `error`   | `VideorError` and exit-code mapping                   |
//! | `frames`  | Numbered PNG frames in a scratch directory            |
//! | `muxer`   | `FrameMuxer` trait and the ffmpeg implementation      |
//! | `session` | File-level encode/decode with guaranteed cleanup      |

pub mod config;
pub mod error;
pub mod frames;
pub mod muxer;
pub mod session;

pub use config::VideorConfig;
pub use error::VideorError;
pub use frames::{ChannelOrder, FrameStore};
pub use muxer::{FfmpegMuxer, FrameMuxer};
pub use session::{Mode, Session, Summary};
