//! Frame sequence ⇄ video file.
//!
//! Muxing must be pixel-exact in both directions: any chroma subsampling
//! or lossy step breaks frame verification. [`FfmpegMuxer`] drives an
//! external `ffmpeg` with a lossless codec and bit-exact flags.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::VideoConfig;
use crate::error::VideorError;
use crate::frames::FrameStore;

// ── FrameMuxer ───────────────────────────────────────────────────

/// Packs numbered frame images into a video and extracts them again.
#[async_trait]
pub trait FrameMuxer: Send + Sync {
    /// Stitch `store`'s frames, in index order, into `output`.
    async fn mux(&self, store: &FrameStore, output: &Path) -> Result<(), VideorError>;

    /// Extract every frame of `input` into `store`, numbered from 1.
    async fn demux(&self, input: &Path, store: &FrameStore) -> Result<(), VideorError>;
}

// ── FfmpegMuxer ──────────────────────────────────────────────────

/// Runs `ffmpeg` as a subprocess.
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    program: String,
    codec: String,
    framerate: u32,
    pixel_format: String,
}

impl FfmpegMuxer {
    pub fn new(config: &VideoConfig) -> Self {
        Self {
            program: config.ffmpeg.clone(),
            codec: config.codec.clone(),
            framerate: config.framerate.max(1),
            pixel_format: config.pixel_format.clone(),
        }
    }

    /// Arguments for stitching frames into `output`.
    pub fn mux_args(&self, store: &FrameStore, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-v", "error", "-framerate"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.framerate.to_string().into());
        args.push("-i".into());
        args.push(store.pattern().into());
        for arg in ["-c:v", self.codec.as_str(), "-pix_fmt", self.pixel_format.as_str()] {
            args.push(arg.into());
        }
        for arg in ["-flags", "bitexact", "-fflags", "bitexact"] {
            args.push(arg.into());
        }
        args.push(output.into());
        args
    }

    /// Arguments for extracting every frame of `input`.
    pub fn demux_args(&self, input: &Path, store: &FrameStore) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-v", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(input.into());
        for arg in ["-an", "-f", "image2", "-pix_fmt", self.pixel_format.as_str()] {
            args.push(arg.into());
        }
        args.push(store.pattern().into());
        args
    }

    async fn run(&self, args: Vec<OsString>) -> Result<(), VideorError> {
        debug!(program = %self.program, ?args, "running video tool");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| VideorError::MuxerUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VideorError::MuxerFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FrameMuxer for FfmpegMuxer {
    async fn mux(&self, store: &FrameStore, output: &Path) -> Result<(), VideorError> {
        self.run(self.mux_args(store, output)).await
    }

    async fn demux(&self, input: &Path, store: &FrameStore) -> Result<(), VideorError> {
        self.run(self.demux_args(input, store)).await
    }
}

// ── Tests ────────────────────────────────────────────────────────
