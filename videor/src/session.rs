//! File-level encode and decode.
//!
//! A [`Session`] ties the codec pipeline to the filesystem and the video
//! tool:
//!
//! ```text
//! encode:  file → FramePipeline::encode → FrameStore (PNG) → FrameMuxer::mux   → video
//! decode:  video → FrameMuxer::demux → FrameStore (PNG) → FramePipeline::decode → file
//! ```
//!
//! Frame images live in a fresh scratch directory that is removed when the
//! session returns, fails, or is dropped mid-flight. Blocking frame I/O
//! holds its own handle on the directory, so a dropped session removes it
//! only once that I/O has stopped. Decoded output is written only after
//! every frame has been verified.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};
use videor_core::FramePipeline;

use crate::config::VideorConfig;
use crate::error::VideorError;
use crate::frames::FrameStore;
use crate::muxer::{FfmpegMuxer, FrameMuxer};

// ── Summary ──────────────────────────────────────────────────────

/// Direction of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Encode,
    Decode,
}

/// What a finished session produced.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Frames written or read.
    pub frames: usize,
    /// Plain bytes encoded or recovered.
    pub bytes: usize,
    /// Frame size, `WxH`.
    pub resolution: String,
    /// BLAKE3 of the plain bytes; equal on both sides of a round trip.
    pub blake3: String,
}

// ── Session ──────────────────────────────────────────────────────

/// Encodes files into videos and back, sharing one worker pool.
pub struct Session {
    config: VideorConfig,
    pipeline: Arc<FramePipeline>,
    muxer: Box<dyn FrameMuxer>,
}

impl Session {
    /// Session that muxes with ffmpeg as configured.
    pub fn new(config: VideorConfig) -> Result<Self, VideorError> {
        let muxer = FfmpegMuxer::new(&config.video);
        Self::with_muxer(config, muxer)
    }

    /// Session with a caller-supplied muxer.
    pub fn with_muxer(
        config: VideorConfig,
        muxer: impl FrameMuxer + 'static,
    ) -> Result<Self, VideorError> {
        let pipeline = FramePipeline::new(config.resolution()?, config.codec.workers)?;
        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            muxer: Box::new(muxer),
        })
    }

    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Encode `input` into a video at `output`.
    ///
    /// `output` gets the configured container extension appended if it
    /// does not already carry it; the summary holds the final path.
    pub async fn encode(&self, input: &Path, output: &Path) -> Result<Summary, VideorError> {
        ensure_input(input).await?;

        info!("reading from file...");
        let data = Bytes::from(tokio::fs::read(input).await?);
        let fingerprint = blake3::hash(&data).to_hex().to_string();

        info!(
            frames = self.pipeline.frame_count(data.len()),
            resolution = %self.pipeline.resolution(),
            "rendering frames..."
        );
        let pipeline = Arc::clone(&self.pipeline);
        let encoded = data.clone();
        let grids = tokio::task::spawn_blocking(move || pipeline.encode(&encoded)).await??;
        let frames = grids.len();

        let scratch = scratch_dir()?;
        let store = FrameStore::new(scratch.path(), self.config.frames.channel_order);
        let writer = store.clone();
        blocking_in(&scratch, move || writer.write_all(&grids)).await?;
        debug!(frames, dir = %scratch.path().display(), "frames written");

        let output = container_path(output, &self.config.video.container_extension);
        info!("stitching frames...");
        self.muxer.mux(&store, &output).await?;

        info!("cleaning up...");
        remove_scratch(scratch)?;
        info!(output = %output.display(), "finished encoding");

        Ok(Summary {
            mode: Mode::Encode,
            input: input.to_path_buf(),
            output,
            frames,
            bytes: data.len(),
            resolution: self.pipeline.resolution().to_string(),
            blake3: fingerprint,
        })
    }

    /// Decode the video at `input` back into the original file at `output`.
    pub async fn decode(&self, input: &Path, output: &Path) -> Result<Summary, VideorError> {
        ensure_input(input).await?;

        let scratch = scratch_dir()?;
        let store = FrameStore::new(scratch.path(), self.config.frames.channel_order);

        info!("unstitching frames...");
        self.muxer.demux(input, &store).await?;

        let resolution = self.pipeline.resolution();
        let reader = store.clone();
        let grids = blocking_in(&scratch, move || reader.read_all(resolution)).await?;
        let frames = grids.len();
        info!("found {frames} frames");

        info!("de-rendering frames...");
        let pipeline = Arc::clone(&self.pipeline);
        let data = tokio::task::spawn_blocking(move || pipeline.decode(&grids)).await??;
        info!("data integrity of all frames is verified");

        info!("writing to file...");
        tokio::fs::write(output, &data).await?;

        info!("cleaning up...");
        remove_scratch(scratch)?;
        info!(output = %output.display(), "finished decoding");

        if self.config.output.describe {
            describe(output).await;
        }

        Ok(Summary {
            mode: Mode::Decode,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            frames,
            bytes: data.len(),
            resolution: resolution.to_string(),
            blake3: blake3::hash(&data).to_hex().to_string(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// `output` with `.{extension}` appended unless it already ends with it.
pub fn container_path(output: &Path, extension: &str) -> PathBuf {
    if extension.is_empty() || output.extension().is_some_and(|e| e == extension) {
        return output.to_path_buf();
    }
    let mut path = output.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

async fn ensure_input(path: &Path) -> Result<(), VideorError> {
    if tokio::fs::try_exists(path).await? {
        Ok(())
    } else {
        Err(VideorError::InputNotFound(path.to_path_buf()))
    }
}

fn scratch_dir() -> Result<Arc<TempDir>, VideorError> {
    Ok(Arc::new(tempfile::Builder::new().prefix("videor-").tempdir()?))
}

/// Run `work` on the blocking pool while keeping `scratch` alive.
///
/// If the caller is dropped, the directory is removed after `work`
/// returns rather than underneath it.
async fn blocking_in<T, F>(scratch: &Arc<TempDir>, work: F) -> Result<T, VideorError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, VideorError> + Send + 'static,
{
    let guard = Arc::clone(scratch);
    tokio::task::spawn_blocking(move || {
        let out = work();
        drop(guard);
        out
    })
    .await?
}

/// Remove the scratch directory, reporting failure. Only the last handle
/// removes it.
fn remove_scratch(scratch: Arc<TempDir>) -> Result<(), VideorError> {
    if let Ok(dir) = Arc::try_unwrap(scratch) {
        dir.close()?;
    }
    Ok(())
}

/// Log what `file` thinks the decoded output is. Best effort.
async fn describe(path: &Path) {
    match Command::new("file").arg(path).output().await {
        Ok(out) if out.status.success() => {
            info!("details about the file: {}", String::from_utf8_lossy(&out.stdout).trim());
        }
        Ok(out) => warn!("file exited with {}", out.status),
        Err(e) => warn!("cannot describe output: {e}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────
