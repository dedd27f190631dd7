//! Whole-file encode and reconstruction.
//!
//! [`FramePipeline`] turns a byte stream into an ordered frame sequence and
//! back. Per-frame work runs on one bounded `rayon` pool owned by the
//! pipeline:
//!
//! - Frames are independent, so any frame may finish first.
//! - Results are collected through indexed parallel iterators, never in
//!   completion order. Frame order is the only record of chunk order.
//! - The first per-frame failure stops the run; no partial output is
//!   returned.

use bytes::Bytes;
use rayon::prelude::*;
use tracing::debug;

use crate::chunker::Chunker;
use crate::codec::{FrameCodec, TrailerCodec};
use crate::error::CodecError;
use crate::types::{Grid, Resolution};

// ── FramePipeline ────────────────────────────────────────────────

/// Frame sequence builder and reconstructor for one resolution.
///
/// Build one per process and share it; the worker pool is created once.
pub struct FramePipeline {
    resolution: Resolution,
    chunker: Chunker,
    frames: FrameCodec,
    trailer: TrailerCodec,
    pool: rayon::ThreadPool,
}

impl FramePipeline {
    /// Create a pipeline with `workers` threads (0 = one per CPU).
    pub fn new(resolution: Resolution, workers: usize) -> Result<Self, CodecError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("videor-frame-{i}"))
            .build()?;

        Ok(Self {
            resolution,
            chunker: Chunker::new(resolution),
            frames: FrameCodec::new(resolution),
            trailer: TrailerCodec::new(resolution),
            pool,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Number of frames an input of `len` bytes encodes to.
    pub fn frame_count(&self, len: usize) -> usize {
        self.chunker.frame_count(len)
    }

    /// Encode `data` into frames: regular frames for every chunk but the
    /// last, then the trailer.
    pub fn encode(&self, data: &Bytes) -> Result<Vec<Grid>, CodecError> {
        let chunks = self.chunker.split(data)?;
        let total = chunks.len();
        let Some((last, body)) = chunks.split_last() else {
            return Err(CodecError::EmptySequence);
        };

        debug!(
            frames = total,
            bytes = data.len(),
            workers = self.workers(),
            "rendering frames"
        );

        let (body, trailer) = self.pool.install(|| {
            rayon::join(
                || {
                    body.par_iter()
                        .enumerate()
                        .map(|(i, chunk)| self.frames.encode(chunk).map_err(|e| e.at_frame(i + 1)))
                        .collect::<Result<Vec<_>, _>>()
                },
                || self.trailer.encode(last).map_err(|e| e.at_frame(total)),
            )
        });

        let mut grids = body?;
        grids.push(trailer?);
        Ok(grids)
    }

    /// Reconstruct the original bytes from an ordered frame sequence.
    ///
    /// The trailer is checked first so a foreign or truncated artifact is
    /// rejected before any regular frame is decoded.
    pub fn decode(&self, frames: &[Grid]) -> Result<Vec<u8>, CodecError> {
        let (last, body) = frames.split_last().ok_or(CodecError::EmptySequence)?;

        let tail = self
            .trailer
            .decode(last)
            .map_err(|e| e.at_frame(frames.len()))?;
        debug!(bytes = tail.len(), "trailer verified");

        let chunks = self.pool.install(|| {
            body.par_iter()
                .enumerate()
                .map(|(i, grid)| self.frames.decode(grid).map_err(|e| e.at_frame(i + 1)))
                .collect::<Result<Vec<_>, _>>()
        })?;
        debug!(frames = frames.len(), "all frames verified");

        let len = chunks.iter().map(Vec::len).sum::<usize>() + tail.len();
        let mut out = Vec::with_capacity(len);
        for chunk in &chunks {
            out.extend_from_slice(chunk);
        }
        out.extend_from_slice(&tail);
        Ok(out)
    }
}

// ── Tests ────────────────────────────────────────────────────────
