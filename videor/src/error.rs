//! Error type for file-level encode/decode sessions.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;
use videor_core::{CodecError, Resolution};

/// Everything that can stop an encode or decode session.
#[derive(Debug, Error)]
pub enum VideorError {
    // ── Codec Errors ─────────────────────────────────────────────
    /// A frame failed to encode, decode or verify.
    #[error(transparent)]
    Codec(#[from] CodecError),

    // ── Input Errors ─────────────────────────────────────────────
    /// The input file does not exist.
    #[error("file {} is not found", .0.display())]
    InputNotFound(PathBuf),

    /// A numbered frame image is absent while later frames exist, or no
    /// frame could be extracted at all.
    #[error("frame {index} is missing; the video is truncated or was not produced by videor")]
    MissingFrame { index: usize },

    /// An extracted frame does not have the configured size.
    #[error("frame {index} is {actual_width}x{actual_height}, expected {expected}")]
    FrameResolutionMismatch {
        index: usize,
        expected: Resolution,
        actual_width: u32,
        actual_height: u32,
    },

    // ── External Tool Errors ─────────────────────────────────────
    /// The video tool could not be started.
    #[error("cannot run {program}: {source}")]
    MuxerUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The video tool ran and reported failure.
    #[error("{program} failed ({status}): {stderr}")]
    MuxerFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    // ── I/O Errors ───────────────────────────────────────────────
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame image could not be read or written.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // ── Runtime Errors ───────────────────────────────────────────
    /// A blocking worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The user interrupted the session.
    #[error("interrupted")]
    Interrupted,
}

impl VideorError {
    /// Process exit status for this error.
    ///
    /// Integrity, format and missing-frame failures get their own codes so
    /// scripts can tell corruption apart from environment problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            VideorError::Codec(e) => match e.root() {
                CodecError::Integrity { .. } => 2,
                CodecError::UnrecognizedFormat(_) => 3,
                _ => 1,
            },
            VideorError::MissingFrame { .. } => 4,
            VideorError::Interrupted => 130,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_classify_codec_failures() {
        let integrity: VideorError = CodecError::Integrity {
            expected: "a".into(),
            actual: "b".into(),
        }
        .at_frame(3)
        .into();
        assert_eq!(integrity.exit_code(), 2);

        let format: VideorError = CodecError::UnrecognizedFormat("missing magic marker").into();
        assert_eq!(format.exit_code(), 3);

        assert_eq!(VideorError::MissingFrame { index: 1 }.exit_code(), 4);
        assert_eq!(VideorError::from(CodecError::EmptySequence).exit_code(), 1);
    }

    #[test]
    fn missing_input_names_the_path() {
        let e = VideorError::InputNotFound(PathBuf::from("/tmp/nope.bin"));
        assert!(e.to_string().contains("/tmp/nope.bin"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: VideorError = io_err.into();
        assert!(matches!(e, VideorError::Io(_)));
    }
}
