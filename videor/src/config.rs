//! Configuration for encode/decode sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};
use videor_core::{CodecError, DEFAULT_SIDE, Resolution};

use crate::frames::ChannelOrder;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideorConfig {
    /// Frame geometry and worker pool.
    pub codec: CodecConfig,
    /// External video tool settings.
    pub video: VideoConfig,
    /// Still-image settings.
    pub frames: FrameConfig,
    /// Post-processing of decoded output.
    pub output: OutputConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Frame geometry and worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Width and height of every (square) frame. Must match between
    /// encode and decode; it is not stored in the video.
    pub side_length: u32,
    /// Frame-level worker threads (0 = one per CPU).
    pub workers: usize,
}

/// External video tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// ffmpeg executable (name on `PATH` or absolute path).
    pub ffmpeg: String,
    /// Lossless video codec.
    pub codec: String,
    /// Frames per second of the produced video.
    pub framerate: u32,
    /// Pixel format for both muxing and frame extraction. Must be a
    /// non-subsampled RGB format or decoding will fail verification.
    pub pixel_format: String,
    /// Extension appended to encode outputs that lack it.
    pub container_extension: String,
}

/// Still-image settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Channel order used when writing pixels to images.
    pub channel_order: ChannelOrder,
}

/// Post-processing of decoded output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run `file` on the decoded output and log what it reports.
    pub describe: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            side_length: DEFAULT_SIDE,
            workers: 0,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".into(),
            codec: "ffvhuff".into(),
            framerate: 25,
            pixel_format: "rgb24".into(),
            container_extension: "avi".into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { describe: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl VideorConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::debug!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The default configuration as TOML (for `--gen-config`).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// The session resolution: a square of `side_length`.
    pub fn resolution(&self) -> Result<Resolution, CodecError> {
        Resolution::square(self.codec.side_length)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = toml::to_string_pretty(&VideorConfig::default()).unwrap();
        assert!(text.contains("side_length"));
        assert!(text.contains("ffvhuff"));
        assert!(text.contains("channel_order = \"bgr\""));
    }

    #[test]
    fn roundtrip_config() {
        let text = toml::to_string_pretty(&VideorConfig::default()).unwrap();
        let parsed: VideorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.codec.side_length, 500);
        assert_eq!(parsed.video.framerate, 25);
        assert_eq!(parsed.frames.channel_order, ChannelOrder::Bgr);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: VideorConfig = toml::from_str("[codec]\nside_length = 64\n").unwrap();
        assert_eq!(parsed.codec.side_length, 64);
        assert_eq!(parsed.codec.workers, 0);
        assert_eq!(parsed.video.ffmpeg, "ffmpeg");
    }

    #[test]
    fn load_falls_back_on_missing_or_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = VideorConfig::load(&dir.path().join("absent.toml"));
        assert_eq!(missing.codec.side_length, 500);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "codec = 12").unwrap();
        assert_eq!(VideorConfig::load(&bad).codec.side_length, 500);
    }

    #[test]
    fn invalid_file_warns_through_current_subscriber() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct CountWarnings(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for CountWarnings {
            fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
                if *event.metadata().level() == Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[codec]\nside_length = \"wide\"\n").unwrap();

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(CountWarnings(Arc::clone(&warnings)));
        let config = tracing::subscriber::with_default(subscriber, || VideorConfig::load(&bad));

        assert_eq!(config.codec.side_length, 500);
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videor.toml");
        std::fs::write(&path, VideorConfig::default_toml().unwrap()).unwrap();
        assert_eq!(VideorConfig::load(&path).video.codec, "ffvhuff");
    }

    #[test]
    fn tiny_side_is_rejected() {
        let mut cfg = VideorConfig::default();
        cfg.codec.side_length = 3;
        assert!(cfg.resolution().is_err());
    }
}
