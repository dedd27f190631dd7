//! Numbered still images in a scratch directory.
//!
//! Frame `i` (1-based) lives at `frame_{i:06}.png`, which is also the
//! pattern handed to the video tool. PNG is lossless, so a grid written
//! and read back is bit-identical.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use videor_core::{CodecError, Grid, Pixel, Resolution};

use crate::error::VideorError;

/// printf-style pattern for the video tool.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

// ── ChannelOrder ─────────────────────────────────────────────────

/// How a pixel's three bytes map onto the image's R, G, B channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// First byte in blue, last byte in red.
    #[default]
    Bgr,
    /// First byte in red.
    Rgb,
}

impl ChannelOrder {
    /// Image channels for a pixel. Both orders are their own inverse.
    pub fn to_image(self, pixel: Pixel) -> [u8; 3] {
        let [a, b, c] = pixel.0;
        match self {
            ChannelOrder::Bgr => [c, b, a],
            ChannelOrder::Rgb => [a, b, c],
        }
    }

    /// Pixel for image channels.
    pub fn from_image(self, rgb: [u8; 3]) -> Pixel {
        Pixel(self.to_image(Pixel(rgb)))
    }
}

// ── FrameStore ───────────────────────────────────────────────────

/// Reads and writes numbered frame images in one directory.
#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
    order: ChannelOrder,
}

impl FrameStore {
    pub fn new(dir: impl Into<PathBuf>, order: ChannelOrder) -> Self {
        Self {
            dir: dir.into(),
            order,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path pattern for the video tool.
    pub fn pattern(&self) -> PathBuf {
        self.dir.join(FRAME_PATTERN)
    }

    /// Path of frame `index` (1-based).
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }

    /// Write every grid as `frame_000001.png`, `frame_000002.png`, …
    pub fn write_all(&self, grids: &[Grid]) -> Result<(), VideorError> {
        grids
            .par_iter()
            .enumerate()
            .try_for_each(|(i, grid)| self.write_frame(i + 1, grid))
    }

    /// Write one grid as frame `index`.
    pub fn write_frame(&self, index: usize, grid: &Grid) -> Result<(), VideorError> {
        let res = grid.resolution();
        let raw: Vec<u8> = grid
            .pixels()
            .iter()
            .flat_map(|p| self.order.to_image(*p))
            .collect();
        let image = RgbImage::from_raw(res.width(), res.height(), raw).ok_or(
            CodecError::GridSizeMismatch {
                expected: res.pixel_count(),
                actual: grid.pixels().len(),
            },
        )?;
        image.save_with_format(self.frame_path(index), ImageFormat::Png)?;
        Ok(())
    }

    /// Read frame `index`, checking it has the session resolution.
    pub fn read_frame(&self, index: usize, resolution: Resolution) -> Result<Grid, VideorError> {
        let image = image::open(self.frame_path(index))?.to_rgb8();
        let (width, height) = image.dimensions();
        if (width, height) != (resolution.width(), resolution.height()) {
            return Err(VideorError::FrameResolutionMismatch {
                index,
                expected: resolution,
                actual_width: width,
                actual_height: height,
            });
        }

        let pixels = image.pixels().map(|p| self.order.from_image(p.0)).collect();
        Ok(Grid::from_pixels(resolution, pixels)?)
    }

    /// Number of contiguous frames starting at 1.
    ///
    /// Fails with [`VideorError::MissingFrame`] when there are none, or
    /// when a gap is followed by more frames.
    pub fn count(&self) -> Result<usize, VideorError> {
        let mut indices = BTreeSet::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            if let Some(index) = name.to_str().and_then(parse_frame_name) {
                indices.insert(index);
            }
        }

        let contiguous = (1..).take_while(|i| indices.contains(i)).count();
        if contiguous == 0 || indices.len() != contiguous {
            return Err(VideorError::MissingFrame {
                index: contiguous + 1,
            });
        }
        Ok(contiguous)
    }

    /// Read every frame, in order.
    pub fn read_all(&self, resolution: Resolution) -> Result<Vec<Grid>, VideorError> {
        let count = self.count()?;
        debug!(frames = count, dir = %self.dir.display(), "reading frames");

        (1..=count)
            .into_par_iter()
            .map(|index| self.read_frame(index, resolution))
            .collect()
    }
}

fn parse_frame_name(name: &str) -> Option<usize> {
    name.strip_prefix("frame_")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(res: Resolution, seed: u8) -> Grid {
        let pixels = (0..res.pixel_count())
            .map(|i| {
                let v = (i as u8).wrapping_mul(seed);
                Pixel([v, v.wrapping_add(1), v.wrapping_add(2)])
            })
            .collect();
        Grid::from_pixels(res, pixels).unwrap()
    }

    #[test]
    fn channel_orders_are_self_inverse() {
        let p = Pixel([1, 2, 3]);
        assert_eq!(ChannelOrder::Bgr.to_image(p), [3, 2, 1]);
        assert_eq!(ChannelOrder::Rgb.to_image(p), [1, 2, 3]);
        for order in [ChannelOrder::Bgr, ChannelOrder::Rgb] {
            assert_eq!(order.from_image(order.to_image(p)), p);
        }
    }

    #[test]
    fn frame_names_are_zero_padded() {
        let store = FrameStore::new("/scratch", ChannelOrder::Rgb);
        assert_eq!(store.frame_path(7), Path::new("/scratch/frame_000007.png"));
        assert_eq!(store.pattern(), Path::new("/scratch/frame_%06d.png"));
        assert_eq!(parse_frame_name("frame_000042.png"), Some(42));
        assert_eq!(parse_frame_name("frame_1234567.png"), Some(1_234_567));
        assert_eq!(parse_frame_name("other.png"), None);
    }

    #[test]
    fn frames_survive_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resolution::new(7, 5).unwrap();
        let grids = vec![grid(res, 3), grid(res, 11), grid(res, 29)];

        for order in [ChannelOrder::Bgr, ChannelOrder::Rgb] {
            let store = FrameStore::new(dir.path(), order);
            store.write_all(&grids).unwrap();
            assert_eq!(store.count().unwrap(), 3);
            assert_eq!(store.read_all(res).unwrap(), grids);
        }
    }

    #[test]
    fn bgr_writes_first_byte_to_blue() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resolution::new(4, 3).unwrap();
        let mut pixels = vec![Pixel::BLACK; 12];
        pixels[0] = Pixel([0x44, 0x4d, 0x01]);
        let store = FrameStore::new(dir.path(), ChannelOrder::Bgr);
        store
            .write_frame(1, &Grid::from_pixels(res, pixels).unwrap())
            .unwrap();

        let image = image::open(store.frame_path(1)).unwrap().to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [0x01, 0x4d, 0x44]);
    }

    #[test]
    fn empty_directory_is_missing_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameStore::new(dir.path(), ChannelOrder::Bgr);
        assert!(matches!(
            store.read_all(Resolution::new(4, 3).unwrap()),
            Err(VideorError::MissingFrame { index: 1 })
        ));
    }

    #[test]
    fn gap_is_missing_frame() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resolution::new(4, 3).unwrap();
        let store = FrameStore::new(dir.path(), ChannelOrder::Bgr);
        store.write_all(&[grid(res, 1), grid(res, 2), grid(res, 3)]).unwrap();
        std::fs::remove_file(store.frame_path(2)).unwrap();

        assert!(matches!(
            store.count(),
            Err(VideorError::MissingFrame { index: 2 })
        ));
    }

    #[test]
    fn wrong_size_frame_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FrameStore::new(dir.path(), ChannelOrder::Bgr);
        store
            .write_frame(1, &grid(Resolution::new(6, 6).unwrap(), 5))
            .unwrap();

        let err = store.read_all(Resolution::new(5, 5).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            VideorError::FrameResolutionMismatch {
                index: 1,
                actual_width: 6,
                ..
            }
        ));
    }
}
