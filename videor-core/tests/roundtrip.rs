//! End-to-end tests: bytes → frames → bytes through the public API, at the
//! default resolution and at small ones.

use bytes::Bytes;
use proptest::prelude::*;

use videor_core::{
    Chunker, CodecError, FrameCodec, FramePipeline, Grid, Pixel, Resolution, TrailerCodec,
};

// ── Helpers ──────────────────────────────────────────────────────

fn pseudo_random(len: usize, seed: u32) -> Bytes {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let data: Vec<u8> = (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    Bytes::from(data)
}

// ── Default resolution ───────────────────────────────────────────

#[test]
fn hello_world_is_a_single_trailer() {
    let pipeline = FramePipeline::new(Resolution::default(), 0).unwrap();
    let data = Bytes::from_static(b"hello world");

    let frames = pipeline.encode(&data).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(pipeline.decode(&frames).unwrap(), b"hello world");
}

#[test]
fn one_full_frame_plus_five_bytes() {
    let res = Resolution::square(500).unwrap();
    let pipeline = FramePipeline::new(res, 0).unwrap();
    let data = pseudo_random(3 * 500 * 500 - 32 + 5, 1);

    let frames = pipeline.encode(&data).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(
        TrailerCodec::new(res).decode(&frames[1]).unwrap(),
        data[data.len() - 5..].to_vec()
    );
    assert_eq!(pipeline.decode(&frames).unwrap(), data.to_vec());
}

// ── Structure ────────────────────────────────────────────────────

#[test]
fn regular_frames_fill_the_grid_exactly() {
    let res = Resolution::new(9, 7).unwrap();
    let data = pseudo_random(4 * res.frame_capacity() + 11, 2);
    let chunks = Chunker::new(res).split(&data).unwrap();
    let codec = FrameCodec::new(res);

    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(64 + 2 * chunk.len(), 6 * res.pixel_count());
        let grid = codec.encode(chunk).unwrap();
        assert_eq!(grid.to_hex().len(), res.hex_len());
    }
}

#[test]
fn empty_input_roundtrips_through_one_frame() {
    let pipeline = FramePipeline::new(Resolution::new(4, 3).unwrap(), 1).unwrap();
    let frames = pipeline.encode(&Bytes::new()).unwrap();

    assert_eq!(frames.len(), 1);
    assert!(pipeline.decode(&frames).unwrap().is_empty());
}

#[test]
fn exact_multiple_roundtrips() {
    let res = Resolution::new(5, 5).unwrap();
    let pipeline = FramePipeline::new(res, 3).unwrap();
    let data = pseudo_random(3 * res.frame_capacity(), 3);

    let frames = pipeline.encode(&data).unwrap();
    assert_eq!(frames.len(), 4);
    assert_eq!(pipeline.decode(&frames).unwrap(), data.to_vec());
}

#[test]
fn unrepresentable_tail_is_reported() {
    let res = Resolution::new(5, 5).unwrap();
    let pipeline = FramePipeline::new(res, 1).unwrap();
    let data = pseudo_random(2 * res.frame_capacity() - 1, 4);

    assert!(matches!(
        pipeline.encode(&data),
        Err(CodecError::UnrepresentableLength { .. })
    ));
}

#[test]
fn missing_last_frame_is_detected() {
    let res = Resolution::new(5, 5).unwrap();
    let pipeline = FramePipeline::new(res, 2).unwrap();
    let mut frames = pipeline
        .encode(&pseudo_random(2 * res.frame_capacity() + 40, 5))
        .unwrap();
    frames.pop();

    let err = pipeline.decode(&frames).unwrap_err();
    assert_eq!(err.frame_index(), Some(2));
    assert!(matches!(err.root(), CodecError::UnrecognizedFormat(_)));
}

#[test]
fn black_regular_frame_fails_integrity() {
    let res = Resolution::new(5, 5).unwrap();
    let pipeline = FramePipeline::new(res, 2).unwrap();
    let mut frames = pipeline
        .encode(&pseudo_random(res.frame_capacity() + 1, 6))
        .unwrap();
    frames[0] = Grid::from_pixels(res, vec![Pixel::BLACK; res.pixel_count()]).unwrap();

    let err = pipeline.decode(&frames).unwrap_err();
    assert!(matches!(err.root(), CodecError::Integrity { .. }));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_bytes_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..400), side in 4u32..9) {
        let res = Resolution::square(side).unwrap();
        let cap = res.frame_capacity();
        prop_assume!(data.len() % cap != cap - 1);

        let pipeline = FramePipeline::new(res, 2).unwrap();
        let frames = pipeline.encode(&Bytes::from(data.clone())).unwrap();
        prop_assert_eq!(frames.len(), data.len() / cap + 1);
        prop_assert_eq!(pipeline.decode(&frames).unwrap(), data);
    }

    #[test]
    fn flipped_regular_byte_is_detected(
        seed in any::<u32>(),
        pixel in 0usize..36,
        channel in 0usize..3,
        mask in 1u8..=255,
    ) {
        let res = Resolution::square(6).unwrap();
        let codec = FrameCodec::new(res);
        let chunk = pseudo_random(res.frame_capacity(), seed);

        let mut pixels = codec.encode(&chunk).unwrap().pixels().to_vec();
        pixels[pixel].0[channel] ^= mask;
        let grid = Grid::from_pixels(res, pixels).unwrap();
        let is_integrity_error = matches!(codec.decode(&grid), Err(CodecError::Integrity { .. }));
        prop_assert!(is_integrity_error);
    }
}
