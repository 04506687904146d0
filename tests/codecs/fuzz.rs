//! Randomized bounds-safety and counter-law tests.
//!
//! Every decoder gets random garbage, random sizes and truncated valid
//! streams. Seeds are fixed so failures reproduce.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use retropix_rs::prelude::*;

use crate::init_logging;

/// Runs one decode call and checks the invariants that must hold for any
/// input whatsoever.
fn assert_contract<C: Codec>(codec: &mut C, source: &[u8], dest: &mut [u8]) {
	let source_len = source.len();
	let dest_len = dest.len();

	let (consumed, produced) = codec.decode(source, dest);

	assert!(consumed <= source_len, "consumed {consumed} of {source_len}");
	assert!(produced <= dest_len, "produced {produced} into {dest_len}");
	assert_eq!(
		codec.compressed_available() + consumed,
		source_len,
		"counter law violated with status {:?}",
		codec.status()
	);
	assert_eq!(codec.decompressed_bytes(), produced);
	assert_ne!(codec.status(), CodecStatus::InternalError);
}

fn random_buffer(rng: &mut SmallRng, max_len: usize) -> Vec<u8> {
	let len = rng.random_range(1..=max_len);
	let mut buffer = vec![0u8; len];
	rng.fill(&mut buffer[..]);
	buffer
}

/// Feeds `rounds` random source/destination pairs through a fresh codec
/// per round.
fn fuzz_codec<C: Codec, F: Fn() -> C>(make: F, seed: u64, rounds: usize) {
	let mut rng = SmallRng::seed_from_u64(seed);
	for _ in 0..rounds {
		let source = random_buffer(&mut rng, 512);
		let mut dest = vec![0u8; rng.random_range(1..=512)];
		let mut codec = make();
		assert_contract(&mut codec, &source, &mut dest);
	}
}

#[test]
fn rle_family_survives_garbage() {
	init_logging();

	fuzz_codec(NoCompressionCodec::new, 1, 300);
	fuzz_codec(PackbitsCodec::new, 2, 300);
	fuzz_codec(PspRleCodec::new, 3, 300);
	fuzz_codec(PcxRleCodec::new, 4, 300);
	fuzz_codec(RlaRleCodec::new, 5, 300);
	fuzz_codec(CutRleCodec::new, 6, 300);
	fuzz_codec(VdatCodec::new, 7, 300);
}

#[test]
fn pixel_codecs_survive_garbage() {
	init_logging();

	for depth in [8u32, 15, 16, 24, 32] {
		fuzz_codec(move || TargaRleCodec::new(depth), u64::from(depth), 200);
	}
	for bits in [8u32, 16] {
		fuzz_codec(move || SgiRleCodec::new(bits), 20 + u64::from(bits), 200);
	}
	fuzz_codec(|| AmigaRgbCodec::new(AmigaRgbVariant::Rgbn), 30, 200);
	fuzz_codec(|| AmigaRgbCodec::new(AmigaRgbVariant::Rgb8), 31, 200);
	fuzz_codec(|| ThunderCodec::new(17), 32, 200);
}

#[test]
fn bitstream_codecs_survive_garbage() {
	init_logging();

	for k in 2u32..=8 {
		fuzz_codec(move || GifLzwCodec::new(k), 40 + u64::from(k), 150);
	}
	fuzz_codec(TiffLzwCodec::new, 50, 200);
	fuzz_codec(|| Lz77Codec::new(FlushMode::Finish, false), 51, 200);
	fuzz_codec(
		|| CcittFax3Codec::new(FaxOptions::default(), false, false, 64),
		52,
		150,
	);
	fuzz_codec(
		|| CcittMhCodec::new(FaxOptions::from_bits(0b100), true, true, 64),
		53,
		150,
	);
}

#[test]
fn pcd_survives_garbage() {
	init_logging();

	let mut rng = SmallRng::seed_from_u64(60);
	for _ in 0..150 {
		let source = random_buffer(&mut rng, 768);
		let mut luma = vec![0u8; 64 * 8];
		let mut c1 = vec![0u8; 32 * 4];
		let mut c2 = vec![0u8; 32 * 4];

		let mut codec = PcdCodec::new();
		codec.decode_init();
		let (consumed, _) = codec.decode_planes(&source, &mut luma, &mut c1, &mut c2, 64, 8);
		assert!(consumed <= source.len());
		assert_ne!(codec.status(), CodecStatus::InternalError);
		codec.decode_end();
	}
}

#[test]
fn truncated_valid_streams_never_panic() {
	init_logging();

	// A packbits stream with every packet kind
	let packed = [0xFE, 0xAA, 0x03, 0x01, 0x02, 0x03, 0x04, 0x80, 0xF9, 0x55];
	for cut in 1..packed.len() {
		let mut codec = PackbitsCodec::new();
		let mut dest = [0u8; 32];
		assert_contract(&mut codec, &packed[..cut], &mut dest);
	}

	// Targa with run and literal packets at every depth
	let packed = [0x82, 1, 2, 3, 0x01, 4, 5, 6, 7, 8, 9];
	for cut in 1..packed.len() {
		for depth in [8u32, 16, 24, 32] {
			let mut codec = TargaRleCodec::new(depth);
			let mut dest = [0u8; 64];
			assert_contract(&mut codec, &packed[..cut], &mut dest);
		}
	}

	// GIF LZW scenario stream
	let packed = [0x44, 0x0A];
	for cut in 1..packed.len() {
		let mut codec = GifLzwCodec::new(2);
		let mut dest = [0u8; 8];
		assert_contract(&mut codec, &packed[..cut], &mut dest);
	}
}

#[test]
fn every_codec_rejects_empty_buffers() {
	init_logging();

	let mut codec = PackbitsCodec::new();
	let mut dest = [0u8; 1];
	assert_eq!(codec.decode(&[], &mut dest), (0, 0));
	assert_eq!(codec.status(), CodecStatus::InvalidBufferSize);

	let mut codec = TiffLzwCodec::new();
	assert_eq!(codec.decode(&[0x80], &mut []), (0, 0));
	assert_eq!(codec.status(), CodecStatus::InvalidBufferSize);
}

#[test]
fn monotonic_progress_on_resumed_rle_streams() {
	init_logging();

	// Drive a packet stream through one-byte destination windows; every
	// call must consume or produce something until the stream is spent
	let packed = [0x00u8, 0x42, 0x00, 0x43, 0x00, 0x44];
	let mut codec = PackbitsCodec::new();

	let mut src = 0;
	let mut total_out = 0;
	while src < packed.len() {
		let mut window = [0u8; 1];
		let (consumed, produced) = codec.decode(&packed[src..], &mut window);
		assert!(
			consumed > 0 || produced > 0,
			"no progress at source offset {src}"
		);
		src += consumed;
		total_out += produced;
	}
	assert_eq!(total_out, 3);
}
