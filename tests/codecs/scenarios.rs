//! End-to-end packet scenarios, one per codec family.

use retropix_rs::prelude::*;

use crate::init_logging;

#[test]
fn packbits_run_literal_and_noop() {
	init_logging();

	// Expand -2+1 = 3 copies of 0xAA, literal 2+1 = 3 bytes, -128 no-op
	let packed = [0xFE, 0xAA, 0x02, 0x10, 0x20, 0x30, 0x80];
	let mut dest = [0u8; 6];
	let mut codec = PackbitsCodec::new();

	let (consumed, produced) = codec.decode(&packed, &mut dest);
	assert_eq!(dest, [0xAA, 0xAA, 0xAA, 0x10, 0x20, 0x30]);
	assert_eq!(produced, 6);
	assert_eq!(codec.status(), CodecStatus::Ok);
	assert_eq!(codec.compressed_available() + consumed, packed.len());
}

#[test]
fn targa_24bit_run_then_literals() {
	init_logging();

	// Run of three (1,2,3) pixels, then two literal pixels
	let packed = [0x82, 0x01, 0x02, 0x03, 0x01, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
	let mut dest = [0u8; 15];
	let mut codec = TargaRleCodec::new(24);

	let (_, produced) = codec.decode(&packed, &mut dest);
	assert_eq!(produced, 15);
	assert_eq!(dest, [1, 2, 3, 1, 2, 3, 1, 2, 3, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
	assert_eq!(codec.status(), CodecStatus::Ok);
}

#[test]
fn pcx_runs_and_single_byte_literals() {
	init_logging();

	let packed = [0xC3, 0x55, 0x07, 0xC2, 0xAA];
	let mut dest = [0u8; 6];
	let mut codec = PcxRleCodec::new();

	let (_, produced) = codec.decode(&packed, &mut dest);
	assert_eq!(produced, 6);
	assert_eq!(dest, [0x55, 0x55, 0x55, 0x07, 0xAA, 0xAA]);
	assert_eq!(codec.status(), CodecStatus::Ok);
}

#[test]
fn gif_lzw_roundtrips_two_symbols() {
	init_logging();

	// Initial code size 2: clear=4, EOI=5; stream is clear, 0, 1, EOI
	let packed = [0x44, 0x0A];
	let mut dest = [0u8; 2];
	let mut codec = GifLzwCodec::new(2);

	let (_, produced) = codec.decode(&packed, &mut dest);
	assert_eq!(produced, 2);
	assert_eq!(dest, [0, 1]);
	assert_eq!(codec.status(), CodecStatus::Ok);
}

#[test]
fn sgi_literal_run_and_terminator() {
	init_logging();

	// Literal of 3, run of 2 0xAA, zero-count terminator
	let packed = [0x83, 0x01, 0x02, 0x03, 0x02, 0xAA, 0x00];
	let mut dest = [0u8; 5];
	let mut codec = SgiRleCodec::new(8);

	let (consumed, produced) = codec.decode(&packed, &mut dest);
	assert_eq!((consumed, produced), (7, 5));
	assert_eq!(dest, [0x01, 0x02, 0x03, 0xAA, 0xAA]);
	assert_eq!(codec.status(), CodecStatus::Ok);
}

#[test]
fn noop_copy_flags_any_size_mismatch() {
	init_logging();

	let mut dest = [0u8; 2];
	let mut codec = NoCompressionCodec::new();
	let (consumed, produced) = codec.decode(&[0x0A, 0x0B, 0x0C, 0x0D], &mut dest);
	assert_eq!((consumed, produced), (2, 2));
	assert_eq!(dest, [0x0A, 0x0B]);
	assert_eq!(codec.status(), CodecStatus::NotEnoughInput);

	// Matching sizes are the clean case
	codec.decode_init();
	let mut exact = [0u8; 4];
	codec.decode(&[1, 2, 3, 4], &mut exact);
	assert_eq!(codec.status(), CodecStatus::Ok);
}

#[test]
fn decode_to_vec_runs_the_full_lifecycle() {
	init_logging();

	let mut codec = PspRleCodec::new();
	let unpacked =
		decode_to_vec(&mut codec, &[0x83, 0x42, 0x02, 0x10, 0x20], 5).expect("valid psp stream");
	assert_eq!(unpacked, [0x42, 0x42, 0x42, 0x10, 0x20]);
}

#[test]
fn ccitt_first_row_survives_garbage_prefix() {
	init_logging();

	// Garbage (no embedded EOL), a real EOL, then white 4 / black 4
	let packed = [0xAD, 0x5B, 0x00, 0x01, 0xB6];
	let mut dest = [0u8; 1];
	let mut codec = CcittFax3Codec::new(FaxOptions::default(), false, false, 8);

	let (_, produced) = codec.decode(&packed, &mut dest);
	assert_eq!(produced, 1);
	assert_eq!(dest, [0x0F]);

	// Reference: the same row without the garbage prefix
	let mut reference = [0u8; 1];
	let mut codec = CcittMhCodec::new(FaxOptions::default(), false, false, 8);
	codec.decode(&[0xB6], &mut reference);
	assert_eq!(dest, reference);
}

#[test]
fn targa_encode_decode_is_identity() {
	init_logging();

	let pixels: Vec<u8> = (0u32..1024)
		.map(|i| if i % 37 < 20 { 0x7F } else { (i % 253) as u8 })
		.collect();

	let mut codec = TargaRleCodec::new(8);
	let mut packed = vec![0u8; pixels.len() * 2 + 32];
	let stored = codec.encode(&pixels, &mut packed);
	assert_eq!(codec.status(), CodecStatus::Ok);

	// Worst case adds one header byte per 128 pixels
	assert!(stored <= pixels.len() + pixels.len().div_ceil(128) + 1);

	codec.decode_init();
	let mut unpacked = vec![0u8; pixels.len()];
	let (_, produced) = codec.decode(&packed[..stored], &mut unpacked);
	assert_eq!(produced, pixels.len());
	assert_eq!(unpacked, pixels);
}

#[test]
fn lzw_decoding_is_deterministic() {
	init_logging();

	let packed = [0x44, 0x0A];
	let mut first = [0u8; 2];
	let mut second = [0u8; 2];

	let mut codec = GifLzwCodec::new(2);
	codec.decode(&packed, &mut first);

	codec.decode_init();
	codec.decode(&packed, &mut second);
	assert_eq!(first, second);
}
