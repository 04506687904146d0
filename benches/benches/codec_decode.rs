//! Benchmark suite for the codec core.
//!
//! Measures decode throughput of the hot codecs over synthetic streams
//! with known decoded sizes.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use retropix_benches::{
	generate_packbits_stream, generate_targa_stream, generate_tiff_lzw_stream, sizes,
};
use retropix_codec::codec::{Codec, PackbitsCodec, TargaRleCodec, TiffLzwCodec};
use std::hint::black_box;

/// Benchmark Packbits decoding across workload sizes
fn bench_packbits_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("packbits_decode");

	for (name, unpacked) in [
		("scanline", sizes::SCANLINE),
		("tile", sizes::TILE),
		("frame", sizes::FRAME),
	] {
		let packed = generate_packbits_stream(unpacked);
		group.throughput(Throughput::Bytes(unpacked as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &packed, |b, packed| {
			let mut dest = vec![0u8; unpacked];
			b.iter(|| {
				let mut codec = PackbitsCodec::new();
				let result = codec.decode(black_box(packed), &mut dest);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark Targa RLE decoding and encoding
fn bench_targa_roundtrip(c: &mut Criterion) {
	let mut group = c.benchmark_group("targa_rle");

	let pixels = sizes::TILE;
	let packed = generate_targa_stream(pixels);
	let unpacked_len = pixels * 3;

	group.throughput(Throughput::Bytes(unpacked_len as u64));
	group.bench_function("decode_24bit", |b| {
		let mut dest = vec![0u8; unpacked_len];
		b.iter(|| {
			let mut codec = TargaRleCodec::new(24);
			let result = codec.decode(black_box(&packed), &mut dest);
			black_box(result)
		});
	});

	// Encode benchmark runs over the decoded pixels
	let mut pixels_raw = vec![0u8; unpacked_len];
	let mut codec = TargaRleCodec::new(24);
	codec.decode(&packed, &mut pixels_raw);

	group.bench_function("encode_24bit", |b| {
		let mut out = vec![0u8; unpacked_len * 2];
		b.iter(|| {
			let mut codec = TargaRleCodec::new(24);
			let stored = codec.encode(black_box(&pixels_raw), &mut out);
			black_box(stored)
		});
	});

	group.finish();
}

/// Benchmark the MSB-first LZW decoder
fn bench_tiff_lzw_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("tiff_lzw");

	for (name, symbols) in [("scanline", sizes::SCANLINE), ("tile", sizes::TILE)] {
		let packed = generate_tiff_lzw_stream(symbols);
		group.throughput(Throughput::Bytes(symbols as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &packed, |b, packed| {
			let mut dest = vec![0u8; symbols];
			b.iter(|| {
				let mut codec = TiffLzwCodec::new();
				let result = codec.decode(black_box(packed), &mut dest);
				black_box(result)
			});
		});
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_packbits_decode,
	bench_targa_roundtrip,
	bench_tiff_lzw_decode,
);

criterion_main!(benches);
