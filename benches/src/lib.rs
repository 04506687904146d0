//! Benchmark helper utilities for `retropix-rs`.
//!
//! This module generates synthetic compressed streams for the codec
//! benchmarks. The generators produce valid packet streams whose decoded
//! size is known up front, so the benches can report true throughput
//! without shipping binary fixtures.

/// Builds a Packbits stream that decodes to `unpacked` bytes, mixing
/// runs and literal packets the way scanned artwork does.
pub fn generate_packbits_stream(unpacked: usize) -> Vec<u8> {
	let mut packed = Vec::new();
	let mut remaining = unpacked;
	let mut flavor = 0u8;

	while remaining > 0 {
		if flavor % 3 == 1 || remaining < 2 {
			// Short literal
			let count = remaining.min(8);
			packed.push((count - 1) as u8);
			for i in 0..count {
				packed.push((i as u8).wrapping_mul(29).wrapping_add(flavor));
			}
			remaining -= count;
		} else {
			// Run of up to 64
			let count = remaining.min(64);
			packed.push((256 - (count - 1)) as u8);
			packed.push(flavor.wrapping_mul(37));
			remaining -= count;
		}
		flavor = flavor.wrapping_add(1);
	}

	packed
}

/// Builds a Targa RLE stream of `pixels` 24-bit pixels alternating runs
/// and literal spans.
pub fn generate_targa_stream(pixels: usize) -> Vec<u8> {
	let mut packed = Vec::new();
	let mut remaining = pixels;
	let mut tone = 0u8;

	while remaining > 0 {
		if tone % 2 == 0 {
			let count = remaining.min(96);
			packed.push(0x80 | (count - 1) as u8);
			packed.extend_from_slice(&[tone, tone.wrapping_add(5), tone.wrapping_mul(3)]);
			remaining -= count;
		} else {
			let count = remaining.min(32);
			packed.push((count - 1) as u8);
			for i in 0..count {
				let v = (i as u8).wrapping_add(tone);
				packed.extend_from_slice(&[v, v.wrapping_mul(7), v ^ 0x55]);
			}
			remaining -= count;
		}
		tone = tone.wrapping_add(1);
	}

	packed
}

/// Mirrors the decoder's code-size progression while packing TIFF LZW
/// codes MSB-first.
struct TiffLzwPacker {
	bytes: Vec<u8>,
	data: u32,
	bits: u32,
	code_size: u32,
	code_mask: u32,
	free: u16,
	seen_first: bool,
}

impl TiffLzwPacker {
	fn new() -> Self {
		Self {
			bytes: Vec::new(),
			data: 0,
			bits: 0,
			code_size: 9,
			code_mask: 511,
			free: 258,
			seen_first: false,
		}
	}

	fn push(&mut self, code: u16) {
		self.data = (self.data << self.code_size) | u32::from(code);
		self.bits += self.code_size;
		while self.bits >= 8 {
			self.bytes.push((self.data >> (self.bits - 8)) as u8);
			self.bits -= 8;
		}

		if code == 256 {
			self.code_size = 9;
			self.code_mask = 511;
			self.free = 258;
			self.seen_first = false;
		} else if code != 257 {
			if !self.seen_first {
				self.seen_first = true;
			} else {
				if u32::from(self.free) == self.code_mask && self.code_size < 12 {
					self.code_size += 1;
					self.code_mask = (1 << self.code_size) - 1;
				}
				if self.free < 4095 {
					self.free += 1;
				}
			}
		}
	}

	fn finish(mut self) -> Vec<u8> {
		if self.bits > 0 {
			self.bytes.push((self.data << (8 - self.bits)) as u8);
		}
		self.bytes
	}
}

/// Builds a TIFF LZW stream of `symbols` literal byte codes, exercising
/// the code-size growth path.
pub fn generate_tiff_lzw_stream(symbols: usize) -> Vec<u8> {
	let mut packer = TiffLzwPacker::new();
	packer.push(256);
	for i in 0..symbols {
		packer.push((i % 251) as u16);
	}
	packer.push(257);
	packer.finish()
}

/// Common benchmark sizes for synthetic streams, in decoded bytes.
pub mod sizes {
	/// One 640-pixel scanline of 8-bit data
	pub const SCANLINE: usize = 640;
	/// A small 64x64 8-bit tile
	pub const TILE: usize = 64 * 64;
	/// A full 640x480 8-bit frame
	pub const FRAME: usize = 640 * 480;
}

#[cfg(test)]
mod tests {
	use retropix_codec::codec::{Codec, CodecStatus, PackbitsCodec, TargaRleCodec, TiffLzwCodec};

	use super::*;

	#[test]
	fn packbits_stream_decodes_to_requested_size() {
		let packed = generate_packbits_stream(sizes::TILE);
		let mut dest = vec![0u8; sizes::TILE];
		let mut codec = PackbitsCodec::new();
		let (_, produced) = codec.decode(&packed, &mut dest);
		assert_eq!(produced, sizes::TILE);
		assert_eq!(codec.status(), CodecStatus::Ok);
	}

	#[test]
	fn targa_stream_decodes_to_requested_size() {
		let packed = generate_targa_stream(1000);
		let mut dest = vec![0u8; 3000];
		let mut codec = TargaRleCodec::new(24);
		let (_, produced) = codec.decode(&packed, &mut dest);
		assert_eq!(produced, 3000);
		assert_eq!(codec.status(), CodecStatus::Ok);
	}

	#[test]
	fn tiff_lzw_stream_decodes_to_requested_size() {
		let packed = generate_tiff_lzw_stream(sizes::SCANLINE);
		let mut dest = vec![0u8; sizes::SCANLINE];
		let mut codec = TiffLzwCodec::new();
		let (_, produced) = codec.decode(&packed, &mut dest);
		assert_eq!(produced, sizes::SCANLINE);
	}
}
