//! ThunderScan 4-bit delta/run codec.
//!
//! Every input byte is a 2-bit opcode over a 6-bit payload: a run of the
//! last pixel, three 2-bit deltas, two 3-bit deltas, or a raw pixel value.
//! Two pixels pack into each output byte, high nibble first, and a run
//! that starts on a pending high nibble merges its first pixel into it.

use super::{Codec, CodecCounters, CodecStatus};

/// 2-bit delta values; index 2 skips the pixel slot.
const TWO_BIT_DELTAS: [i8; 4] = [0, 1, 0, -1];
const TWO_BIT_SKIP: usize = 2;

/// 3-bit delta values; index 4 skips the pixel slot.
const THREE_BIT_DELTAS: [i8; 8] = [0, 1, 2, 3, 0, -3, -2, -1];
const THREE_BIT_SKIP: usize = 4;

/// Decoder for ThunderScan-compressed strips.
#[derive(Debug)]
pub struct ThunderCodec {
	counters: CodecCounters,
	/// Line length parameter fixed at construction; a row holds
	/// `2 * width` pixels
	width: usize,
	last_pixel: u8,
	pixels_in_row: usize,
}

impl ThunderCodec {
	/// Creates a decoder for rows of the given line length.
	///
	/// A zero line length leaves the codec in `InitializationError`.
	pub fn new(width: usize) -> Self {
		let counters = if width == 0 {
			log::debug!("thunder line length must not be zero");
			CodecCounters::failed_init()
		} else {
			CodecCounters::new()
		};

		Self {
			counters,
			width,
			last_pixel: 0,
			pixels_in_row: 0,
		}
	}

	fn row_pixels(&self) -> usize {
		2 * self.width
	}

	/// Writes one pixel nibble; returns false when the destination is full.
	fn put(&mut self, dest: &mut [u8], dst: &mut usize, value: u8) -> bool {
		if *dst >= dest.len() {
			self.counters.status = CodecStatus::OutputBufferTooSmall;
			return false;
		}

		if self.pixels_in_row % 2 == 0 {
			dest[*dst] = (value & 0x0F) << 4;
		} else {
			dest[*dst] |= value & 0x0F;
			*dst += 1;
		}
		self.pixels_in_row += 1;

		if self.pixels_in_row == self.row_pixels() {
			// Rows are independent: the delta reference starts over
			self.pixels_in_row = 0;
			self.last_pixel = 0;
		}
		true
	}

	/// Pixels still writable in the current row.
	fn row_remaining(&self) -> usize {
		self.row_pixels() - self.pixels_in_row
	}
}

impl Codec for ThunderCodec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.last_pixel = 0;
		self.pixels_in_row = 0;
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let mut src = 0;
		let mut dst = 0;

		'decode: while src < source.len() && dst < dest.len() {
			let byte = source[src];
			src += 1;

			let opcode = byte >> 6;
			let payload = byte & 0x3F;

			match opcode {
				0 => {
					// Run of the previous pixel, clamped to the row
					let count = usize::from(payload).min(self.row_remaining());
					for _ in 0..count {
						let pixel = self.last_pixel;
						if !self.put(dest, &mut dst, pixel) {
							break 'decode;
						}
					}
				}
				1 => {
					for shift in [4u8, 2, 0] {
						let index = usize::from((payload >> shift) & 0x03);
						if index == TWO_BIT_SKIP {
							continue;
						}
						self.last_pixel =
							self.last_pixel.wrapping_add_signed(TWO_BIT_DELTAS[index]);
						let pixel = self.last_pixel;
						if !self.put(dest, &mut dst, pixel) {
							break 'decode;
						}
					}
				}
				2 => {
					for shift in [3u8, 0] {
						let index = usize::from((payload >> shift) & 0x07);
						if index == THREE_BIT_SKIP {
							continue;
						}
						self.last_pixel =
							self.last_pixel.wrapping_add_signed(THREE_BIT_DELTAS[index]);
						let pixel = self.last_pixel;
						if !self.put(dest, &mut dst, pixel) {
							break 'decode;
						}
					}
				}
				_ => {
					self.last_pixel = payload;
					let pixel = self.last_pixel;
					if !self.put(dest, &mut dst, pixel) {
						break 'decode;
					}
				}
			}
		}

		// Count a pending high nibble as written output
		let produced = dst + usize::from(self.pixels_in_row % 2 == 1).min(dest.len() - dst);

		if self.counters.status == CodecStatus::Ok && produced < dest.len() && src >= source.len() {
			self.counters.status = CodecStatus::NotEnoughInput;
		}

		self.counters.end_call(source.len(), src, produced);
		(src, produced)
	}
}
