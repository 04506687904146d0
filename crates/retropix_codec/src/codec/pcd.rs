//! Kodak Photo-CD planar Huffman delta decoder.
//!
//! A Photo-CD sequence stream refines three caller-owned planes (luma and
//! two half-resolution chroma planes) with per-pixel deltas. The stream
//! carries its own Huffman tables up front: one for luma-only resolutions,
//! three once the width exceeds 1536. Rows are introduced by a 24-bit sync
//! marker of twenty-three ones and a zero, followed by 24 bits holding a
//! 13-bit row number, a 2-bit plane id and padding. Decoded keys are
//! signed addends applied to the existing plane bytes through a saturating
//! range-limit table.
//!
//! The codec does not fit the byte-slice [`Codec`](super::Codec) surface
//! (its destination is a plane triple), so it exposes the same lifecycle
//! as inherent methods and reports through the shared counters.

use super::{CodecCounters, CodecStatus};

/// Sliding read-buffer size for accumulator refills.
const BLOCK_SIZE: usize = 2048;

/// Sync scan patterns over the 32-bit accumulator.
const SYNC_HEAD: u32 = 0x00FF_F000;
const ROW_MARKER: u32 = 0xFFFF_FE00;

/// One Huffman table entry: a masked MSB-aligned bit sequence and the
/// signed delta key it decodes to.
#[derive(Debug, Clone, Copy)]
struct HuffmanEntry {
	length: u32,
	value: u32,
	mask: u32,
	key: i32,
}

/// MSB-aligned bit accumulator over the raw sequence data, refilled
/// through a fixed-size block buffer.
#[derive(Debug)]
struct BitAccumulator<'a> {
	data: &'a [u8],
	at: usize,
	block: [u8; BLOCK_SIZE],
	block_len: usize,
	block_pos: usize,
	acc: u32,
	bits: u32,
}

impl<'a> BitAccumulator<'a> {
	fn new(data: &'a [u8], start: usize) -> Self {
		let mut accumulator = Self {
			data,
			at: start.min(data.len()),
			block: [0; BLOCK_SIZE],
			block_len: 0,
			block_pos: 0,
			acc: 0,
			bits: 0,
		};
		accumulator.refill();
		accumulator
	}

	fn next_byte(&mut self) -> Option<u8> {
		if self.block_pos == self.block_len {
			let take = BLOCK_SIZE.min(self.data.len() - self.at);
			if take == 0 {
				return None;
			}
			self.block[..take].copy_from_slice(&self.data[self.at..self.at + take]);
			self.at += take;
			self.block_len = take;
			self.block_pos = 0;
		}
		let byte = self.block[self.block_pos];
		self.block_pos += 1;
		Some(byte)
	}

	fn refill(&mut self) {
		while self.bits <= 24 {
			let Some(byte) = self.next_byte() else {
				return;
			};
			self.acc |= u32::from(byte) << (24 - self.bits);
			self.bits += 8;
		}
	}

	/// Drops `count` bits; false once the source cannot supply them.
	fn advance(&mut self, count: u32) -> bool {
		if self.bits < count {
			self.refill();
			if self.bits < count {
				return false;
			}
		}
		self.acc <<= count;
		self.bits -= count;
		self.refill();
		true
	}

	/// Reads the top `count` bits.
	fn take(&mut self, count: u32) -> Option<u32> {
		if self.bits < count {
			self.refill();
			if self.bits < count {
				return None;
			}
		}
		let value = self.acc >> (32 - count);
		self.acc <<= count;
		self.bits -= count;
		self.refill();
		Some(value)
	}

	/// Bytes pulled out of the underlying data so far.
	fn consumed(&self) -> usize {
		self.at - (self.block_len - self.block_pos)
	}
}

/// Photo-CD sequence decoder.
#[derive(Debug)]
pub struct PcdCodec {
	counters: CodecCounters,
	range_limit: [u8; 768],
	tables: Vec<Vec<HuffmanEntry>>,
}

impl Default for PcdCodec {
	fn default() -> Self {
		Self::new()
	}
}

impl PcdCodec {
	/// Creates a Photo-CD decoder.
	pub fn new() -> Self {
		// Saturation table: sums are biased by 256, so indices cover
		// -256..512 with a flat clamp on both sides
		let mut range_limit = [0u8; 768];
		for (i, v) in range_limit.iter_mut().enumerate() {
			*v = match i {
				0..=255 => 0,
				256..=511 => (i - 256) as u8,
				_ => 255,
			};
		}

		Self {
			counters: CodecCounters::new(),
			range_limit,
			tables: Vec::new(),
		}
	}

	/// The codec's status and byte counters.
	pub fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	/// Status after the last call.
	pub fn status(&self) -> CodecStatus {
		self.counters.status
	}

	/// Prepares for a fresh sequence stream.
	pub fn decode_init(&mut self) {
		self.counters.reset();
		self.tables.clear();
	}

	/// Releases the stream's Huffman tables.
	pub fn decode_end(&mut self) {
		self.tables.clear();
		if self.counters.status == CodecStatus::Ok {
			self.counters.status = CodecStatus::Uninitialized;
		}
	}

	/// Reads one stored Huffman table: a count-minus-one byte, then per
	/// entry a length-minus-one byte, a 16-bit MSB-aligned sequence and
	/// the key byte. Returns the cursor past the table.
	fn read_table(&mut self, data: &[u8], mut at: usize) -> Option<usize> {
		let &count = data.get(at)?;
		at += 1;
		let count = usize::from(count) + 1;

		let mut table = Vec::with_capacity(count);
		for _ in 0..count {
			let entry = data.get(at..at + 4)?;
			at += 4;

			let length = u32::from(entry[0]) + 1;
			if length > 16 {
				log::debug!("pcd: huffman code length {length} exceeds 16 bits");
				return None;
			}

			let mask = !((1u32 << (32 - length)) - 1);
			let value = (u32::from(u16::from_be_bytes([entry[1], entry[2]])) << 16) & mask;
			// Keys at 128 and above are the negative range
			let key = if entry[3] >= 128 {
				i32::from(entry[3]) - 256
			} else {
				i32::from(entry[3])
			};

			table.push(HuffmanEntry {
				length,
				value,
				mask,
				key,
			});
		}

		self.tables.push(table);
		Some(at)
	}

	/// Scans for the inter-sector sync pattern, then the row marker.
	fn seek_sync(bits: &mut BitAccumulator<'_>) -> bool {
		while bits.acc & SYNC_HEAD != SYNC_HEAD {
			if !bits.advance(1) {
				return false;
			}
		}
		while bits.acc & ROW_MARKER != ROW_MARKER {
			if !bits.advance(1) {
				return false;
			}
		}
		true
	}

	/// Decodes a sequence stream into the three planes.
	///
	/// `source` is the raw sequence data with its Huffman tables at the
	/// front; `luma` must hold `width * height` bytes and each chroma
	/// plane `(width / 2) * (height / 2)`, pre-loaded with the base image
	/// the deltas refine. Returns `(bytes_consumed, bytes_produced)`
	/// where production counts every delta applied.
	pub fn decode_planes(
		&mut self,
		source: &[u8],
		luma: &mut [u8],
		chroma1: &mut [u8],
		chroma2: &mut [u8],
		width: usize,
		height: usize,
	) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), luma.len()) {
			return (0, 0);
		}
		if width == 0 || height == 0 || luma.len() < width * height {
			self.counters.status = CodecStatus::InvalidBufferSize;
			return (0, 0);
		}

		// Chroma is subsampled 2:1 in both directions
		let table_count = if width > 1536 { 3 } else { 1 };
		self.tables.clear();
		let mut at = 0;
		for _ in 0..table_count {
			match self.read_table(source, at) {
				Some(next) => at = next,
				None => {
					self.counters.status = CodecStatus::InvalidInput;
					self.counters.end_call(source.len(), source.len().min(at), 0);
					return (source.len().min(at), 0);
				}
			}
		}

		let mut bits = BitAccumulator::new(source, at);
		let mut produced = 0usize;

		if !Self::seek_sync(&mut bits) {
			self.counters.status = CodecStatus::NotEnoughInput;
			let consumed = bits.consumed();
			self.counters.end_call(source.len(), consumed, 0);
			return (consumed, 0);
		}

		// Current row window: plane buffer offset, length and table index
		let mut row_start = 0usize;
		let mut row_len = 0usize;
		let mut column = 0usize;
		let mut plane_id = 0usize;

		loop {
			if bits.acc & ROW_MARKER == ROW_MARKER {
				if !bits.advance(24) {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				}
				let Some(header) = bits.take(24) else {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				};
				let row = (header >> 11) as usize & 0x1FFF;
				let plane = (header >> 9) as usize & 0x03;

				if row >= height {
					// Regular end of the sequence
					break;
				}

				let (start, len) = match plane {
					0 => (row * width, width),
					2 | 3 => ((row >> 1) * (width / 2), width / 2),
					_ => {
						log::debug!("pcd: plane {plane} is not a valid plane id");
						self.counters.status = CodecStatus::InvalidInput;
						break;
					}
				};

				let plane_len = match plane {
					0 => luma.len(),
					2 => chroma1.len(),
					_ => chroma2.len(),
				};
				if start + len > plane_len {
					log::debug!("pcd: row {row} of plane {plane} is outside the buffer");
					self.counters.status = CodecStatus::InvalidInput;
					break;
				}

				row_start = start;
				row_len = len;
				column = 0;
				plane_id = plane;
				continue;
			}

			// Symbol phase: linear scan of the current plane's table
			let table_index = match plane_id {
				0 => 0,
				2 => 1.min(table_count - 1),
				_ => 2.min(table_count - 1),
			};
			let entry = self.tables[table_index]
				.iter()
				.find(|e| bits.acc & e.mask == e.value)
				.copied();

			let Some(entry) = entry else {
				// No prefix matches: fall back to sync recovery
				if !Self::seek_sync(&mut bits) {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				}
				continue;
			};

			if column >= row_len {
				// The row overflowed without a marker; resynchronize
				if !Self::seek_sync(&mut bits) {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				}
				continue;
			}

			let plane_buf: &mut [u8] = match plane_id {
				0 => &mut luma[..],
				2 => &mut chroma1[..],
				_ => &mut chroma2[..],
			};
			let pixel = &mut plane_buf[row_start + column];
			let sum = i32::from(*pixel) + entry.key + 256;
			*pixel = self.range_limit[sum.clamp(0, 767) as usize];
			column += 1;
			produced += 1;

			if !bits.advance(entry.length) {
				self.counters.status = CodecStatus::NotEnoughInput;
				break;
			}
		}

		let consumed = bits.consumed();
		self.counters.end_call(source.len(), consumed, produced);
		(consumed, produced)
	}
}
