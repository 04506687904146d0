//! SGI (IRIS RGB) run-length codec.
//!
//! Rows are packets of a count byte (low seven bits) whose high bit picks
//! literal (set) or run (clear); a zero count terminates the row. The
//! 16-bit-per-sample variant applies the same grammar to big-endian words:
//! the header is a word, counts are in words, and payload words are copied
//! byte-for-byte so the destination stays big-endian.

use super::{Codec, CodecCounters, CodecStatus};

/// Run-length codec for SGI image rows.
#[derive(Debug)]
pub struct SgiRleCodec {
	counters: CodecCounters,
	/// Bytes per sample: 1 or 2
	sample_size: usize,
}

impl SgiRleCodec {
	/// Creates a codec for the given sample size in bits.
	///
	/// Only 8 and 16 bit samples exist in the format; anything else leaves
	/// the codec in `InitializationError`.
	pub fn new(sample_bits: u32) -> Self {
		let sample_size = match sample_bits {
			8 => 1,
			16 => 2,
			_ => {
				log::debug!("unsupported sgi sample size {sample_bits}");
				return Self {
					counters: CodecCounters::failed_init(),
					sample_size: 0,
				};
			}
		};

		Self {
			counters: CodecCounters::new(),
			sample_size,
		}
	}

	fn decode_bytes(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		let mut src = 0;
		let mut dst = 0;

		while src < source.len() {
			let header = source[src];
			src += 1;

			let count = usize::from(header & 0x7F);
			if count == 0 {
				// Row terminator
				self.counters.status = CodecStatus::Ok;
				return (src, dst);
			}

			let mut count = count;
			if count > dest.len() - dst {
				count = dest.len() - dst;
				self.counters.status = CodecStatus::OutputBufferTooSmall;
			}

			if header & 0x80 != 0 {
				let mut count = count;
				if count > source.len() - src {
					count = source.len() - src;
					self.counters.status = CodecStatus::NotEnoughInput;
				}
				dest[dst..dst + count].copy_from_slice(&source[src..src + count]);
				src += count;
				dst += count;
			} else {
				let Some(&value) = source.get(src) else {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				};
				src += 1;
				dest[dst..dst + count].fill(value);
				dst += count;
			}

			if self.counters.status != CodecStatus::Ok {
				break;
			}
		}

		if self.counters.status == CodecStatus::Ok {
			// Ran out of packets without seeing the terminator
			self.counters.status = CodecStatus::NotEnoughInput;
		}
		(src, dst)
	}

	fn decode_words(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		let mut src = 0;
		let mut dst = 0;

		while src + 1 < source.len() {
			// Counts live in the low byte of the big-endian header word
			let header = source[src + 1];
			src += 2;

			let count = usize::from(header & 0x7F);
			if count == 0 {
				self.counters.status = CodecStatus::Ok;
				return (src, dst);
			}

			let mut count = count;
			let words_left = (dest.len() - dst) / 2;
			if count > words_left {
				count = words_left;
				self.counters.status = CodecStatus::OutputBufferTooSmall;
			}

			if header & 0x80 != 0 {
				let mut bytes = count * 2;
				if bytes > source.len() - src {
					bytes = (source.len() - src) & !1;
					self.counters.status = CodecStatus::NotEnoughInput;
				}
				dest[dst..dst + bytes].copy_from_slice(&source[src..src + bytes]);
				src += bytes;
				dst += bytes;
			} else {
				if source.len() - src < 2 {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				}
				let word = [source[src], source[src + 1]];
				src += 2;
				for chunk in dest[dst..dst + count * 2].chunks_exact_mut(2) {
					chunk.copy_from_slice(&word);
				}
				dst += count * 2;
			}

			if self.counters.status != CodecStatus::Ok {
				break;
			}
		}

		if self.counters.status == CodecStatus::Ok {
			self.counters.status = CodecStatus::NotEnoughInput;
		}
		(src, dst)
	}
}

impl Codec for SgiRleCodec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let (src, dst) = match self.sample_size {
			1 => self.decode_bytes(source, dest),
			_ => self.decode_words(source, dest),
		};

		self.counters.end_call(source.len(), src, dst);
		(src, dst)
	}
}
