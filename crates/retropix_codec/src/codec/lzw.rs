//! LZW decoders: the LSB-first GIF variant and the MSB-first TIFF variant.
//!
//! Both run the classic prefix/suffix table algorithm over a 4096-entry
//! code space with a 12-bit ceiling. They differ in bit order, in the
//! position of the control codes (GIF derives them from the initial code
//! size, TIFF pins clear/end-of-information at 256/257) and in the
//! behavior at the ceiling: GIF latches and stops adding entries, TIFF
//! simply waits for the next clear.
//!
//! The decoders are resumable: accumulator, table and expansion stack live
//! in the codec, so a driver can feed arbitrary source and destination
//! windows and the emitted bytes are identical to a one-shot decode.

use super::{Codec, CodecCounters, CodecStatus};

/// Code space ceiling shared by both variants.
const TABLE_SIZE: usize = 4096;

/// Sentinel for "no previous code" after a clear.
const NO_CODE: u16 = 0xFFFF;

/// LSB-first LZW decoder for GIF image data.
pub struct GifLzwCodec {
	counters: CodecCounters,
	initial_code_size: u32,

	data: u32,
	bits: u32,
	code_size: u32,
	code_mask: u32,
	clear_code: u16,
	eoi_code: u16,
	free_code: u16,
	old_code: u16,
	first_char: u8,
	max_code: bool,
	finished: bool,

	prefix: [u16; TABLE_SIZE],
	suffix: [u8; TABLE_SIZE],
	stack: [u8; TABLE_SIZE],
	stack_len: usize,
}

impl std::fmt::Debug for GifLzwCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GifLzwCodec")
			.field("counters", &self.counters)
			.field("initial_code_size", &self.initial_code_size)
			.field("code_size", &self.code_size)
			.field("free_code", &self.free_code)
			.field("finished", &self.finished)
			.finish_non_exhaustive()
	}
}

impl GifLzwCodec {
	/// Creates a decoder for streams with the given initial code size.
	///
	/// GIF allows initial code sizes 2 through 8; anything else leaves the
	/// codec in `InitializationError`.
	pub fn new(initial_code_size: u32) -> Self {
		let counters = if (2..=8).contains(&initial_code_size) {
			CodecCounters::new()
		} else {
			log::debug!("gif initial code size {initial_code_size} out of range");
			CodecCounters::failed_init()
		};

		let mut suffix = [0u8; TABLE_SIZE];
		for (i, s) in suffix.iter_mut().enumerate().take(256) {
			*s = i as u8;
		}

		let mut codec = Self {
			counters,
			initial_code_size,
			data: 0,
			bits: 0,
			code_size: 0,
			code_mask: 0,
			clear_code: 0,
			eoi_code: 0,
			free_code: 0,
			old_code: NO_CODE,
			first_char: 0,
			max_code: false,
			finished: false,
			prefix: [0; TABLE_SIZE],
			suffix,
			stack: [0; TABLE_SIZE],
			stack_len: 0,
		};
		codec.reset_stream();
		codec
	}

	fn reset_stream(&mut self) {
		self.data = 0;
		self.bits = 0;
		self.clear_code = 1 << self.initial_code_size.min(8);
		self.eoi_code = self.clear_code + 1;
		self.reset_table();
		self.finished = false;
		self.stack_len = 0;
	}

	/// State reset performed by a clear code.
	fn reset_table(&mut self) {
		self.code_size = self.initial_code_size + 1;
		self.code_mask = (1 << self.code_size) - 1;
		self.free_code = self.clear_code + 2;
		self.old_code = NO_CODE;
		self.max_code = false;
	}

	/// Pops pending expansion bytes into the destination.
	fn drain_stack(&mut self, dest: &mut [u8], dst: &mut usize) {
		while self.stack_len > 0 && *dst < dest.len() {
			self.stack_len -= 1;
			dest[*dst] = self.stack[self.stack_len];
			*dst += 1;
		}
	}
}

impl Codec for GifLzwCodec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.reset_stream();
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let mut src = 0;
		let mut dst = 0;

		// Symbol left over from a call whose destination filled mid-pop
		self.drain_stack(dest, &mut dst);

		'decode: while dst < dest.len() && !self.finished {
			while self.bits < self.code_size {
				if src >= source.len() {
					self.counters.status = CodecStatus::NotEnoughInput;
					break 'decode;
				}
				self.data |= u32::from(source[src]) << self.bits;
				src += 1;
				self.bits += 8;
			}

			let code = (self.data & self.code_mask) as u16;
			self.data >>= self.code_size;
			self.bits -= self.code_size;

			if code == self.eoi_code {
				self.finished = true;
				break;
			}
			if code == self.clear_code {
				self.reset_table();
				continue;
			}

			if self.old_code == NO_CODE {
				// First data code after a clear must be a root
				if code >= self.clear_code {
					log::debug!("gif lzw: first code {code} is not a root");
					self.counters.status = CodecStatus::InvalidInput;
					break;
				}
				self.first_char = self.suffix[usize::from(code)];
				dest[dst] = self.first_char;
				dst += 1;
				self.old_code = code;
				continue;
			}

			if code > self.free_code {
				log::debug!("gif lzw: code {code} beyond free code {}", self.free_code);
				self.counters.status = CodecStatus::InvalidInput;
				break;
			}

			let incoming = code;
			let mut code = code;
			if code == self.free_code {
				// KwKwK: the symbol being defined refers to itself
				self.stack[self.stack_len] = self.first_char;
				self.stack_len += 1;
				code = self.old_code;
			}

			while code > self.clear_code {
				if self.stack_len >= TABLE_SIZE - 1 {
					self.counters.status = CodecStatus::BufferOverflow;
					break 'decode;
				}
				self.stack[self.stack_len] = self.suffix[usize::from(code)];
				self.stack_len += 1;
				code = self.prefix[usize::from(code)];
			}

			self.first_char = self.suffix[usize::from(code)];
			self.stack[self.stack_len] = self.first_char;
			self.stack_len += 1;

			self.drain_stack(dest, &mut dst);

			if !self.max_code {
				self.prefix[usize::from(self.free_code)] = self.old_code;
				self.suffix[usize::from(self.free_code)] = self.first_char;
			}
			if u32::from(self.free_code) == self.code_mask {
				if self.code_size < 12 {
					self.code_size += 1;
					self.code_mask = (1 << self.code_size) - 1;
				} else {
					self.max_code = true;
				}
			}
			if self.free_code < (TABLE_SIZE - 1) as u16 {
				self.free_code += 1;
			}

			self.old_code = incoming;
		}

		self.counters.end_call(source.len(), src, dst);
		(src, dst)
	}
}

/// MSB-first LZW decoder for TIFF strips.
pub struct TiffLzwCodec {
	counters: CodecCounters,

	data: u32,
	bits: u32,
	code_size: u32,
	code_mask: u32,
	free_code: u16,
	old_code: u16,
	first_char: u8,
	finished: bool,

	prefix: [u16; TABLE_SIZE],
	suffix: [u8; TABLE_SIZE],
	stack: [u8; TABLE_SIZE],
	stack_len: usize,
}

/// TIFF pins the control codes: 256 clears, 257 ends the strip.
const TIFF_CLEAR: u16 = 256;
const TIFF_EOI: u16 = 257;

impl std::fmt::Debug for TiffLzwCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TiffLzwCodec")
			.field("counters", &self.counters)
			.field("code_size", &self.code_size)
			.field("free_code", &self.free_code)
			.field("finished", &self.finished)
			.finish_non_exhaustive()
	}
}

impl Default for TiffLzwCodec {
	fn default() -> Self {
		Self::new()
	}
}

impl TiffLzwCodec {
	/// Creates a decoder for TIFF LZW strips.
	pub fn new() -> Self {
		let mut suffix = [0u8; TABLE_SIZE];
		for (i, s) in suffix.iter_mut().enumerate().take(256) {
			*s = i as u8;
		}

		let mut codec = Self {
			counters: CodecCounters::new(),
			data: 0,
			bits: 0,
			code_size: 0,
			code_mask: 0,
			free_code: 0,
			old_code: NO_CODE,
			first_char: 0,
			finished: false,
			prefix: [0; TABLE_SIZE],
			suffix,
			stack: [0; TABLE_SIZE],
			stack_len: 0,
		};
		codec.reset_stream();
		codec
	}

	fn reset_stream(&mut self) {
		self.data = 0;
		self.bits = 0;
		self.reset_table();
		self.finished = false;
		self.stack_len = 0;
	}

	fn reset_table(&mut self) {
		self.code_size = 9;
		self.code_mask = (1 << self.code_size) - 1;
		self.free_code = TIFF_EOI + 1;
		self.old_code = NO_CODE;
	}

	fn drain_stack(&mut self, dest: &mut [u8], dst: &mut usize) {
		while self.stack_len > 0 && *dst < dest.len() {
			self.stack_len -= 1;
			dest[*dst] = self.stack[self.stack_len];
			*dst += 1;
		}
	}
}

impl Codec for TiffLzwCodec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.reset_stream();
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let mut src = 0;
		let mut dst = 0;

		self.drain_stack(dest, &mut dst);

		'decode: while dst < dest.len() && !self.finished {
			while self.bits < self.code_size {
				if src >= source.len() {
					self.counters.status = CodecStatus::NotEnoughInput;
					break 'decode;
				}
				// High bits first: new bytes enter from the low end
				self.data = (self.data << 8) | u32::from(source[src]);
				src += 1;
				self.bits += 8;
			}

			let code = ((self.data >> (self.bits - self.code_size)) & self.code_mask) as u16;
			self.bits -= self.code_size;

			if code == TIFF_EOI {
				self.finished = true;
				break;
			}
			if code == TIFF_CLEAR {
				self.reset_table();
				continue;
			}

			if self.old_code == NO_CODE {
				if code >= TIFF_CLEAR {
					log::debug!("tiff lzw: first code {code} is not a root");
					self.counters.status = CodecStatus::InvalidInput;
					break;
				}
				self.first_char = self.suffix[usize::from(code)];
				dest[dst] = self.first_char;
				dst += 1;
				self.old_code = code;
				continue;
			}

			if code > self.free_code {
				log::debug!("tiff lzw: code {code} beyond free code {}", self.free_code);
				self.counters.status = CodecStatus::InvalidInput;
				break;
			}

			let incoming = code;
			let mut code = code;
			if code == self.free_code {
				self.stack[self.stack_len] = self.first_char;
				self.stack_len += 1;
				code = self.old_code;
			}

			while code > TIFF_CLEAR {
				if self.stack_len >= TABLE_SIZE - 1 {
					self.counters.status = CodecStatus::BufferOverflow;
					break 'decode;
				}
				self.stack[self.stack_len] = self.suffix[usize::from(code)];
				self.stack_len += 1;
				code = self.prefix[usize::from(code)];
			}

			self.first_char = self.suffix[usize::from(code)];
			self.stack[self.stack_len] = self.first_char;
			self.stack_len += 1;

			self.drain_stack(dest, &mut dst);

			if usize::from(self.free_code) < TABLE_SIZE {
				self.prefix[usize::from(self.free_code)] = self.old_code;
				self.suffix[usize::from(self.free_code)] = self.first_char;
			}
			if u32::from(self.free_code) == self.code_mask && self.code_size < 12 {
				self.code_size += 1;
				self.code_mask = (1 << self.code_size) - 1;
			}
			if self.free_code < (TABLE_SIZE - 1) as u16 {
				self.free_code += 1;
			}

			self.old_code = incoming;
		}

		self.counters.end_call(source.len(), src, dst);
		(src, dst)
	}
}
