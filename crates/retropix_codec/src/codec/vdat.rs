//! Atari ST `VDAT` chunk codec.
//!
//! A VDAT chunk splits its stream in two: a 16-bit big-endian header whose
//! value is the command count plus two, the command bytes themselves, and
//! then the data words (all big-endian) the commands consume. Signed
//! command semantics:
//!
//! - `0`: the next data word is a word count; that many data words follow
//!   literally
//! - `1`: the next data word is a count, the word after it is replicated
//!   that many times
//! - negative `n`: `-n` words copied literally from the data stream
//! - `n >= 2`: `n` copies of the next single data word
//!
//! Decoding stops when the commands or the data run out or the
//! destination is full.

use super::{Codec, CodecCounters, CodecStatus};

/// Run-length codec for VDAT chunk bodies.
#[derive(Debug, Default)]
pub struct VdatCodec {
	counters: CodecCounters,
}

impl VdatCodec {
	/// Creates a new VDAT codec.
	pub fn new() -> Self {
		Self::default()
	}
}

/// Cursor over the big-endian data-word stream.
#[derive(Debug)]
struct DataWords<'a> {
	source: &'a [u8],
	at: usize,
}

impl<'a> DataWords<'a> {
	fn next_word(&mut self) -> Option<[u8; 2]> {
		if self.source.len() - self.at < 2 {
			return None;
		}
		let word = [self.source[self.at], self.source[self.at + 1]];
		self.at += 2;
		Some(word)
	}

	fn next_count(&mut self) -> Option<usize> {
		self.next_word().map(|w| usize::from(u16::from_be_bytes(w)))
	}
}

impl Codec for VdatCodec {
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

		if source.len() < 2 {
			self.counters.status = CodecStatus::NotEnoughInput;
			self.counters.end_call(source.len(), source.len(), 0);
			return (source.len(), 0);
		}

		let header = usize::from(u16::from_be_bytes([source[0], source[1]]));
		let Some(command_count) = header.checked_sub(2) else {
			log::debug!("vdat header {header} smaller than its own bias");
			self.counters.status = CodecStatus::InvalidInput;
			self.counters.end_call(source.len(), 2, 0);
			return (2, 0);
		};

		let commands_end = (2 + command_count).min(source.len());
		if commands_end < 2 + command_count {
			self.counters.status = CodecStatus::NotEnoughInput;
		}

		let mut data = DataWords {
			source,
			at: commands_end,
		};
		let mut dst = 0;

		for &command in &source[2..commands_end] {
			if self.counters.status != CodecStatus::Ok || dst >= dest.len() {
				break;
			}

			match command as i8 {
				0 => {
					let Some(count) = data.next_count() else {
						self.counters.status = CodecStatus::NotEnoughInput;
						break;
					};
					self.copy_words(&mut data, dest, &mut dst, count);
				}
				1 => {
					let Some(count) = data.next_count() else {
						self.counters.status = CodecStatus::NotEnoughInput;
						break;
					};
					self.repeat_word(&mut data, dest, &mut dst, count);
				}
				n if n < 0 => {
					self.copy_words(&mut data, dest, &mut dst, usize::from(n.unsigned_abs()));
				}
				n => {
					// The run form covers every remaining command value
					self.repeat_word(&mut data, dest, &mut dst, usize::try_from(n).unwrap_or(0));
				}
			}
		}

		// Command exhaustion is the stream's regular end
		let src = data.at;
		self.counters.end_call(source.len(), src, dst);
		(src, dst)
	}
}

impl VdatCodec {
	fn copy_words(&mut self, data: &mut DataWords<'_>, dest: &mut [u8], dst: &mut usize, count: usize) {
		for _ in 0..count {
			if dest.len() - *dst < 2 {
				self.counters.status = CodecStatus::OutputBufferTooSmall;
				return;
			}
			let Some(word) = data.next_word() else {
				self.counters.status = CodecStatus::NotEnoughInput;
				return;
			};
			dest[*dst..*dst + 2].copy_from_slice(&word);
			*dst += 2;
		}
	}

	fn repeat_word(&mut self, data: &mut DataWords<'_>, dest: &mut [u8], dst: &mut usize, count: usize) {
		let Some(word) = data.next_word() else {
			self.counters.status = CodecStatus::NotEnoughInput;
			return;
		};
		for _ in 0..count {
			if dest.len() - *dst < 2 {
				self.counters.status = CodecStatus::OutputBufferTooSmall;
				return;
			}
			dest[*dst..*dst + 2].copy_from_slice(&word);
			*dst += 2;
		}
	}
}
