//! Amiga IFF RGBN / RGB8 packed-count codec.
//!
//! Both chunk flavors pack a pixel and its repeat count into a single data
//! word: 16 bits for RGBN (count in bits 8..=10 of the word as it lands in
//! a little-endian register) and 32 bits for RGB8 (count in bits 24..=30).
//! A zero count escalates to an extension byte, and a zero extension byte
//! to a big-endian 16-bit count. The decoder replicates the source word
//! bytes verbatim; unpacking the 4:4:4 or 8:8:8 color is the reader's job.

use super::{Codec, CodecCounters, CodecStatus};

/// Which of the two packed-word layouts the stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmigaRgbVariant {
	/// `RGBN` chunks: 16-bit words, 3-bit count
	Rgbn,
	/// `RGB8` chunks: 32-bit words, 7-bit count
	Rgb8,
}

/// Run-length codec for IFF RGBN and RGB8 bodies.
#[derive(Debug)]
pub struct AmigaRgbCodec {
	counters: CodecCounters,
	variant: AmigaRgbVariant,
}

impl AmigaRgbCodec {
	/// Creates a codec for the given chunk variant.
	pub fn new(variant: AmigaRgbVariant) -> Self {
		Self {
			counters: CodecCounters::new(),
			variant,
		}
	}

	/// The configured chunk variant.
	pub fn variant(&self) -> AmigaRgbVariant {
		self.variant
	}
}

impl Codec for AmigaRgbCodec {
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

		let word_size = match self.variant {
			AmigaRgbVariant::Rgbn => 2,
			AmigaRgbVariant::Rgb8 => 4,
		};

		let mut src = 0;
		let mut dst = 0;

		while dst < dest.len() {
			if source.len() - src < word_size {
				self.counters.status = CodecStatus::NotEnoughInput;
				break;
			}
			let word = &source[src..src + word_size];
			src += word_size;

			let mut count = match self.variant {
				AmigaRgbVariant::Rgbn => usize::from(word[1] & 0x07),
				AmigaRgbVariant::Rgb8 => usize::from(word[3] & 0x7F),
			};

			if count == 0 {
				// Extended count byte, then an extended big-endian word
				let Some(&byte_count) = source.get(src) else {
					self.counters.status = CodecStatus::NotEnoughInput;
					break;
				};
				src += 1;
				count = usize::from(byte_count);

				if count == 0 {
					if source.len() - src < 2 {
						self.counters.status = CodecStatus::NotEnoughInput;
						break;
					}
					count = usize::from(u16::from_be_bytes([source[src], source[src + 1]]));
					src += 2;
				}
			}

			let pixels_left = (dest.len() - dst) / word_size;
			if count > pixels_left {
				count = pixels_left;
				self.counters.status = CodecStatus::OutputBufferTooSmall;
			}

			for chunk in dest[dst..dst + count * word_size].chunks_exact_mut(word_size) {
				chunk.copy_from_slice(word);
			}
			dst += count * word_size;

			if self.counters.status != CodecStatus::Ok {
				break;
			}
		}

		if self.counters.status == CodecStatus::Ok && dst < dest.len() {
			self.counters.status = CodecStatus::NotEnoughInput;
		}

		self.counters.end_call(source.len(), src, dst);
		(src, dst)
	}
}
