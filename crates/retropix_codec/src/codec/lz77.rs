//! LZ77 decoder bridging to the `flate2` inflate stream.
//!
//! The codec itself holds no compression logic; it owns a
//! [`flate2::Decompress`] stream across calls and translates between the
//! crate's buffer/status contract and the inflate API. Two knobs cover
//! the drivers that use it: PNG feeds scanline-sized windows with a
//! partial flush, PSP hands over whole one-shot regions, and TIFF
//! requires a stream reset before every strip.

use flate2::{Decompress, FlushDecompress, Status};

use super::{Codec, CodecCounters, CodecStatus};

/// How each `decode` call drives the inflate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
	/// Flush what is available and keep the stream open (streaming PNG)
	#[default]
	Partial,
	/// The call carries the whole remaining stream (one-shot PSP)
	Finish,
}

/// Deflate bridge codec.
#[derive(Debug)]
pub struct Lz77Codec {
	counters: CodecCounters,
	flush_mode: FlushMode,
	auto_reset: bool,
	stream: Option<Decompress>,
	available_input: usize,
	available_output: usize,
}

impl Lz77Codec {
	/// Creates a codec with the given flush behavior.
	///
	/// `auto_reset` makes every `decode` call start a fresh zlib stream,
	/// which is what TIFF's per-strip deflate needs; PNG keeps one stream
	/// across the whole image and passes `false`.
	pub fn new(flush_mode: FlushMode, auto_reset: bool) -> Self {
		Self {
			counters: CodecCounters::new(),
			flush_mode,
			auto_reset,
			stream: None,
			available_input: 0,
			available_output: 0,
		}
	}

	/// Source bytes the last call left unconsumed.
	pub fn available_input(&self) -> usize {
		self.available_input
	}

	/// Destination bytes the last call left unwritten.
	pub fn available_output(&self) -> usize {
		self.available_output
	}
}

impl Codec for Lz77Codec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.stream = Some(Decompress::new(true));
		self.available_input = 0;
		self.available_output = 0;
	}

	fn decode_end(&mut self) {
		self.stream = None;
		if self.counters.status == CodecStatus::Ok {
			self.counters.status = CodecStatus::Uninitialized;
		}
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		// Tolerate drivers that skip decode_init
		let stream = self.stream.get_or_insert_with(|| Decompress::new(true));

		if self.auto_reset {
			stream.reset(true);
		}

		let before_in = stream.total_in();
		let before_out = stream.total_out();
		let flush = match self.flush_mode {
			FlushMode::Partial => FlushDecompress::Sync,
			FlushMode::Finish => FlushDecompress::Finish,
		};

		let result = stream.decompress(source, dest, flush);
		let consumed = (stream.total_in() - before_in) as usize;
		let produced = (stream.total_out() - before_out) as usize;
		self.available_input = source.len() - consumed;
		self.available_output = dest.len() - produced;

		match result {
			Ok(Status::StreamEnd) => {}
			Ok(Status::Ok | Status::BufError) => {
				// The stream is still open; report which buffer stalled it
				if self.available_output == 0 && self.available_input > 0 {
					self.counters.status = CodecStatus::OutputBufferTooSmall;
				} else if self.available_input == 0 && self.available_output > 0 {
					self.counters.status = CodecStatus::NotEnoughInput;
				}
			}
			Err(error) => {
				log::debug!("inflate failed: {error}");
				self.counters.status = CodecStatus::InvalidInput;
			}
		}

		self.counters.end_call(source.len(), consumed, produced);
		(consumed, produced)
	}
}
