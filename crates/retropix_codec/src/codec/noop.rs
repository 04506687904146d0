//! Pass-through codec for uncompressed pixel regions.

use super::{Codec, CodecCounters, CodecStatus};

/// Codec for formats that store their pixel data uncompressed.
///
/// `decode` is a bounded copy. The source rule is quirky but load-bearing:
/// the status is `Ok` only when the packed and unpacked sizes agree, and
/// `NotEnoughInput` for a mismatch in either direction. Drivers that slice
/// their reads rely on the mismatch flag to detect short regions.
#[derive(Debug, Default)]
pub struct NoCompressionCodec {
	counters: CodecCounters,
}

impl NoCompressionCodec {
	/// Creates a new pass-through codec.
	pub fn new() -> Self {
		Self::default()
	}
}

impl Codec for NoCompressionCodec {
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

		let count = source.len().min(dest.len());
		dest[..count].copy_from_slice(&source[..count]);

		if source.len() != dest.len() {
			self.counters.status = CodecStatus::NotEnoughInput;
		}

		self.counters.end_call(source.len(), count, count);
		(count, count)
	}

	fn encode(&mut self, source: &[u8], dest: &mut [u8]) -> usize {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return 0;
		}

		let count = source.len().min(dest.len());
		dest[..count].copy_from_slice(&source[..count]);

		self.counters.end_call(source.len(), count, count);
		count
	}
}
