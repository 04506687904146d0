//! Common codec contract for `retropix-rs`.
//!
//! Every compression scheme in this crate is a [`Codec`]: a stateful
//! decoder (and occasionally encoder) instance that is constructed with its
//! format parameters, optionally initialized, then driven with one or more
//! `decode` calls over caller-owned buffers.
//!
//! The contract is deliberately close to the metal. A call never allocates
//! for the caller, never reads or writes outside the supplied slices, and
//! reports its outcome through a [`CodecStatus`] plus two byte counters
//! rather than through `Result`, because several drivers treat short reads
//! and short writes as normal per-scanline termination, not as failures.
//! The [`decode_to_vec`] helper bridges to `Result` for one-shot callers.

mod amiga;
mod ccitt;
mod lz77;
mod lzw;
mod noop;
mod pcd;
mod rle;
mod sgi;
mod targa;
mod thunder;
mod vdat;

use std::fmt::Display;

use thiserror::Error;

pub use amiga::{AmigaRgbCodec, AmigaRgbVariant};
pub use ccitt::{CcittFax3Codec, CcittMhCodec, FaxOptions};
pub use lz77::{FlushMode, Lz77Codec};
pub use lzw::{GifLzwCodec, TiffLzwCodec};
pub use noop::NoCompressionCodec;
pub use pcd::PcdCodec;
pub use rle::{CutRleCodec, PackbitsCodec, PcxRleCodec, PspRleCodec, RlaRleCodec};
pub use sgi::SgiRleCodec;
pub use targa::TargaRleCodec;
pub use thunder::ThunderCodec;
pub use vdat::VdatCodec;

/// Status of a codec after construction or after the last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodecStatus {
	/// The codec has been constructed but never used
	#[default]
	Unused,

	/// `decode_end` / `encode_end` released the codec's resumable state
	Uninitialized,

	/// Construction parameters were invalid; all calls are no-ops
	InitializationError,

	/// The packet stream terminated cleanly or the destination was exactly filled
	Ok,

	/// The source ran out before the destination was satisfied
	NotEnoughInput,

	/// The destination filled up before the packet stream ended
	OutputBufferTooSmall,

	/// The source contains a code or packet the format does not allow
	InvalidInput,

	/// An internal expansion structure overflowed its fixed bound
	BufferOverflow,

	/// `decode` / `encode` was called with an empty source or destination
	InvalidBufferSize,

	/// A codec-internal invariant broke; indicates a bug, not bad input
	InternalError,
}

impl CodecStatus {
	/// Returns true for statuses that always mean the image data is unusable.
	///
	/// `NotEnoughInput` and `OutputBufferTooSmall` are *not* errors: drivers
	/// that decode per scanline hit them by design and keep going.
	pub fn is_error(self) -> bool {
		matches!(
			self,
			CodecStatus::InitializationError
				| CodecStatus::InvalidInput
				| CodecStatus::BufferOverflow
				| CodecStatus::InvalidBufferSize
				| CodecStatus::InternalError
		)
	}

	/// Returns true when a driver may keep calling `decode` without
	/// re-initializing the codec first.
	pub fn allows_resume(self) -> bool {
		!matches!(
			self,
			CodecStatus::InitializationError
				| CodecStatus::InvalidInput
				| CodecStatus::BufferOverflow
				| CodecStatus::InternalError
		)
	}
}

impl Display for CodecStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let text = match self {
			CodecStatus::Unused => "codec not used yet",
			CodecStatus::Uninitialized => "codec not initialized",
			CodecStatus::InitializationError => "invalid codec parameters",
			CodecStatus::Ok => "ok",
			CodecStatus::NotEnoughInput => "compressed data exhausted early",
			CodecStatus::OutputBufferTooSmall => "destination buffer exhausted early",
			CodecStatus::InvalidInput => "corrupt compressed data",
			CodecStatus::BufferOverflow => "decoding table overflow",
			CodecStatus::InvalidBufferSize => "empty source or destination buffer",
			CodecStatus::InternalError => "internal codec error",
		};
		write!(f, "{text}")
	}
}

/// Per-call bookkeeping shared by every codec.
///
/// After each `decode` call the invariants hold:
/// `compressed_available + bytes_consumed == source.len()` and
/// `decompressed_bytes == bytes_produced <= dest.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecCounters {
	/// Status after the last call (or after construction)
	pub status: CodecStatus,

	/// Compressed bytes still unread when the last call returned
	pub compressed_available: usize,

	/// Bytes written to the destination by the last call
	pub decompressed_bytes: usize,
}

impl CodecCounters {
	/// Fresh counters for a newly constructed codec.
	pub fn new() -> Self {
		Self::default()
	}

	/// Counters for a codec whose construction parameters were rejected.
	pub(crate) fn failed_init() -> Self {
		Self {
			status: CodecStatus::InitializationError,
			..Self::default()
		}
	}

	/// Call prologue. Returns false when the call must not run: the codec
	/// carries a sticky error, or one of the buffers is empty.
	pub(crate) fn begin_call(&mut self, packed_size: usize, unpacked_size: usize) -> bool {
		self.compressed_available = packed_size;
		self.decompressed_bytes = 0;

		if !self.status.allows_resume() {
			return false;
		}
		if packed_size == 0 || unpacked_size == 0 {
			self.status = CodecStatus::InvalidBufferSize;
			return false;
		}

		self.status = CodecStatus::Ok;
		true
	}

	/// Call epilogue: records the advanced cursors.
	pub(crate) fn end_call(&mut self, packed_size: usize, consumed: usize, produced: usize) {
		// Reaching this with consumed > packed_size means a codec walked
		// past its slice bound, which slice indexing would already have
		// caught; keep the check as the safe-port of the fatal abort.
		debug_assert!(consumed <= packed_size, "codec consumed past its source");
		if consumed > packed_size {
			log::error!("codec consumed {consumed} of {packed_size} source bytes");
			self.status = CodecStatus::InternalError;
			self.compressed_available = 0;
			self.decompressed_bytes = produced;
			return;
		}

		self.compressed_available = packed_size - consumed;
		self.decompressed_bytes = produced;
	}

	/// Reset performed by `decode_init` / `encode_init`. Construction-time
	/// parameter errors survive the reset.
	pub(crate) fn reset(&mut self) {
		if self.status != CodecStatus::InitializationError {
			self.status = CodecStatus::Ok;
		}
		self.compressed_available = 0;
		self.decompressed_bytes = 0;
	}
}

/// Common surface of every compression codec in this crate.
///
/// # Lifecycle
///
/// Construct with format parameters, then `decode_init` (optional for
/// one-shot codecs), one or more `decode` calls, `decode_end`. Encoders
/// mirror the same shape. A codec that rejected its construction
/// parameters answers every call as a no-op with
/// [`CodecStatus::InitializationError`].
///
/// # Resumption
///
/// `decode` returns `(bytes_consumed, bytes_produced)`; a driver that
/// decodes in slices advances its own source and destination windows by
/// those counters and calls again. Codecs with cross-call state (LZW,
/// LZ77, CCITT) keep their cursors internally; a failed stream can only
/// return to `Ok` through `decode_init`.
pub trait Codec {
	/// The codec's status and byte counters.
	fn counters(&self) -> &CodecCounters;

	/// Mutable access for the default lifecycle implementations.
	fn counters_mut(&mut self) -> &mut CodecCounters;

	/// Status after the last call.
	fn status(&self) -> CodecStatus {
		self.counters().status
	}

	/// Compressed bytes left unread by the last `decode` call.
	fn compressed_available(&self) -> usize {
		self.counters().compressed_available
	}

	/// Bytes written into the destination by the last `decode` call.
	fn decompressed_bytes(&self) -> usize {
		self.counters().decompressed_bytes
	}

	/// Decompresses `source` into `dest` and returns
	/// `(bytes_consumed, bytes_produced)`.
	///
	/// The call never touches memory outside the two slices. An empty
	/// source or destination yields [`CodecStatus::InvalidBufferSize`]
	/// and `(0, 0)`.
	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize);

	/// Compresses `source` into `dest` and returns the bytes stored.
	///
	/// Only the Targa RLE and no-compression codecs implement encoding;
	/// the default stores nothing.
	fn encode(&mut self, source: &[u8], dest: &mut [u8]) -> usize {
		let _ = (source, dest);
		0
	}

	/// Prepares the codec for a fresh decode stream.
	fn decode_init(&mut self) {
		self.counters_mut().reset();
	}

	/// Releases per-stream decode state.
	fn decode_end(&mut self) {}

	/// Prepares the codec for a fresh encode stream.
	fn encode_init(&mut self) {
		self.counters_mut().reset();
	}

	/// Releases per-stream encode state.
	fn encode_end(&mut self) {}
}

/// Errors surfaced by the `Result`-shaped convenience entry points.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Decoding stopped with a status that marks the data unusable
	#[error("decoding failed: {status}")]
	Decode {
		/// Status the codec stopped with
		status: CodecStatus,
	},

	/// Encoding stopped with a status that marks the output unusable
	#[error("encoding failed: {status}")]
	Encode {
		/// Status the codec stopped with
		status: CodecStatus,
	},
}

/// One-shot decode of a complete compressed region.
///
/// Runs the full `decode_init` / `decode` / `decode_end` lifecycle over a
/// freshly allocated buffer of `unpacked_size` bytes and truncates it to
/// what the codec actually produced. Short input and short output keep
/// their partial result (the statuses are normal terminations for the
/// formats that hit them); hard errors become [`CodecError`].
pub fn decode_to_vec<C: Codec>(
	codec: &mut C,
	source: &[u8],
	unpacked_size: usize,
) -> Result<Vec<u8>, CodecError> {
	let mut dest = vec![0u8; unpacked_size];

	codec.decode_init();
	let (_, produced) = codec.decode(source, &mut dest);
	let status = codec.status();
	codec.decode_end();

	if status.is_error() {
		return Err(CodecError::Decode {
			status,
		});
	}

	dest.truncate(produced);
	Ok(dest)
}
