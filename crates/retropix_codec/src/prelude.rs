//! Prelude module for `retropix_codec`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use retropix_codec::prelude::*;
//!
//! let mut codec = PcxRleCodec::new();
//! let mut row = [0u8; 6];
//! codec.decode(&[0xC3, 0x55, 0x07, 0xC2, 0xAA], &mut row);
//! assert_eq!(codec.status(), CodecStatus::Ok);
//! ```

#[doc(inline)]
pub use crate::codec::{
	// Contract
	Codec,
	CodecCounters,
	CodecError,
	CodecStatus,

	// RLE family
	AmigaRgbCodec,
	AmigaRgbVariant,
	CutRleCodec,
	NoCompressionCodec,
	PackbitsCodec,
	PcxRleCodec,
	PspRleCodec,
	RlaRleCodec,
	SgiRleCodec,
	TargaRleCodec,
	VdatCodec,

	// Bit-stream codecs
	CcittFax3Codec,
	CcittMhCodec,
	FaxOptions,
	FlushMode,
	GifLzwCodec,
	Lz77Codec,
	PcdCodec,
	ThunderCodec,
	TiffLzwCodec,

	decode_to_vec,
};

// Re-export the codec module for advanced usage
#[doc(inline)]
pub use crate::codec;
