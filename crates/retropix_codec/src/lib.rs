//! This crate provides the compression codec core for the `retropix-rs` project.
//!
//! Legacy raster formats wrap their pixel data in a zoo of byte-stream
//! compression schemes. This crate implements the decoders (and the few
//! encoders the formats actually need) as self-contained state machines
//! over caller-supplied buffers:
//!
//! - **Byte RLE**: Targa, Packbits, PSP, PCX, RLA, CUT, SGI, Amiga
//!   RGBN/RGB8 and VDAT packet dialects
//! - **LZW**: the LSB-first GIF variant and the MSB-first TIFF variant
//! - **LZ77**: a bridge to the `flate2` inflate stream
//! - **ThunderScan**: the 4-bit delta/run nibble codec
//! - **CCITT**: Group 3 and modified-Huffman fax decoding
//! - **Photo-CD**: the planar Huffman delta decoder
//!
//! Every codec consumes a bounded compressed slice, produces into a bounded
//! destination slice, and reports a [`CodecStatus`](codec::CodecStatus)
//! plus byte counters after each call. Malformed or truncated input never
//! reads or writes outside the supplied buffers.
//!
//! # Examples
//!
//! ```rust
//! use retropix_codec::codec::{Codec, CodecStatus, PackbitsCodec};
//!
//! let packed = [0xFEu8, 0xAA, 0x02, 0x10, 0x20, 0x30];
//! let mut pixels = [0u8; 6];
//! let mut codec = PackbitsCodec::new();
//! let (consumed, produced) = codec.decode(&packed, &mut pixels);
//! assert_eq!((consumed, produced), (6, 6));
//! assert_eq!(codec.status(), CodecStatus::Ok);
//! assert_eq!(pixels, [0xAA, 0xAA, 0xAA, 0x10, 0x20, 0x30]);
//! ```

pub mod codec;
pub mod prelude;

// Re-export commonly used codec types at crate root for convenience
pub use codec::{
	AmigaRgbCodec, AmigaRgbVariant, CcittFax3Codec, CcittMhCodec, Codec, CodecCounters, CodecError,
	CodecStatus, CutRleCodec, FaxOptions, FlushMode, GifLzwCodec, Lz77Codec, NoCompressionCodec,
	PackbitsCodec, PcdCodec, PcxRleCodec, PspRleCodec, RlaRleCodec, SgiRleCodec, TargaRleCodec,
	ThunderCodec, TiffLzwCodec, VdatCodec, decode_to_vec,
};
