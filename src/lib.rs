#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `retropix-rs` decodes the compression schemes of legacy raster image
//! formats: the run-length packet dialects of Targa, PSD, PCX, SGI, RLA,
//! CUT and the Amiga IFF family, both LZW variants, a deflate bridge,
//! ThunderScan, CCITT Group 3 fax streams and Kodak Photo-CD sequences.
//!
//! The codec core lives in [`retropix_codec`]; this crate re-exports it.

pub use retropix_codec::*;
