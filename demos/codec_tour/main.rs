//! Codec tour: decodes one sample buffer per codec family and prints the
//! packed and unpacked bytes.
//!
//! Run with: cargo run --example codec-tour [-- --codec pcx]

use clap::Parser;
use retropix_rs::prelude::*;

#[derive(Parser, Debug)]
#[command(about = "Walk the codec core with sample packet streams")]
struct Args {
	/// Only show the named codec (packbits, targa, pcx, sgi, gif, thunder)
	#[arg(long)]
	codec: Option<String>,
}

struct Sample {
	name: &'static str,
	packed: &'static [u8],
	unpacked_size: usize,
}

const SAMPLES: &[Sample] = &[
	Sample {
		name: "packbits",
		packed: &[0xFE, 0xAA, 0x02, 0x10, 0x20, 0x30, 0x80],
		unpacked_size: 6,
	},
	Sample {
		name: "targa",
		packed: &[0x82, 0x01, 0x02, 0x03, 0x01, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60],
		unpacked_size: 15,
	},
	Sample {
		name: "pcx",
		packed: &[0xC3, 0x55, 0x07, 0xC2, 0xAA],
		unpacked_size: 6,
	},
	Sample {
		name: "sgi",
		packed: &[0x83, 0x01, 0x02, 0x03, 0x02, 0xAA, 0x00],
		unpacked_size: 5,
	},
	Sample {
		name: "gif",
		packed: &[0x44, 0x0A],
		unpacked_size: 2,
	},
	Sample {
		name: "thunder",
		packed: &[0xC5, 0x03, 0xC1, 0x02],
		unpacked_size: 4,
	},
];

fn make_codec(name: &str) -> Box<dyn Codec> {
	match name {
		"packbits" => Box::new(PackbitsCodec::new()),
		"targa" => Box::new(TargaRleCodec::new(24)),
		"pcx" => Box::new(PcxRleCodec::new()),
		"sgi" => Box::new(SgiRleCodec::new(8)),
		"gif" => Box::new(GifLzwCodec::new(2)),
		_ => Box::new(ThunderCodec::new(4)),
	}
}

fn main() {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let args = Args::parse();

	for sample in SAMPLES {
		if let Some(only) = &args.codec {
			if only != sample.name {
				continue;
			}
		}

		let mut codec = make_codec(sample.name);
		let mut dest = vec![0u8; sample.unpacked_size];
		codec.decode_init();
		let (consumed, produced) = codec.decode(sample.packed, &mut dest);
		codec.decode_end();

		log::info!(
			"{:<8} {:>2} packed -> {:>2} unpacked ({})",
			sample.name,
			consumed,
			produced,
			codec.status()
		);
		println!("{:<8} in:  {}", sample.name, hex::encode(sample.packed));
		println!("{:<8} out: {}", "", hex::encode(&dest[..produced]));
	}
}
