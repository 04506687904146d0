//! CCITT Group 3 and modified-Huffman fax decoders.
//!
//! Both codecs decode ITU-T T.4 run-length Huffman streams into 1-bit
//! output rows: alternating white and black runs, white first, with
//! makeup codes extending a run past 63 pixels. The Group 3 variant
//! synchronizes every row on the 12-bit EOL code (eleven zeros and a
//! one, with arbitrary zero fill before it); the modified-Huffman
//! variant has no EOLs and instead restarts each row on an input byte
//! boundary.
//!
//! Decoding runs a state machine built once at construction from the
//! T.4 code tables: every state has a zero and a one transition, state 0
//! is the root, terminal states carry the run length, makeup states
//! loop back to the root to accumulate, and dead transitions flag the
//! row as unrecoverable.

use super::{Codec, CodecCounters, CodecStatus};

/// Byte bit-reversal lookup used when the driver feeds LSB-first data.
const REVERSE_BITS: [u8; 256] = [
	0x00, 0x80, 0x40, 0xC0, 0x20, 0xA0, 0x60, 0xE0, 0x10, 0x90, 0x50, 0xD0, 0x30, 0xB0, 0x70, 0xF0,
	0x08, 0x88, 0x48, 0xC8, 0x28, 0xA8, 0x68, 0xE8, 0x18, 0x98, 0x58, 0xD8, 0x38, 0xB8, 0x78, 0xF8,
	0x04, 0x84, 0x44, 0xC4, 0x24, 0xA4, 0x64, 0xE4, 0x14, 0x94, 0x54, 0xD4, 0x34, 0xB4, 0x74, 0xF4,
	0x0C, 0x8C, 0x4C, 0xCC, 0x2C, 0xAC, 0x6C, 0xEC, 0x1C, 0x9C, 0x5C, 0xDC, 0x3C, 0xBC, 0x7C, 0xFC,
	0x02, 0x82, 0x42, 0xC2, 0x22, 0xA2, 0x62, 0xE2, 0x12, 0x92, 0x52, 0xD2, 0x32, 0xB2, 0x72, 0xF2,
	0x0A, 0x8A, 0x4A, 0xCA, 0x2A, 0xAA, 0x6A, 0xEA, 0x1A, 0x9A, 0x5A, 0xDA, 0x3A, 0xBA, 0x7A, 0xFA,
	0x06, 0x86, 0x46, 0xC6, 0x26, 0xA6, 0x66, 0xE6, 0x16, 0x96, 0x56, 0xD6, 0x36, 0xB6, 0x76, 0xF6,
	0x0E, 0x8E, 0x4E, 0xCE, 0x2E, 0xAE, 0x6E, 0xEE, 0x1E, 0x9E, 0x5E, 0xDE, 0x3E, 0xBE, 0x7E, 0xFE,
	0x01, 0x81, 0x41, 0xC1, 0x21, 0xA1, 0x61, 0xE1, 0x11, 0x91, 0x51, 0xD1, 0x31, 0xB1, 0x71, 0xF1,
	0x09, 0x89, 0x49, 0xC9, 0x29, 0xA9, 0x69, 0xE9, 0x19, 0x99, 0x59, 0xD9, 0x39, 0xB9, 0x79, 0xF9,
	0x05, 0x85, 0x45, 0xC5, 0x25, 0xA5, 0x65, 0xE5, 0x15, 0x95, 0x55, 0xD5, 0x35, 0xB5, 0x75, 0xF5,
	0x0D, 0x8D, 0x4D, 0xCD, 0x2D, 0xAD, 0x6D, 0xED, 0x1D, 0x9D, 0x5D, 0xDD, 0x3D, 0xBD, 0x7D, 0xFD,
	0x03, 0x83, 0x43, 0xC3, 0x23, 0xA3, 0x63, 0xE3, 0x13, 0x93, 0x53, 0xD3, 0x33, 0xB3, 0x73, 0xF3,
	0x0B, 0x8B, 0x4B, 0xCB, 0x2B, 0xAB, 0x6B, 0xEB, 0x1B, 0x9B, 0x5B, 0xDB, 0x3B, 0xBB, 0x7B, 0xFB,
	0x07, 0x87, 0x47, 0xC7, 0x27, 0xA7, 0x67, 0xE7, 0x17, 0x97, 0x57, 0xD7, 0x37, 0xB7, 0x77, 0xF7,
	0x0F, 0x8F, 0x4F, 0xCF, 0x2F, 0xAF, 0x6F, 0xEF, 0x1F, 0x9F, 0x5F, 0xDF, 0x3F, 0xBF, 0x7F, 0xFF,
];

/// T.4 white run codes: (run length, code bit count, code value).
#[rustfmt::skip]
const WHITE_CODES: [(u16, u8, u16); 91] = [
	(0, 8, 0x35), (1, 6, 0x07), (2, 4, 0x07), (3, 4, 0x08),
	(4, 4, 0x0B), (5, 4, 0x0C), (6, 4, 0x0E), (7, 4, 0x0F),
	(8, 5, 0x13), (9, 5, 0x14), (10, 5, 0x07), (11, 5, 0x08),
	(12, 6, 0x08), (13, 6, 0x03), (14, 6, 0x34), (15, 6, 0x35),
	(16, 6, 0x2A), (17, 6, 0x2B), (18, 7, 0x27), (19, 7, 0x0C),
	(20, 7, 0x08), (21, 7, 0x17), (22, 7, 0x03), (23, 7, 0x04),
	(24, 7, 0x28), (25, 7, 0x2B), (26, 7, 0x13), (27, 7, 0x24),
	(28, 7, 0x18), (29, 8, 0x02), (30, 8, 0x03), (31, 8, 0x1A),
	(32, 8, 0x1B), (33, 8, 0x12), (34, 8, 0x13), (35, 8, 0x14),
	(36, 8, 0x15), (37, 8, 0x16), (38, 8, 0x17), (39, 8, 0x28),
	(40, 8, 0x29), (41, 8, 0x2A), (42, 8, 0x2B), (43, 8, 0x2C),
	(44, 8, 0x2D), (45, 8, 0x04), (46, 8, 0x05), (47, 8, 0x0A),
	(48, 8, 0x0B), (49, 8, 0x52), (50, 8, 0x53), (51, 8, 0x54),
	(52, 8, 0x55), (53, 8, 0x24), (54, 8, 0x25), (55, 8, 0x58),
	(56, 8, 0x59), (57, 8, 0x5A), (58, 8, 0x5B), (59, 8, 0x4A),
	(60, 8, 0x4B), (61, 8, 0x32), (62, 8, 0x33), (63, 8, 0x34),
	(64, 5, 0x1B), (128, 5, 0x12), (192, 6, 0x17), (256, 7, 0x37),
	(320, 8, 0x36), (384, 8, 0x37), (448, 8, 0x64), (512, 8, 0x65),
	(576, 8, 0x68), (640, 8, 0x67), (704, 9, 0xCC), (768, 9, 0xCD),
	(832, 9, 0xD2), (896, 9, 0xD3), (960, 9, 0xD4), (1024, 9, 0xD5),
	(1088, 9, 0xD6), (1152, 9, 0xD7), (1216, 9, 0xD8), (1280, 9, 0xD9),
	(1344, 9, 0xDA), (1408, 9, 0xDB), (1472, 9, 0x98), (1536, 9, 0x99),
	(1600, 9, 0x9A), (1664, 6, 0x18), (1728, 9, 0x9B),
];

/// T.4 black run codes: (run length, code bit count, code value).
#[rustfmt::skip]
const BLACK_CODES: [(u16, u8, u16); 91] = [
	(0, 10, 0x37), (1, 3, 0x02), (2, 2, 0x03), (3, 2, 0x02),
	(4, 3, 0x03), (5, 4, 0x03), (6, 4, 0x02), (7, 5, 0x03),
	(8, 6, 0x05), (9, 6, 0x04), (10, 7, 0x04), (11, 7, 0x05),
	(12, 7, 0x07), (13, 8, 0x04), (14, 8, 0x07), (15, 9, 0x18),
	(16, 10, 0x17), (17, 10, 0x18), (18, 10, 0x08), (19, 11, 0x67),
	(20, 11, 0x68), (21, 11, 0x6C), (22, 11, 0x37), (23, 11, 0x28),
	(24, 11, 0x17), (25, 11, 0x18), (26, 12, 0xCA), (27, 12, 0xCB),
	(28, 12, 0xCC), (29, 12, 0xCD), (30, 12, 0x68), (31, 12, 0x69),
	(32, 12, 0x6A), (33, 12, 0x6B), (34, 12, 0xD2), (35, 12, 0xD3),
	(36, 12, 0xD4), (37, 12, 0xD5), (38, 12, 0xD6), (39, 12, 0xD7),
	(40, 12, 0x6C), (41, 12, 0x6D), (42, 12, 0xDA), (43, 12, 0xDB),
	(44, 12, 0x54), (45, 12, 0x55), (46, 12, 0x56), (47, 12, 0x57),
	(48, 12, 0x64), (49, 12, 0x65), (50, 12, 0x52), (51, 12, 0x53),
	(52, 12, 0x24), (53, 12, 0x37), (54, 12, 0x38), (55, 12, 0x27),
	(56, 12, 0x28), (57, 12, 0x58), (58, 12, 0x59), (59, 12, 0x2B),
	(60, 12, 0x2C), (61, 12, 0x5A), (62, 12, 0x66), (63, 12, 0x67),
	(64, 10, 0x0F), (128, 12, 0xC8), (192, 12, 0xC9), (256, 12, 0x5B),
	(320, 12, 0x33), (384, 12, 0x34), (448, 12, 0x35), (512, 13, 0x6C),
	(576, 13, 0x6D), (640, 13, 0x4A), (704, 13, 0x4B), (768, 13, 0x4C),
	(832, 13, 0x4D), (896, 13, 0x72), (960, 13, 0x73), (1024, 13, 0x74),
	(1088, 13, 0x75), (1152, 13, 0x76), (1216, 13, 0x77), (1280, 13, 0x52),
	(1344, 13, 0x53), (1408, 13, 0x54), (1472, 13, 0x55), (1536, 13, 0x5A),
	(1600, 13, 0x5B), (1664, 13, 0x64), (1728, 13, 0x65),
];

/// Extended makeup codes shared by both colors.
#[rustfmt::skip]
const EXTENDED_MAKEUP_CODES: [(u16, u8, u16); 13] = [
	(1792, 11, 0x08), (1856, 11, 0x0C), (1920, 11, 0x0D),
	(1984, 12, 0x12), (2048, 12, 0x13), (2112, 12, 0x14),
	(2176, 12, 0x15), (2240, 12, 0x16), (2304, 12, 0x17),
	(2368, 12, 0x1C), (2432, 12, 0x1D), (2496, 12, 0x1E),
	(2560, 12, 0x1F),
];

const NO_STATE: u16 = u16::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
	/// Interior state, keep walking
	Transit,
	/// Run is complete
	Terminating(u16),
	/// Add the length and continue with another code of the same color
	Makeup(u16),
	/// End-of-line marker
	Eol,
}

#[derive(Debug, Clone, Copy)]
struct Node {
	next: [u16; 2],
	kind: NodeKind,
}

impl Node {
	fn empty() -> Self {
		Self {
			next: [NO_STATE; 2],
			kind: NodeKind::Transit,
		}
	}
}

/// Builds the two-transition state machine for one color.
fn build_state_machine(codes: &[(u16, u8, u16)]) -> Vec<Node> {
	let mut nodes = vec![Node::empty()];

	let insert = |nodes: &mut Vec<Node>, run_len: u16, bits: u8, code: u16, kind: NodeKind| {
		let mut state = 0usize;
		for i in (0..bits).rev() {
			let bit = usize::from((code >> i) & 1);
			let next = nodes[state].next[bit];
			state = if next == NO_STATE {
				nodes.push(Node::empty());
				let id = (nodes.len() - 1) as u16;
				nodes[state].next[bit] = id;
				usize::from(id)
			} else {
				usize::from(next)
			};
		}
		nodes[state].kind = match kind {
			NodeKind::Transit => {
				if run_len >= 64 {
					NodeKind::Makeup(run_len)
				} else {
					NodeKind::Terminating(run_len)
				}
			}
			other => other,
		};
	};

	for &(run, bits, code) in codes.iter().chain(EXTENDED_MAKEUP_CODES.iter()) {
		insert(&mut nodes, run, bits, code, NodeKind::Transit);
	}

	// 12-bit EOL: eleven zeros and a one
	insert(&mut nodes, 0, 12, 0x001, NodeKind::Eol);

	// Fill tolerance: more than eleven zeros stays in the pre-EOL state
	let mut state = 0usize;
	for _ in 0..11 {
		state = usize::from(nodes[state].next[0]);
	}
	let id = state as u16;
	nodes[state].next[0] = id;

	nodes
}

/// Outcome of running the state machine for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
	Run(u32),
	Eol,
	Invalid,
	EndOfInput,
}

/// MSB-first bit cursor over the input region.
#[derive(Debug)]
struct BitReader<'a> {
	data: &'a [u8],
	byte: usize,
	bit: u8,
}

impl<'a> BitReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			byte: 0,
			bit: 0,
		}
	}

	fn next_bit(&mut self) -> Option<u8> {
		let &value = self.data.get(self.byte)?;
		let bit = (value >> (7 - self.bit)) & 1;
		self.bit += 1;
		if self.bit == 8 {
			self.bit = 0;
			self.byte += 1;
		}
		Some(bit)
	}

	fn align_to_byte(&mut self) {
		if self.bit > 0 {
			self.bit = 0;
			self.byte += 1;
		}
	}

	fn is_empty(&self) -> bool {
		self.byte >= self.data.len()
	}

	/// Bytes consumed, counting a partially read byte as consumed.
	fn bytes_consumed(&self) -> usize {
		self.byte + usize::from(self.bit > 0)
	}
}

/// Fax decoding options, taken from the format's option bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaxOptions {
	/// Bit 0: the stream was encoded with 2-D coding
	pub two_dimensional: bool,
	/// Bit 1: the stream may switch to uncompressed mode
	pub uncompressed: bool,
	/// Bit 2: EOL codes are padded to byte boundaries
	pub byte_aligned_eol: bool,
}

impl FaxOptions {
	/// Splits a T.4 options word into its flags.
	pub fn from_bits(bits: u8) -> Self {
		Self {
			two_dimensional: bits & 0x01 != 0,
			uncompressed: bits & 0x02 != 0,
			byte_aligned_eol: bits & 0x04 != 0,
		}
	}
}

/// Shared machinery of the two fax codecs.
#[derive(Debug)]
struct FaxDecoder {
	options: FaxOptions,
	swap_bits: bool,
	word_aligned: bool,
	width: usize,
	has_eol: bool,
	eol_count: u32,

	white: Vec<Node>,
	black: Vec<Node>,
}

impl FaxDecoder {
	fn new(options: FaxOptions, swap_bits: bool, word_aligned: bool, width: usize, has_eol: bool) -> Self {
		Self {
			options,
			swap_bits,
			word_aligned,
			width,
			has_eol,
			eol_count: 0,
			white: build_state_machine(&WHITE_CODES),
			black: build_state_machine(&BLACK_CODES),
		}
	}

	/// Runs the state machine until a run completes, accumulating makeup
	/// codes. A source that ends mid-code yields a zero-length run.
	fn decode_run(&self, reader: &mut BitReader<'_>, black: bool) -> RunOutcome {
		let table = if black { &self.black } else { &self.white };
		let mut total = 0u32;

		loop {
			let mut state = 0usize;
			loop {
				let Some(bit) = reader.next_bit() else {
					return RunOutcome::EndOfInput;
				};
				let next = table[state].next[usize::from(bit)];
				if next == NO_STATE {
					return RunOutcome::Invalid;
				}
				state = usize::from(next);

				match table[state].kind {
					NodeKind::Transit => {}
					NodeKind::Terminating(run) => return RunOutcome::Run(total + u32::from(run)),
					NodeKind::Makeup(run) => {
						total += u32::from(run);
						break;
					}
					NodeKind::Eol => return RunOutcome::Eol,
				}
			}
		}
	}

	/// Scans for eleven or more zero bits followed by a one.
	fn sync_eol(&self, reader: &mut BitReader<'_>) -> bool {
		let mut zeros = 0u32;
		while let Some(bit) = reader.next_bit() {
			if bit == 0 {
				zeros += 1;
			} else if zeros >= 11 {
				return true;
			} else {
				zeros = 0;
			}
		}
		false
	}

	fn decode_region(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize, CodecStatus) {
		let reversed;
		let input: &[u8] = if self.swap_bits {
			reversed = source.iter().map(|&b| REVERSE_BITS[usize::from(b)]).collect::<Vec<u8>>();
			&reversed
		} else {
			source
		};

		// Runs only advance the cursor for white and set bits for black
		dest.fill(0);

		let mut reader = BitReader::new(input);
		let mut out_bit = 0usize; // absolute bit position in dest
		let dest_bits = dest.len() * 8;
		let mut status = CodecStatus::Ok;

		while status == CodecStatus::Ok && out_bit / 8 < dest.len() {
			if self.has_eol {
				if self.options.byte_aligned_eol {
					reader.align_to_byte();
				}
				if !self.sync_eol(&mut reader) {
					break;
				}
			}

			let mut rest_width = self.width;
			let mut black = false;

			loop {
				match self.decode_run(&mut reader, black) {
					RunOutcome::Run(length) => {
						// Over-long runs clamp; T.4 calls the line
						// unrecoverable but the stream can continue
						let length = (length as usize).min(rest_width);
						rest_width -= length;

						if black {
							let first = out_bit;
							let last = (out_bit + length).min(dest_bits);
							for bit in first..last {
								dest[bit / 8] |= 0x80 >> (bit % 8);
							}
						}
						out_bit += length;

						if rest_width == 0 {
							break;
						}
						black = !black;
					}
					RunOutcome::Eol => {
						self.eol_count += 1;
						break;
					}
					RunOutcome::Invalid => {
						log::debug!("fax: invalid code sequence, dropping rest of row");
						status = CodecStatus::InvalidInput;
						break;
					}
					RunOutcome::EndOfInput => {
						// The source ended inside a code: a zero-length
						// run, and the row stays short
						status = CodecStatus::NotEnoughInput;
						break;
					}
				}
			}

			// Row epilogue: output realigns to a byte, optionally a word
			out_bit = out_bit.next_multiple_of(8);
			if self.word_aligned && (out_bit / 8) % 2 == 1 {
				out_bit += 8;
			}
			if !self.has_eol {
				reader.align_to_byte();
				if reader.is_empty() {
					break;
				}
			}
		}

		let produced = (out_bit / 8).min(dest.len());
		(reader.bytes_consumed(), produced, status)
	}
}

/// CCITT Group 3 one-dimensional fax decoder.
#[derive(Debug)]
pub struct CcittFax3Codec {
	counters: CodecCounters,
	decoder: FaxDecoder,
}

impl CcittFax3Codec {
	/// Creates a Group 3 decoder for rows of `width` pixels.
	///
	/// `options` carries the T.4 option bits, `swap_bits` reverses the
	/// bit order of every input byte, and `word_aligned` starts each
	/// output row on an even byte offset. Zero width is rejected.
	pub fn new(options: FaxOptions, swap_bits: bool, word_aligned: bool, width: usize) -> Self {
		let counters = if width == 0 {
			log::debug!("fax row width must not be zero");
			CodecCounters::failed_init()
		} else {
			CodecCounters::new()
		};

		Self {
			counters,
			decoder: FaxDecoder::new(options, swap_bits, word_aligned, width, true),
		}
	}

	/// EOL codes seen so far, including the per-row synchronization runs.
	pub fn eol_count(&self) -> u32 {
		self.decoder.eol_count
	}
}

impl Codec for CcittFax3Codec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.decoder.eol_count = 0;
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let (consumed, produced, status) = self.decoder.decode_region(source, dest);
		self.counters.status = status;
		self.counters.end_call(source.len(), consumed, produced);
		(consumed, produced)
	}
}

/// CCITT modified-Huffman decoder (Group 3 without EOL codes).
#[derive(Debug)]
pub struct CcittMhCodec {
	counters: CodecCounters,
	decoder: FaxDecoder,
}

impl CcittMhCodec {
	/// Creates a modified-Huffman decoder for rows of `width` pixels.
	pub fn new(options: FaxOptions, swap_bits: bool, word_aligned: bool, width: usize) -> Self {
		let counters = if width == 0 {
			log::debug!("fax row width must not be zero");
			CodecCounters::failed_init()
		} else {
			CodecCounters::new()
		};

		Self {
			counters,
			decoder: FaxDecoder::new(options, swap_bits, word_aligned, width, false),
		}
	}
}

impl Codec for CcittMhCodec {
	fn counters(&self) -> &CodecCounters {
		&self.counters
	}

	fn counters_mut(&mut self) -> &mut CodecCounters {
		&mut self.counters
	}

	fn decode_init(&mut self) {
		self.counters.reset();
		self.decoder.eol_count = 0;
	}

	fn decode(&mut self, source: &[u8], dest: &mut [u8]) -> (usize, usize) {
		if !self.counters.begin_call(source.len(), dest.len()) {
			return (0, 0);
		}

		let (consumed, produced, status) = self.decoder.decode_region(source, dest);
		self.counters.status = status;
		self.counters.end_call(source.len(), consumed, produced);
		(consumed, produced)
	}
}
