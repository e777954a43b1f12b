//! LZ77 + fixed-Huffman DEFLATE backend.
//!
//! Output is a single final DEFLATE block of type 01 (fixed Huffman codes,
//! RFC 1951 section 3.2.6) whose back-references may reach into the preset
//! dictionary. The code tables never change, so the only thing a dictionary
//! can influence is which back-references are available.

use super::bits::{BitReader, BitWriter};
use super::huffman::HuffmanTable;
use super::lz::{MatchFinder, Token, MAX_DISTANCE};
use super::DivergenceCompressor;
use crate::dictionary::Dictionary;
use crate::error::{DivergenceError, DivergenceResult};

const END_OF_BLOCK: usize = 256;

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115,
    131, 163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Fixed literal/length code lengths (RFC 1951 3.2.6).
fn fixed_literal_lengths() -> Vec<u8> {
    let mut lengths = vec![0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);
    lengths
}

/// Static LZ77 + fixed-Huffman compressor.
#[derive(Debug, Clone)]
pub struct DeflateFixedCompressor {
    finder: MatchFinder,
    literals: HuffmanTable,
    distances: HuffmanTable,
}

impl DeflateFixedCompressor {
    /// Create a compressor examining at most `max_chain` match candidates per position.
    pub fn new(max_chain: usize) -> DivergenceResult<Self> {
        Ok(Self {
            finder: MatchFinder::new(max_chain),
            literals: HuffmanTable::from_lengths(&fixed_literal_lengths())?,
            distances: HuffmanTable::from_lengths(&[5u8; 30])?,
        })
    }

    fn write_match(
        &self,
        writer: &mut BitWriter,
        length: u16,
        distance: u16,
    ) -> DivergenceResult<()> {
        let l = bucket(&LENGTH_BASE, length);
        self.literals.encode(writer, 257 + l)?;
        writer.write_bits(u32::from(length - LENGTH_BASE[l]), u32::from(LENGTH_EXTRA[l]));

        let d = bucket(&DISTANCE_BASE, distance);
        self.distances.encode(writer, d)?;
        writer.write_bits(
            u32::from(distance - DISTANCE_BASE[d]),
            u32::from(DISTANCE_EXTRA[d]),
        );
        Ok(())
    }
}

/// Index of the last base not greater than `value`.
fn bucket(bases: &[u16], value: u16) -> usize {
    bases.iter().rposition(|&base| base <= value).unwrap_or(0)
}

impl DivergenceCompressor for DeflateFixedCompressor {
    fn name(&self) -> &'static str {
        "deflate_fixed"
    }

    fn encode(&self, data: &[u8], dictionary: Option<&Dictionary>) -> DivergenceResult<Vec<u8>> {
        let primer = dictionary.map_or(&[][..], Dictionary::content);
        let tokens = self.finder.tokenize(primer, data);

        let mut writer = BitWriter::new();
        writer.write_bits(1, 1); // BFINAL
        writer.write_bits(1, 2); // BTYPE = fixed Huffman
        for token in tokens {
            match token {
                Token::Literal(byte) => self.literals.encode(&mut writer, usize::from(byte))?,
                Token::Match { length, distance } => {
                    self.write_match(&mut writer, length, distance)?
                }
            }
        }
        self.literals.encode(&mut writer, END_OF_BLOCK)?;
        Ok(writer.finish())
    }

    fn decompress(
        &self,
        compressed: &[u8],
        dictionary: Option<&Dictionary>,
    ) -> DivergenceResult<Vec<u8>> {
        let primer = dictionary.map_or(&[][..], Dictionary::content);
        let primer = &primer[primer.len().saturating_sub(MAX_DISTANCE)..];
        let mut reader = BitReader::new(compressed);

        let header = reader.read_bits(3)?;
        if header != 0b011 {
            return Err(DivergenceError::corrupt(format!(
                "expected final fixed-Huffman block header, got {:#05b}",
                header
            )));
        }

        let mut out = primer.to_vec();
        loop {
            let symbol = self.literals.decode(&mut reader)?;
            match symbol {
                0..=255 => out.push(symbol as u8),
                END_OF_BLOCK => break,
                257..=285 => {
                    let l = symbol - 257;
                    let extra = reader.read_bits(u32::from(LENGTH_EXTRA[l]))?;
                    let length = usize::from(LENGTH_BASE[l]) + extra as usize;

                    let d = self.distances.decode(&mut reader)?;
                    let extra = reader.read_bits(u32::from(DISTANCE_EXTRA[d]))?;
                    let distance = usize::from(DISTANCE_BASE[d]) + extra as usize;
                    if distance > out.len() {
                        return Err(DivergenceError::corrupt(format!(
                            "distance {} reaches before start of window ({} bytes)",
                            distance,
                            out.len()
                        )));
                    }
                    let from = out.len() - distance;
                    for i in 0..length {
                        out.push(out[from + i]);
                    }
                }
                other => {
                    return Err(DivergenceError::corrupt(format!(
                        "invalid literal/length symbol {}",
                        other
                    )))
                }
            }
        }
        Ok(out.split_off(primer.len()))
    }
}
