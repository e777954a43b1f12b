//! Dictionary-primed order-0 Huffman backend.
//!
//! The code is built once per call from the byte counts of the dictionary
//! content, with every byte value given one extra count so any input stays
//! encodable. Without a dictionary (or with an all-zero one) every byte gets
//! an 8-bit code. The stream is a LEB128 length header followed by codes.

use super::bits::{BitReader, BitWriter};
use super::huffman::{HuffmanTable, MAX_CODE_LENGTH};
use super::DivergenceCompressor;
use crate::dictionary::Dictionary;
use crate::error::{DivergenceError, DivergenceResult};

/// Static Huffman coder whose model is the dictionary's byte histogram.
#[derive(Debug, Clone, Default)]
pub struct PrimedHuffmanCompressor;

impl PrimedHuffmanCompressor {
    /// Create the compressor.
    pub fn new() -> Self {
        Self
    }

    fn table(dictionary: Option<&Dictionary>) -> DivergenceResult<HuffmanTable> {
        let mut counts = [1u64; 256];
        if let Some(dictionary) = dictionary {
            for &b in dictionary.content() {
                counts[b as usize] += 1;
            }
        }
        HuffmanTable::from_counts(&counts, MAX_CODE_LENGTH)
    }
}

fn write_varint(writer: &mut BitWriter, mut value: u64) {
    loop {
        let low = (value & 0x7f) as u32;
        value >>= 7;
        if value == 0 {
            writer.write_bits(low, 8);
            return;
        }
        writer.write_bits(low | 0x80, 8);
    }
}

fn read_varint(reader: &mut BitReader<'_>) -> DivergenceResult<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        let byte = reader.read_bits(8)?;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(DivergenceError::corrupt("length header too long"))
}

impl DivergenceCompressor for PrimedHuffmanCompressor {
    fn name(&self) -> &'static str {
        "primed_huffman"
    }

    fn encode(&self, data: &[u8], dictionary: Option<&Dictionary>) -> DivergenceResult<Vec<u8>> {
        let table = Self::table(dictionary)?;
        let mut writer = BitWriter::new();
        write_varint(&mut writer, data.len() as u64);
        for &b in data {
            table.encode(&mut writer, usize::from(b))?;
        }
        Ok(writer.finish())
    }

    fn decompress(
        &self,
        compressed: &[u8],
        dictionary: Option<&Dictionary>,
    ) -> DivergenceResult<Vec<u8>> {
        let table = Self::table(dictionary)?;
        let mut reader = BitReader::new(compressed);
        let length = read_varint(&mut reader)?;
        // Every symbol costs at least one bit.
        if length > (compressed.len() as u64).saturating_mul(8) {
            return Err(DivergenceError::corrupt(format!(
                "declared length {} exceeds stream capacity",
                length
            )));
        }

        let mut out = Vec::with_capacity(length as usize);
        for _ in 0..length {
            out.push(table.decode(&mut reader)? as u8);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dictionary_is_eight_bits_per_byte() {
        let c = PrimedHuffmanCompressor::new();
        let data = b"abcdefghij";
        // 1 header byte + 10 bytes of 8-bit codes.
        assert_eq!(c.compress(data, None).unwrap(), 11);
    }

    #[test]
    fn test_zero_dictionary_equals_no_dictionary() {
        let c = PrimedHuffmanCompressor::new();
        let data = b"identical behaviour expected";
        let zero = Dictionary::zeroed(1024);
        assert_eq!(
            c.encode(data, Some(&zero)).unwrap(),
            c.encode(data, None).unwrap()
        );
    }

    #[test]
    fn test_matching_dictionary_compresses_better() {
        let c = PrimedHuffmanCompressor::new();
        let text = b"eeeee eeee tttt aaa eeeee tt eeee";
        let dict = Dictionary::from_bytes(text.repeat(10));
        let foreign = Dictionary::from_bytes(b"zqxjkvbwy".repeat(30));
        let own = c.compress(text, Some(&dict)).unwrap();
        let other = c.compress(text, Some(&foreign)).unwrap();
        assert!(own < other, "own {} vs foreign {}", own, other);
    }

    #[test]
    fn test_roundtrip_all_byte_values() {
        let c = PrimedHuffmanCompressor::new();
        let data: Vec<u8> = (0..=255u8).chain(0..=255u8).collect();
        let dict = Dictionary::from_bytes(b"mostly ascii dictionary".to_vec());
        for d in [None, Some(&dict)] {
            let encoded = c.encode(&data, d).unwrap();
            assert_eq!(c.decompress(&encoded, d).unwrap(), data);
        }
    }

    #[test]
    fn test_varint_roundtrip() {
        for value in [0u64, 1, 127, 128, 300, 1 << 35] {
            let mut writer = BitWriter::new();
            write_varint(&mut writer, value);
            let bytes = writer.finish();
            assert_eq!(read_varint(&mut BitReader::new(&bytes)).unwrap(), value);
        }
    }

    #[test]
    fn test_impossible_length_rejected() {
        let c = PrimedHuffmanCompressor::new();
        let mut writer = BitWriter::new();
        write_varint(&mut writer, 1_000_000);
        let bytes = writer.finish();
        assert!(matches!(
            c.decompress(&bytes, None),
            Err(DivergenceError::CorruptStream(_))
        ));
    }
}
