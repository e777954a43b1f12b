//! Canonical Huffman codes.
//!
//! Codes are assigned from code lengths exactly as RFC 1951 section 3.2.2
//! describes, so a table is fully determined by its length vector. Decoding
//! walks the code one bit at a time using per-length counts.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::bits::{BitReader, BitWriter};
use crate::error::{DivergenceError, DivergenceResult};

/// Longest code length any table may use.
pub(crate) const MAX_CODE_LENGTH: u8 = 15;

/// Canonical Huffman table usable for both directions.
#[derive(Debug, Clone)]
pub(crate) struct HuffmanTable {
    /// Code and length per symbol; length 0 means "not encodable".
    codes: Vec<(u16, u8)>,
    /// Number of codes of each length, index 0 unused.
    counts: [u16; MAX_CODE_LENGTH as usize + 1],
    /// Symbols ordered by (length, symbol).
    symbols: Vec<u16>,
}

impl HuffmanTable {
    /// Build the canonical table for a length vector.
    ///
    /// # Errors
    ///
    /// Returns `CompressionFailure` for lengths above [`MAX_CODE_LENGTH`] or
    /// an over-subscribed length set.
    pub(crate) fn from_lengths(lengths: &[u8]) -> DivergenceResult<Self> {
        let mut counts = [0u16; MAX_CODE_LENGTH as usize + 1];
        for &length in lengths {
            if length > MAX_CODE_LENGTH {
                return Err(DivergenceError::CompressionFailure(format!(
                    "code length {} exceeds {}",
                    length, MAX_CODE_LENGTH
                )));
            }
            counts[length as usize] += 1;
        }
        counts[0] = 0;

        // Kraft check: remaining code space must never go negative.
        let mut left: i64 = 1;
        for &count in &counts[1..] {
            left = (left << 1) - i64::from(count);
            if left < 0 {
                return Err(DivergenceError::CompressionFailure(
                    "over-subscribed code lengths".to_string(),
                ));
            }
        }

        let mut next_code = [0u16; MAX_CODE_LENGTH as usize + 2];
        let mut code = 0u16;
        for bits in 1..=MAX_CODE_LENGTH as usize {
            code = (code + counts[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let mut codes = vec![(0u16, 0u8); lengths.len()];
        for (symbol, &length) in lengths.iter().enumerate() {
            if length > 0 {
                codes[symbol] = (next_code[length as usize], length);
                next_code[length as usize] += 1;
            }
        }

        let mut symbols: Vec<u16> = (0..lengths.len() as u16)
            .filter(|&s| lengths[s as usize] > 0)
            .collect();
        symbols.sort_by_key(|&s| (lengths[s as usize], s));

        Ok(Self {
            codes,
            counts,
            symbols,
        })
    }

    /// Build a table from symbol counts, limited to `max_length` bits.
    ///
    /// Ties are broken by symbol index, so equal counts always give equal
    /// tables. Symbols with a zero count get no code.
    pub(crate) fn from_counts(counts: &[u64], max_length: u8) -> DivergenceResult<Self> {
        Self::from_lengths(&code_lengths(counts, max_length))
    }

    /// Append the code for `symbol`.
    pub(crate) fn encode(&self, writer: &mut BitWriter, symbol: usize) -> DivergenceResult<()> {
        match self.codes.get(symbol) {
            Some(&(code, length)) if length > 0 => {
                writer.write_code(code, length);
                Ok(())
            }
            _ => Err(DivergenceError::CompressionFailure(format!(
                "symbol {} has no code",
                symbol
            ))),
        }
    }

    /// Read one symbol.
    pub(crate) fn decode(&self, reader: &mut BitReader<'_>) -> DivergenceResult<usize> {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for length in 1..=MAX_CODE_LENGTH as usize {
            code |= reader.read_bit()? as i32;
            let count = i32::from(self.counts[length]);
            if code - count < first {
                return Ok(self.symbols[(index + (code - first)) as usize] as usize);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Err(DivergenceError::corrupt("invalid Huffman code"))
    }
}

/// Huffman code lengths for `counts`, none longer than `max_length`.
///
/// When the optimal tree is too deep, counts are halved (keeping non-zero
/// counts non-zero) and the tree is rebuilt until it fits.
pub(crate) fn code_lengths(counts: &[u64], max_length: u8) -> Vec<u8> {
    let mut weights = counts.to_vec();
    loop {
        let lengths = unrestricted_lengths(&weights);
        if lengths.iter().all(|&l| l <= max_length) {
            return lengths;
        }
        for w in weights.iter_mut().filter(|w| **w > 0) {
            *w = (*w >> 1).max(1);
        }
    }
}

fn unrestricted_lengths(weights: &[u64]) -> Vec<u8> {
    let mut lengths = vec![0u8; weights.len()];
    let used: Vec<usize> = (0..weights.len()).filter(|&s| weights[s] > 0).collect();
    match used.len() {
        0 => return lengths,
        1 => {
            lengths[used[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    // Node ids: leaves are symbol indices, internal nodes follow in creation order.
    let leaves = weights.len();
    let mut parent: Vec<usize> = vec![usize::MAX; leaves];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> =
        used.iter().map(|&s| Reverse((weights[s], s))).collect();

    while heap.len() > 1 {
        let (Some(Reverse((w1, n1))), Some(Reverse((w2, n2)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let node = parent.len();
        parent.push(usize::MAX);
        parent[n1] = node;
        parent[n2] = node;
        heap.push(Reverse((w1 + w2, node)));
    }

    for &symbol in &used {
        let mut depth = 0u32;
        let mut node = symbol;
        while parent[node] != usize::MAX {
            node = parent[node];
            depth += 1;
        }
        lengths[symbol] = depth.min(u32::from(u8::MAX)) as u8;
    }
    lengths
}
