//! LSB-first bit packing, the bit order DEFLATE uses.

use crate::error::{DivergenceError, DivergenceResult};

/// Accumulates bits least-significant first into bytes.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    accumulator: u64,
    filled: u32,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write the low `count` bits of `value`, least significant first.
    pub(crate) fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        if count == 0 {
            return;
        }
        let mask = if count == 32 { u32::MAX } else { (1u32 << count) - 1 };
        self.accumulator |= u64::from(value & mask) << self.filled;
        self.filled += count;
        while self.filled >= 8 {
            self.bytes.push(self.accumulator as u8);
            self.accumulator >>= 8;
            self.filled -= 8;
        }
    }

    /// Write a Huffman code of `length` bits, most significant code bit first.
    pub(crate) fn write_code(&mut self, code: u16, length: u8) {
        for shift in (0..length).rev() {
            self.write_bits(u32::from((code >> shift) & 1), 1);
        }
    }

    /// Flush the partial byte (zero padded) and return the stream.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.accumulator as u8);
        }
        self.bytes
    }
}

/// Reads bits least-significant first from a byte slice.
#[derive(Debug)]
pub(crate) struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            bit: 0,
        }
    }

    /// Read one bit.
    pub(crate) fn read_bit(&mut self) -> DivergenceResult<u32> {
        let byte = self
            .bytes
            .get(self.position)
            .ok_or_else(|| DivergenceError::corrupt("unexpected end of stream"))?;
        let value = u32::from((byte >> self.bit) & 1);
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.position += 1;
        }
        Ok(value)
    }

    /// Read `count` bits, least significant first.
    pub(crate) fn read_bits(&mut self, count: u32) -> DivergenceResult<u32> {
        let mut value = 0u32;
        for i in 0..count {
            value |= self.read_bit()? << i;
        }
        Ok(value)
    }
}
