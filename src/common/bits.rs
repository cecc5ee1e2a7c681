use crate::error::{CodecError, Result};

/// Growable MSB-first bit sequence used while building codeword streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Number of bits written so far
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bytes needed to hold the current bits.
    pub fn len_in_bytes(&self) -> usize {
        self.bits.len().div_ceil(8)
    }

    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn append_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the low `num_bits` of `value`, most significant first.
    pub fn append_bits(&mut self, value: u32, num_bits: usize) -> Result<()> {
        if num_bits > 32 || (num_bits < 32 && value >> num_bits != 0) {
            return Err(CodecError::InvalidArgument(format!(
                "value {} does not fit in {} bits",
                value, num_bits
            )));
        }
        for i in (0..num_bits).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
        Ok(())
    }

    pub fn append_buffer(&mut self, other: &BitBuffer) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pack into bytes, zero-filling the last partial byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
            })
            .collect()
    }
}

/// Reads MSB-first bit fields from a byte slice.
pub struct BitReader<'a> {
    bytes: &'a [u8],
    idx: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, idx: 0 }
    }

    /// Bits not yet consumed
    pub fn remaining(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.idx)
    }

    /// Index of the next bit
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn byte_offset(&self) -> usize {
        self.idx / 8
    }

    pub fn bit_offset(&self) -> usize {
        self.idx % 8
    }

    pub fn read_bits(&mut self, n: usize) -> Result<u32> {
        if n > 32 || n > self.remaining() {
            return Err(CodecError::format(format!(
                "read of {} bits with {} remaining",
                n,
                self.remaining()
            )));
        }
        let mut val = 0u32;
        for _ in 0..n {
            let bit = (self.bytes[self.idx / 8] >> (7 - self.idx % 8)) & 1;
            val = (val << 1) | bit as u32;
            self.idx += 1;
        }
        Ok(val)
    }
}
