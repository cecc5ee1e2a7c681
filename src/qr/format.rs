/// Format information: EC level and mask pattern, BCH(15,5) protected
use tracing::debug;

use super::bch::{FORMAT_GENERATOR, bch_code, hamming_distance};
use crate::config;
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// XOR mask applied so the format bits are never all zero.
pub const FORMAT_MASK: u32 = 0x5412;

/// Copy 1 positions, index = bit number counted from the LSB, as (x, y).
const FORMAT_COORDINATES: [(usize, usize); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    pub fn new(ec_level: ECLevel, mask_pattern: MaskPattern) -> Self {
        Self {
            ec_level,
            mask_pattern,
        }
    }

    /// Masked 15-bit codeword.
    pub fn to_bits(&self) -> u32 {
        let data = ((self.ec_level.format_bits() as u32) << 3) | self.mask_pattern.bits() as u32;
        ((data << 10) | bch_code(data, FORMAT_GENERATOR)) ^ FORMAT_MASK
    }

    fn from_data(data: u32) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits(((data >> 3) & 0x03) as u8),
            mask_pattern: MaskPattern::from_bits((data & 0x07) as u8),
        }
    }

    /// Write both copies into a symbol of side `matrix.width()`.
    pub fn embed(&self, matrix: &mut BitMatrix) {
        let bits = self.to_bits();
        let width = matrix.width();
        let height = matrix.height();
        for (i, &(x, y)) in FORMAT_COORDINATES.iter().enumerate() {
            let bit = (bits >> i) & 1 == 1;
            matrix.set(x, y, bit);
            if i < 8 {
                matrix.set(width - i - 1, 8, bit);
            } else {
                matrix.set(8, height - 7 + (i - 8), bit);
            }
        }
    }

    /// Raw (still masked) bits of both copies, MSB first.
    pub fn read_copies(matrix: &BitMatrix) -> (u32, u32) {
        let dimension = matrix.width();
        let mut copy1 = 0u32;
        let push = |bits: &mut u32, x: usize, y: usize| {
            *bits = (*bits << 1) | matrix.get(x, y) as u32;
        };
        for x in 0..6 {
            push(&mut copy1, x, 8);
        }
        push(&mut copy1, 7, 8);
        push(&mut copy1, 8, 8);
        push(&mut copy1, 8, 7);
        for y in (0..6).rev() {
            push(&mut copy1, 8, y);
        }

        let mut copy2 = 0u32;
        for y in ((dimension - 7)..dimension).rev() {
            push(&mut copy2, 8, y);
        }
        for x in (dimension - 8)..dimension {
            push(&mut copy2, x, 8);
        }
        (copy1, copy2)
    }

    /// Closest valid codeword to either copy within the configured distance.
    pub fn decode(copy1: u32, copy2: u32) -> Result<Self> {
        let max_distance = config::format_max_distance();
        let mut best: Option<(u32, u32)> = None;
        for data in 0..32u32 {
            let candidate = Self::from_data(data);
            let target = candidate.to_bits();
            if target == copy1 || target == copy2 {
                return Ok(candidate);
            }
            let distance = hamming_distance(copy1, target).min(hamming_distance(copy2, target));
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((data, distance));
            }
        }
        match best {
            Some((data, distance)) if distance <= max_distance => {
                debug!(distance, "format information repaired");
                Ok(Self::from_data(data))
            }
            _ => Err(CodecError::format("unreadable format information")),
        }
    }

    /// Read and decode the format information of a symbol.
    pub fn extract(matrix: &BitMatrix) -> Result<Self> {
        let (copy1, copy2) = Self::read_copies(matrix);
        Self::decode(copy1, copy2)
    }
}
