//! QR code data modes
//!
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: the 45-character set, two per 11 bits
//! - Byte: raw 8-bit data
//! - Kanji: Shift_JIS double-byte characters, 13 bits each

use crate::error::{CodecError, Result};
use crate::models::Version;

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;

pub use alphanumeric::{AlphanumericDecoder, AlphanumericEncoder};
pub use byte::{ByteDecoder, ByteEncoder};
pub use kanji::{KanjiDecoder, KanjiEncoder};
pub use numeric::{NumericDecoder, NumericEncoder};

/// Segment mode, identified on the wire by a 4-bit indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    /// FNC1 in first position (GS1)
    Fnc1FirstPosition,
    Eci,
    Kanji,
    /// FNC1 in second position (AIM application indicator)
    Fnc1SecondPosition,
    /// GB 2312 subset; recognised but not decoded
    Hanzi,
}

impl Mode {
    pub fn from_bits(bits: u32) -> Result<Mode> {
        Ok(match bits {
            0x0 => Mode::Terminator,
            0x1 => Mode::Numeric,
            0x2 => Mode::Alphanumeric,
            0x3 => Mode::StructuredAppend,
            0x4 => Mode::Byte,
            0x5 => Mode::Fnc1FirstPosition,
            0x7 => Mode::Eci,
            0x8 => Mode::Kanji,
            0x9 => Mode::Fnc1SecondPosition,
            0xD => Mode::Hanzi,
            other => {
                return Err(CodecError::format(format!("unknown mode indicator {:#x}", other)));
            }
        })
    }

    /// 4-bit mode indicator
    pub fn bits(&self) -> u32 {
        match self {
            Mode::Terminator => 0x0,
            Mode::Numeric => 0x1,
            Mode::Alphanumeric => 0x2,
            Mode::StructuredAppend => 0x3,
            Mode::Byte => 0x4,
            Mode::Fnc1FirstPosition => 0x5,
            Mode::Eci => 0x7,
            Mode::Kanji => 0x8,
            Mode::Fnc1SecondPosition => 0x9,
            Mode::Hanzi => 0xD,
        }
    }

    /// Width of the character count indicator for this mode at `version`.
    pub fn character_count_bits(&self, version: Version) -> usize {
        let band = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let widths: [usize; 3] = match self {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji | Mode::Hanzi => [8, 10, 12],
            _ => [0, 0, 0],
        };
        widths[band]
    }
}
