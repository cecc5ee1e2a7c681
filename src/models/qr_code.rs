use super::{BitMatrix, ModeRun};
use crate::error::{CodecError, Result};
use crate::qr::modes::Mode;

/// QR code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version.
    pub const MIN: Version = Version(1);
    /// Largest version.
    pub const MAX: Version = Version(40);

    /// Validate a version number.
    pub fn new(number: u8) -> Result<Self> {
        if (1..=40).contains(&number) {
            Ok(Version(number))
        } else {
            Err(CodecError::InvalidArgument(format!(
                "QR version {} outside 1..=40",
                number
            )))
        }
    }

    /// Version implied by a symbol dimension (21, 25, ... 177).
    pub fn from_dimension(dimension: usize) -> Result<Self> {
        if !(21..=177).contains(&dimension) || (dimension - 17) % 4 != 0 {
            return Err(CodecError::format(format!(
                "dimension {} is not a QR symbol size",
                dimension
            )));
        }
        Ok(Version(((dimension - 17) / 4) as u8))
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// Iterate versions from `self` up to 40.
    pub fn up_to_max(self) -> impl Iterator<Item = Version> {
        (self.0..=40).map(Version)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// All levels, lowest first.
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Decode the two EC bits of the format information (01=L, 00=M, 11=Q, 10=H).
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Two EC bits as stored in the format information.
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the per-level tables.
    pub(crate) fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// All eight patterns in index order.
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Get mask pattern from bits
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    /// Three-bit pattern reference.
    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Check if module at row `i`, column `j` should be masked
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Structured append header carried by a QR symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// Position of this symbol in the sequence (0-based).
    pub index: u8,
    /// Total number of symbols in the sequence.
    pub total: u8,
    /// Parity byte over the whole message.
    pub parity: u8,
}

/// An encoded or decoded QR code
#[derive(Debug, Clone)]
pub struct QRCode {
    /// Raw payload bytes
    pub data: Vec<u8>,
    /// Payload as text
    pub content: String,
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub error_correction: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Module matrix (true = black, false = white)
    pub modules: BitMatrix,
    /// Mode-tagged runs in stream order
    pub segments: Vec<ModeRun<Mode>>,
    /// Structured append header, if present
    pub structured_append: Option<StructuredAppend>,
    /// Number of codewords repaired by error correction (decode only)
    pub corrected_errors: usize,
}

impl QRCode {
    /// Create a new QR code with decoded data
    pub fn new(
        data: Vec<u8>,
        content: String,
        version: Version,
        error_correction: ECLevel,
        mask_pattern: MaskPattern,
        modules: BitMatrix,
    ) -> Self {
        Self {
            data,
            content,
            version,
            error_correction,
            mask_pattern,
            modules,
            segments: Vec::new(),
            structured_append: None,
            corrected_errors: 0,
        }
    }

    /// Modes used, in stream order.
    pub fn modes(&self) -> Vec<Mode> {
        self.segments.iter().map(|run| run.mode).collect()
    }
}
