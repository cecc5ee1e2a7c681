//! Text and segment encoding into finished QR symbols.

use tracing::debug;

use super::matrix::build_symbol;
use super::modes::alphanumeric::alphanumeric_code;
use super::modes::{
    AlphanumericEncoder, ByteEncoder, KanjiEncoder, Mode, NumericEncoder,
};
use super::tables::{block_layout, data_codewords};
use crate::common::BitBuffer;
use crate::common::eci::{self, Charset, ECI_UTF8};
use crate::ecc::ReedSolomonEncoder;
use crate::error::{CodecError, Result};
use crate::models::segment::push_run;
use crate::models::{ECLevel, MaskPattern, ModeRun, QRCode, StructuredAppend, Version};

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Options for QR encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrEncodeOptions {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Use exactly this version
    pub version: Option<Version>,
    /// Smallest version to consider
    pub min_version: Version,
    /// Use this mask instead of the lowest-penalty one
    pub mask: Option<MaskPattern>,
    /// Announce UTF-8 byte segments with ECI 26
    pub emit_eci: bool,
}

impl Default for QrEncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::L,
            version: None,
            min_version: Version::MIN,
            mask: None,
            emit_eci: true,
        }
    }
}

impl QrEncodeOptions {
    pub fn with_ec_level(mut self, ec_level: ECLevel) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_mask(mut self, mask: MaskPattern) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// One segment of a QR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Numeric(String),
    Alphanumeric(String),
    Byte(Vec<u8>),
    /// Shift_JIS bytes, two per character
    Kanji(Vec<u8>),
    /// Charset designator for the segments that follow
    Eci(u32),
    /// GS1 data follows
    Fnc1First,
    /// AIM application indicator
    Fnc1Second(u8),
    StructuredAppend(StructuredAppend),
}

impl Segment {
    pub fn mode(&self) -> Mode {
        match self {
            Segment::Numeric(_) => Mode::Numeric,
            Segment::Alphanumeric(_) => Mode::Alphanumeric,
            Segment::Byte(_) => Mode::Byte,
            Segment::Kanji(_) => Mode::Kanji,
            Segment::Eci(_) => Mode::Eci,
            Segment::Fnc1First => Mode::Fnc1FirstPosition,
            Segment::Fnc1Second(_) => Mode::Fnc1SecondPosition,
            Segment::StructuredAppend(_) => Mode::StructuredAppend,
        }
    }

    /// Value of the character count indicator; zero for header-only segments.
    pub fn character_count(&self) -> usize {
        match self {
            Segment::Numeric(s) | Segment::Alphanumeric(s) => s.len(),
            Segment::Byte(b) => b.len(),
            Segment::Kanji(b) => b.len() / 2,
            _ => 0,
        }
    }

    /// Payload bytes this segment contributes to the decoded data.
    fn payload(&self) -> &[u8] {
        match self {
            Segment::Numeric(s) | Segment::Alphanumeric(s) => s.as_bytes(),
            Segment::Byte(b) | Segment::Kanji(b) => b,
            _ => &[],
        }
    }

    /// Text of this segment as a reader sees it under `charset`.
    fn text(&self, charset: Charset) -> String {
        match self {
            Segment::Numeric(s) | Segment::Alphanumeric(s) => s.clone(),
            Segment::Byte(b) => charset.decode(b),
            Segment::Kanji(b) => Charset::ShiftJis.decode(b),
            _ => String::new(),
        }
    }

    /// Append indicator, count and data.
    fn append_to(&self, version: Version, bits: &mut BitBuffer) -> Result<()> {
        let mode = self.mode();
        bits.append_bits(mode.bits(), 4)?;
        match self {
            Segment::Eci(value) => return eci::append_qr_designator(bits, *value),
            Segment::Fnc1First => return Ok(()),
            Segment::Fnc1Second(indicator) => return bits.append_bits(*indicator as u32, 8),
            Segment::StructuredAppend(sa) => {
                bits.append_bits(sa.index as u32, 4)?;
                bits.append_bits(sa.total.saturating_sub(1) as u32, 4)?;
                return bits.append_bits(sa.parity as u32, 8);
            }
            _ => {}
        }

        let count = self.character_count();
        let count_bits = mode.character_count_bits(version);
        if count >= 1 << count_bits {
            return Err(CodecError::CapacityExceeded {
                needed: count,
                available: (1 << count_bits) - 1,
            });
        }
        bits.append_bits(count as u32, count_bits)?;
        match self {
            Segment::Numeric(s) => NumericEncoder::encode(s, bits),
            Segment::Alphanumeric(s) => AlphanumericEncoder::encode(s, bits),
            Segment::Byte(b) => ByteEncoder::encode(b, bits),
            Segment::Kanji(b) => KanjiEncoder::encode(b, bits),
            _ => Ok(()),
        }
    }
}

/// Best single mode for a whole string. Kanji is only used when the caller
/// builds a [`Segment::Kanji`]; there is no per-character cost search here
/// as there is for Data Matrix encodations.
pub fn choose_mode(content: &str) -> Mode {
    if content.is_empty() {
        return Mode::Byte;
    }
    if content.chars().all(|c| c.is_ascii_digit()) {
        Mode::Numeric
    } else if content.chars().all(|c| alphanumeric_code(c).is_some()) {
        Mode::Alphanumeric
    } else {
        Mode::Byte
    }
}

/// Segments for a text payload: one data segment in the chosen mode,
/// preceded by ECI 26 when the text needs UTF-8.
pub fn segments_for_text(content: &str, emit_eci: bool) -> Vec<Segment> {
    match choose_mode(content) {
        Mode::Numeric => vec![Segment::Numeric(content.to_string())],
        Mode::Alphanumeric => vec![Segment::Alphanumeric(content.to_string())],
        _ => match eci::encode_latin1(content) {
            Some(bytes) => vec![Segment::Byte(bytes)],
            None if emit_eci => vec![
                Segment::Eci(ECI_UTF8),
                Segment::Byte(content.as_bytes().to_vec()),
            ],
            None => vec![Segment::Byte(content.as_bytes().to_vec())],
        },
    }
}

/// Bit stream for `segments` at `version`, before termination.
fn segment_bits(segments: &[Segment], version: Version) -> Result<BitBuffer> {
    let mut bits = BitBuffer::new();
    for segment in segments {
        segment.append_to(version, &mut bits)?;
    }
    Ok(bits)
}

/// Smallest version from `min_version` whose capacity holds the segments.
fn choose_version(
    segments: &[Segment],
    ec_level: ECLevel,
    min_version: Version,
) -> Result<(Version, BitBuffer)> {
    let mut needed = 0;
    for version in min_version.up_to_max() {
        let bits = match segment_bits(segments, version) {
            Ok(bits) => bits,
            // Character count too large for this band
            Err(CodecError::CapacityExceeded { .. }) => continue,
            Err(err) => return Err(err),
        };
        if bits.len_in_bytes() <= data_codewords(version, ec_level) {
            return Ok((version, bits));
        }
        needed = bits.len_in_bytes();
    }
    Err(CodecError::CapacityExceeded {
        needed,
        available: data_codewords(Version::MAX, ec_level),
    })
}

/// Terminator, byte alignment and alternating pad bytes up to `capacity` codewords.
pub fn terminate_bits(bits: &mut BitBuffer, capacity: usize) -> Result<()> {
    let capacity_bits = capacity * 8;
    if bits.len() > capacity_bits {
        return Err(CodecError::CapacityExceeded {
            needed: bits.len_in_bytes(),
            available: capacity,
        });
    }
    for _ in 0..(capacity_bits - bits.len()).min(4) {
        bits.append_bit(false);
    }
    while bits.len() % 8 != 0 {
        bits.append_bit(false);
    }
    let pad_count = capacity - bits.len_in_bytes();
    for i in 0..pad_count {
        bits.append_bits(PAD_BYTES[i % 2] as u32, 8)?;
    }
    Ok(())
}

/// Encode explicit segments into a symbol.
pub fn encode_segments(segments: &[Segment], options: &QrEncodeOptions) -> Result<QRCode> {
    let ec_level = options.ec_level;
    let (version, mut bits) = match options.version {
        Some(version) => {
            let bits = segment_bits(segments, version)?;
            let available = data_codewords(version, ec_level);
            if bits.len_in_bytes() > available {
                return Err(CodecError::CapacityExceeded {
                    needed: bits.len_in_bytes(),
                    available,
                });
            }
            (version, bits)
        }
        None => choose_version(segments, ec_level, options.min_version)?,
    };

    let capacity = data_codewords(version, ec_level);
    terminate_bits(&mut bits, capacity)?;
    let data = bits.to_bytes();

    let layout = block_layout(version, ec_level)?;
    let codewords = layout.encode(&data, ReedSolomonEncoder::qr_code())?;
    let (modules, mask) = build_symbol(version, ec_level, &codewords, options.mask);

    debug!(
        version = version.number(),
        ec = ?ec_level,
        mask = mask.bits(),
        data_codewords = capacity,
        "encoded QR symbol"
    );

    let mut runs: Vec<ModeRun<Mode>> = Vec::new();
    let mut payload = Vec::new();
    let mut content = String::new();
    let mut structured_append = None;
    let mut charset = Charset::Iso8859_1;
    for segment in segments {
        push_run(&mut runs, segment.mode(), segment.character_count());
        payload.extend_from_slice(segment.payload());
        content.push_str(&segment.text(charset));
        match segment {
            Segment::StructuredAppend(sa) => structured_append = Some(*sa),
            Segment::Eci(value) => charset = Charset::from_eci(*value),
            _ => {}
        }
    }

    let mut code = QRCode::new(payload, content, version, ec_level, mask, modules);
    code.segments = runs;
    code.structured_append = structured_append;
    Ok(code)
}

/// Encode text, picking the mode and charset automatically.
pub fn encode_text(content: &str, options: &QrEncodeOptions) -> Result<QRCode> {
    let segments = segments_for_text(content, options.emit_eci);
    let mut code = encode_segments(&segments, options)?;
    code.content = content.to_string();
    Ok(code)
}

/// Encode raw bytes in a single byte segment.
pub fn encode_bytes(data: &[u8], options: &QrEncodeOptions) -> Result<QRCode> {
    encode_segments(&[Segment::Byte(data.to_vec())], options)
}
