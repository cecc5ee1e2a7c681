//! Extended Channel Interpretation: the small set of character sets the
//! codecs can interpret themselves, and the designator wire forms.

use tracing::debug;

use super::bits::BitBuffer;
use crate::error::{CodecError, Result};

/// ECI designator for UTF-8.
pub const ECI_UTF8: u32 = 26;
/// ECI designator for ISO-8859-1.
pub const ECI_ISO_8859_1: u32 = 3;
/// Largest designator the wire forms can carry.
pub const ECI_MAX: u32 = 999_999;

/// Character set selected by an ECI designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// ISO-8859-1, the default interpretation of both symbologies
    Iso8859_1,
    Utf8,
    Ascii,
    /// Shift_JIS, also the byte form of QR kanji segments
    ShiftJis,
}

impl Charset {
    /// Map a designator to a charset, falling back to ISO-8859-1 for
    /// designators this crate cannot interpret.
    pub fn from_eci(value: u32) -> Charset {
        match value {
            1 | 3 => Charset::Iso8859_1,
            20 => Charset::ShiftJis,
            26 => Charset::Utf8,
            27 | 170 => Charset::Ascii,
            other => {
                debug!(eci = other, "unsupported ECI, reading bytes as ISO-8859-1");
                Charset::Iso8859_1
            }
        }
    }

    /// Designator announcing this charset.
    pub fn eci_value(&self) -> u32 {
        match self {
            Charset::Iso8859_1 => ECI_ISO_8859_1,
            Charset::Utf8 => ECI_UTF8,
            Charset::Ascii => 27,
            Charset::ShiftJis => 20,
        }
    }

    /// Interpret `bytes` as text.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::ShiftJis => encoding_rs::SHIFT_JIS
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
            Charset::Ascii => bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        }
    }
}

/// ISO-8859-1 bytes of `text`, or `None` if any character is above U+00FF.
pub fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

/// Latin-1 bytes of `text`, reporting the first unrepresentable character.
pub fn encode_latin1_strict(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(u32::from(ch)).map_err(|_| CodecError::IllegalCharacter { ch, position })
        })
        .collect()
}

fn check_designator(value: u32) -> Result<()> {
    if value > ECI_MAX {
        return Err(CodecError::InvalidArgument(format!(
            "ECI designator {} above {}",
            value, ECI_MAX
        )));
    }
    Ok(())
}

/// QR form: 8, 16 or 24 bits with a 0 / 10 / 110 prefix.
pub fn append_qr_designator(bits: &mut BitBuffer, value: u32) -> Result<()> {
    check_designator(value)?;
    if value < 1 << 7 {
        bits.append_bits(value, 8)
    } else if value < 1 << 14 {
        bits.append_bits(0b10, 2)?;
        bits.append_bits(value, 14)
    } else {
        bits.append_bits(0b110, 3)?;
        bits.append_bits(value, 21)
    }
}

/// Data Matrix form: one to three codewords following the ECI latch.
pub fn dm_designator_codewords(value: u32) -> Result<Vec<u8>> {
    check_designator(value)?;
    Ok(if value <= 126 {
        vec![(value + 1) as u8]
    } else if value <= 16_382 {
        let v = value - 127;
        vec![(v / 254 + 128) as u8, (v % 254 + 1) as u8]
    } else {
        let v = value - 16_383;
        vec![
            (v / 64_516 + 192) as u8,
            ((v / 254) % 254 + 1) as u8,
            (v % 254 + 1) as u8,
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_mapping() {
        assert_eq!(Charset::from_eci(26), Charset::Utf8);
        assert_eq!(Charset::from_eci(3), Charset::Iso8859_1);
        assert_eq!(Charset::from_eci(999), Charset::Iso8859_1);
        assert_eq!(Charset::Iso8859_1.decode(&[0x41, 0xE9]), "A\u{e9}");
        assert_eq!(Charset::Utf8.decode("é".as_bytes()), "é");
    }

    #[test]
    fn test_shift_jis_text() {
        assert_eq!(Charset::from_eci(20), Charset::ShiftJis);
        // Kanji pair, ASCII, half-width katakana
        assert_eq!(Charset::ShiftJis.decode(&[0x93, 0x5F, 0x41, 0xB1]), "\u{70B9}A\u{FF71}");
        assert_eq!(Charset::Ascii.decode(&[0x41, 0xB1]), "A\u{FFFD}");
    }

    #[test]
    fn test_latin1() {
        assert_eq!(encode_latin1("Aé"), Some(vec![0x41, 0xE9]));
        assert_eq!(encode_latin1("A€"), None);
        assert_eq!(
            encode_latin1_strict("ab€"),
            Err(CodecError::IllegalCharacter { ch: '€', position: 2 })
        );
    }

    #[test]
    fn test_qr_designator_lengths() {
        for (value, len) in [(26u32, 8usize), (900, 16), (100_000, 24)] {
            let mut bits = BitBuffer::new();
            append_qr_designator(&mut bits, value).unwrap();
            assert_eq!(bits.len(), len);
        }
        let mut bits = BitBuffer::new();
        assert!(append_qr_designator(&mut bits, 1_000_000).is_err());
    }

    #[test]
    fn test_dm_designator_codewords() {
        assert_eq!(dm_designator_codewords(26).unwrap(), vec![27]);
        assert_eq!(dm_designator_codewords(127).unwrap(), vec![128, 1]);
        assert_eq!(dm_designator_codewords(16_383).unwrap(), vec![192, 1, 1]);
    }
}
