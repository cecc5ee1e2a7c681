//! Parsing corrected data codewords into segments, bytes and text.

use tracing::debug;

use super::modes::{AlphanumericDecoder, ByteDecoder, KanjiDecoder, Mode, NumericDecoder};
use crate::common::BitReader;
use crate::common::eci::Charset;
use crate::config;
use crate::error::{CodecError, Result};
use crate::models::segment::push_run;
use crate::models::{ModeRun, StructuredAppend, Version};

/// Everything recovered from the data codewords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub data: Vec<u8>,
    pub content: String,
    pub segments: Vec<ModeRun<Mode>>,
    pub structured_append: Option<StructuredAppend>,
    /// FNC1 first or second position was present
    pub fnc1: bool,
}

pub fn decode_payload(data_codewords: &[u8], version: Version) -> Result<Payload> {
    let mut reader = BitReader::new(data_codewords);
    let mut payload = Payload::default();
    let mut charset: Option<Charset> = None;
    let mut fnc1_in_effect = false;

    loop {
        // Fewer than four bits left reads as an implicit terminator
        if reader.remaining() < 4 {
            break;
        }
        let mode = Mode::from_bits(reader.read_bits(4)?)?;

        match mode {
            Mode::Terminator => break,
            Mode::Fnc1FirstPosition => {
                fnc1_in_effect = true;
                payload.fnc1 = true;
            }
            Mode::Fnc1SecondPosition => {
                fnc1_in_effect = true;
                payload.fnc1 = true;
                let indicator = reader.read_bits(8)?;
                let prefix = if indicator < 100 {
                    format!("{:02}", indicator)
                } else {
                    char::from((indicator - 100) as u8).to_string()
                };
                payload.data.extend_from_slice(prefix.as_bytes());
                payload.content.push_str(&prefix);
            }
            Mode::StructuredAppend => {
                let sequence = reader.read_bits(8)? as u8;
                let parity = reader.read_bits(8)? as u8;
                payload.structured_append = Some(StructuredAppend {
                    index: sequence >> 4,
                    total: (sequence & 0x0F) + 1,
                    parity,
                });
            }
            Mode::Eci => {
                let value = parse_eci_value(&mut reader)?;
                charset = Some(Charset::from_eci(value));
            }
            Mode::Hanzi => {
                return Err(CodecError::format("hanzi mode is not supported"));
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = reader.read_bits(mode.character_count_bits(version))? as usize;
                match mode {
                    Mode::Numeric => {
                        let decoded = NumericDecoder::decode(&mut reader, count)?;
                        payload.data.extend_from_slice(decoded.as_bytes());
                        payload.content.push_str(&decoded);
                    }
                    Mode::Alphanumeric => {
                        let decoded =
                            AlphanumericDecoder::decode(&mut reader, count, fnc1_in_effect)?;
                        payload.data.extend_from_slice(decoded.as_bytes());
                        payload.content.push_str(&decoded);
                    }
                    Mode::Byte => {
                        let bytes = ByteDecoder::decode(&mut reader, count)?;
                        payload.content.push_str(&bytes_to_text(&bytes, charset));
                        payload.data.extend_from_slice(&bytes);
                    }
                    _ => {
                        let sjis = KanjiDecoder::decode(&mut reader, count)?;
                        payload.data.extend_from_slice(&sjis);
                        payload.content.push_str(&Charset::ShiftJis.decode(&sjis));
                    }
                }
                push_run(&mut payload.segments, mode, count);
            }
        }
    }

    debug!(
        segments = payload.segments.len(),
        bytes = payload.data.len(),
        "parsed QR payload"
    );
    Ok(payload)
}

/// ECI designator in its 8, 16 or 24-bit form.
fn parse_eci_value(reader: &mut BitReader<'_>) -> Result<u32> {
    let first = reader.read_bits(8)?;
    if first & 0x80 == 0 {
        return Ok(first & 0x7F);
    }
    if first & 0xC0 == 0x80 {
        let second = reader.read_bits(8)?;
        return Ok(((first & 0x3F) << 8) | second);
    }
    if first & 0xE0 == 0xC0 {
        let rest = reader.read_bits(16)?;
        return Ok(((first & 0x1F) << 16) | rest);
    }
    Err(CodecError::format(format!("bad ECI designator byte {:#x}", first)))
}

fn bytes_to_text(bytes: &[u8], charset: Option<Charset>) -> String {
    match charset {
        Some(charset) => charset.decode(bytes),
        None => match std::str::from_utf8(bytes) {
            Ok(text) if config::utf8_byte_fallback() => text.to_string(),
            _ => Charset::Iso8859_1.decode(bytes),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BitBuffer;
    use crate::common::eci::append_qr_designator;

    fn v1() -> Version {
        Version::new(1).unwrap()
    }

    #[test]
    fn test_reference_numeric_payload() {
        let data = [
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let payload = decode_payload(&data, v1()).unwrap();
        assert_eq!(payload.content, "01234567");
        assert_eq!(payload.segments, vec![ModeRun::new(Mode::Numeric, 8)]);
    }

    #[test]
    fn test_eci_utf8_byte_segment() {
        let text = "\u{20ac}1";
        let mut bits = BitBuffer::new();
        bits.append_bits(0x7, 4).unwrap();
        append_qr_designator(&mut bits, 26).unwrap();
        bits.append_bits(0x4, 4).unwrap();
        bits.append_bits(text.len() as u32, 8).unwrap();
        for b in text.bytes() {
            bits.append_bits(b as u32, 8).unwrap();
        }
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(payload.content, text);
        assert_eq!(payload.data, text.as_bytes());
    }

    #[test]
    fn test_eci_shift_jis_byte_segment() {
        let sjis = [0x93, 0x5F, 0x41];
        let mut bits = BitBuffer::new();
        bits.append_bits(0x7, 4).unwrap();
        append_qr_designator(&mut bits, 20).unwrap();
        bits.append_bits(0x4, 4).unwrap();
        bits.append_bits(sjis.len() as u32, 8).unwrap();
        for b in sjis {
            bits.append_bits(b as u32, 8).unwrap();
        }
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(payload.content, "\u{70B9}A");
        assert_eq!(payload.data, sjis.to_vec());
    }

    #[test]
    fn test_latin1_is_default() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0x4, 4).unwrap();
        bits.append_bits(1, 8).unwrap();
        bits.append_bits(0xE9, 8).unwrap();
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(payload.content, "\u{e9}");
    }

    #[test]
    fn test_structured_append_and_fnc1() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0x3, 4).unwrap();
        bits.append_bits(0x12, 8).unwrap(); // index 1 of 3
        bits.append_bits(0xAB, 8).unwrap();
        bits.append_bits(0x5, 4).unwrap(); // FNC1 first
        bits.append_bits(0x2, 4).unwrap();
        bits.append_bits(3, 9).unwrap();
        crate::qr::modes::AlphanumericEncoder::encode("1%2", &mut bits).unwrap();
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(
            payload.structured_append,
            Some(StructuredAppend { index: 1, total: 3, parity: 0xAB })
        );
        assert!(payload.fnc1);
        assert_eq!(payload.content, "1\u{1D}2");
    }

    #[test]
    fn test_fnc1_second_position_indicator() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0x9, 4).unwrap();
        bits.append_bits(37, 8).unwrap();
        bits.append_bits(0x1, 4).unwrap();
        bits.append_bits(1, 10).unwrap();
        bits.append_bits(7, 4).unwrap();
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(payload.content, "377");
    }

    #[test]
    fn test_kanji_decodes_to_text() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0x8, 4).unwrap();
        bits.append_bits(1, 8).unwrap();
        bits.append_bits(0xD9F, 13).unwrap();
        let payload = decode_payload(&bits.to_bytes(), v1()).unwrap();
        assert_eq!(payload.data, vec![0x93, 0x5F]);
        assert_eq!(payload.content, "\u{70B9}");
        assert_eq!(payload.segments, vec![ModeRun::new(Mode::Kanji, 1)]);
    }

    #[test]
    fn test_rejects_hanzi_and_truncation() {
        assert!(matches!(
            decode_payload(&[0xD0, 0x00], v1()),
            Err(CodecError::Format(_))
        ));
        // Byte segment claims 200 bytes but the stream ends
        assert!(matches!(
            decode_payload(&[0x4C, 0x80, 0x00], v1()),
            Err(CodecError::Format(_))
        ));
        // Unassigned mode indicator
        assert!(decode_payload(&[0x60], v1()).is_err());
    }
}
