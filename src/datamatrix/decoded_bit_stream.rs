//! Data codewords back to bytes and text.
//!
//! Decoding starts in ASCII. Latches hand over to one of the other
//! encodations, which always return to ASCII when they end. Characters are
//! collected as bytes and turned into text per ECI charset run.

use tracing::{debug, trace};

use super::encoder::{
    ECI, EDIFACT_UNLATCH, Encodation, FNC1, LATCH_TO_ANSIX12, LATCH_TO_BASE256, LATCH_TO_C40,
    LATCH_TO_EDIFACT, LATCH_TO_TEXT, MACRO_05, MACRO_05_HEADER, MACRO_06, MACRO_06_HEADER,
    MACRO_TRAILER, PAD, READER_PROGRAMMING, STRUCTURED_APPEND, UNLATCH, UPPER_SHIFT,
};
use crate::common::BitReader;
use crate::common::eci::Charset;
use crate::error::{CodecError, Result};
use crate::models::ModeRun;
use crate::models::segment::push_run;

/// Group separator, emitted for FNC1
const GS: u8 = 0x1D;

const C40_SHIFT2: &[u8; 27] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_";
const TEXT_SHIFT3: &[u8; 32] = b"`ABCDEFGHIJKLMNOPQRSTUVWXYZ{|}~\x7F";

/// Decoded payload of one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedStream {
    /// Payload bytes, macro header and trailer included
    pub data: Vec<u8>,
    pub content: String,
    pub segments: Vec<ModeRun<Encodation>>,
    /// ECI designators in stream order
    pub eci: Vec<u32>,
}

enum Next {
    Ascii,
    Latch(Encodation),
    Eci,
    Done,
}

#[derive(Default)]
struct Output {
    data: Vec<u8>,
    text: String,
    /// Start of the bytes not yet converted to text
    pending: usize,
    charset: Option<Charset>,
    /// Characters produced by encodations, envelope bytes excluded
    counted: usize,
    segments: Vec<ModeRun<Encodation>>,
    eci: Vec<u32>,
}

impl Output {
    fn push(&mut self, byte: u8) {
        self.data.push(byte);
        self.counted += 1;
    }

    fn push_envelope(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Character value, lifted into the upper half if a shift is pending.
    fn push_value(&mut self, value: u32, upper_shift: &mut bool) -> Result<()> {
        let value = if std::mem::take(upper_shift) {
            value + 128
        } else {
            value
        };
        let byte = u8::try_from(value)
            .map_err(|_| CodecError::format(format!("character value {} out of range", value)))?;
        self.push(byte);
        Ok(())
    }

    fn set_charset(&mut self, charset: Charset) {
        self.flush();
        self.charset = Some(charset);
    }

    fn flush(&mut self) {
        let charset = self.charset.unwrap_or(Charset::Iso8859_1);
        self.text.push_str(&charset.decode(&self.data[self.pending..]));
        self.pending = self.data.len();
    }
}

fn read_codeword(bits: &mut BitReader<'_>) -> Result<u8> {
    Ok(bits.read_bits(8)? as u8)
}

/// Decode padded data codewords.
pub fn decode(codewords: &[u8]) -> Result<DecodedStream> {
    let mut bits = BitReader::new(codewords);
    let mut out = Output::default();
    let mut trailer: Option<&'static [u8]> = None;
    let mut next = Next::Ascii;

    while bits.remaining() > 0 {
        let before = out.counted;
        next = match next {
            Next::Ascii => {
                let next = decode_ascii_segment(&mut bits, &mut out, &mut trailer)?;
                push_run(&mut out.segments, Encodation::Ascii, out.counted - before);
                next
            }
            Next::Latch(mode) => {
                match mode {
                    Encodation::Ascii => {}
                    Encodation::C40 | Encodation::Text => {
                        decode_c40_segment(&mut bits, &mut out, mode)?
                    }
                    Encodation::X12 => decode_x12_segment(&mut bits, &mut out)?,
                    Encodation::Edifact => decode_edifact_segment(&mut bits, &mut out)?,
                    Encodation::Base256 => decode_base256_segment(&mut bits, &mut out)?,
                }
                trace!(?mode, characters = out.counted - before, "encodation segment");
                push_run(&mut out.segments, mode, out.counted - before);
                Next::Ascii
            }
            Next::Eci => {
                let value = decode_eci_segment(&mut bits)?;
                debug!(eci = value, "ECI designator");
                out.set_charset(Charset::from_eci(value));
                out.eci.push(value);
                Next::Ascii
            }
            Next::Done => break,
        };
    }

    if let Some(trailer) = trailer {
        out.push_envelope(trailer);
    }
    out.flush();
    Ok(DecodedStream {
        data: out.data,
        content: out.text,
        segments: out.segments,
        eci: out.eci,
    })
}

fn decode_ascii_segment(
    bits: &mut BitReader<'_>,
    out: &mut Output,
    trailer: &mut Option<&'static [u8]>,
) -> Result<Next> {
    let mut upper_shift = false;
    while bits.remaining() > 0 {
        let codeword = read_codeword(bits)?;
        match codeword {
            0 => return Err(CodecError::format("ASCII codeword 0")),
            1..=128 => {
                out.push_value(u32::from(codeword) - 1, &mut upper_shift)?;
                return Ok(Next::Ascii);
            }
            PAD => return Ok(Next::Done),
            130..=229 => {
                let pair = codeword - 130;
                out.push(b'0' + pair / 10);
                out.push(b'0' + pair % 10);
            }
            LATCH_TO_C40 => return Ok(Next::Latch(Encodation::C40)),
            LATCH_TO_BASE256 => return Ok(Next::Latch(Encodation::Base256)),
            FNC1 => out.push(GS),
            STRUCTURED_APPEND => {
                // Symbol sequence indicator and a two codeword file id
                let sequence = read_codeword(bits)?;
                let file_id = bits.read_bits(16)?;
                debug!(sequence, file_id, "structured append header skipped");
            }
            READER_PROGRAMMING => debug!("reader programming codeword ignored"),
            UPPER_SHIFT => upper_shift = true,
            MACRO_05 | MACRO_06 => {
                let header = if codeword == MACRO_05 {
                    MACRO_05_HEADER
                } else {
                    MACRO_06_HEADER
                };
                out.push_envelope(header);
                *trailer = Some(MACRO_TRAILER);
            }
            LATCH_TO_ANSIX12 => return Ok(Next::Latch(Encodation::X12)),
            LATCH_TO_TEXT => return Ok(Next::Latch(Encodation::Text)),
            LATCH_TO_EDIFACT => return Ok(Next::Latch(Encodation::Edifact)),
            ECI => return Ok(Next::Eci),
            // An unlatch may close the stream
            UNLATCH if bits.remaining() == 0 => {}
            other => {
                return Err(CodecError::format(format!(
                    "codeword {} is not valid in ASCII",
                    other
                )));
            }
        }
    }
    Ok(Next::Ascii)
}

/// Three values packed into a codeword pair.
fn triplet_values(first: u8, second: u8) -> Result<[u32; 3]> {
    let packed = (u32::from(first) << 8) + u32::from(second);
    let v = packed
        .checked_sub(1)
        .ok_or_else(|| CodecError::format("empty triplet"))?;
    Ok([v / 1600, (v % 1600) / 40, v % 40])
}

/// Next codeword pair, or `None` when the segment ends here.
fn read_pair(bits: &mut BitReader<'_>) -> Result<Option<(u8, u8)>> {
    // A lone last codeword is ASCII
    if bits.remaining() <= 8 {
        return Ok(None);
    }
    let first = read_codeword(bits)?;
    if first == UNLATCH {
        return Ok(None);
    }
    let second = read_codeword(bits)?;
    Ok(Some((first, second)))
}

fn decode_c40_segment(bits: &mut BitReader<'_>, out: &mut Output, mode: Encodation) -> Result<()> {
    let text = mode == Encodation::Text;
    let mut upper_shift = false;
    let mut shift = 0;

    while let Some((first, second)) = read_pair(bits)? {
        for value in triplet_values(first, second)? {
            match shift {
                0 => match value {
                    0..=2 => shift = value + 1,
                    3 => out.push_value(u32::from(b' '), &mut upper_shift)?,
                    4..=13 => out.push_value(value - 4 + u32::from(b'0'), &mut upper_shift)?,
                    14..=39 => {
                        let base = if text { b'a' } else { b'A' };
                        out.push_value(value - 14 + u32::from(base), &mut upper_shift)?
                    }
                    _ => {
                        return Err(CodecError::format(format!("{:?} value {}", mode, value)));
                    }
                },
                1 => {
                    out.push_value(value, &mut upper_shift)?;
                    shift = 0;
                }
                2 => {
                    match value {
                        0..=26 => {
                            out.push_value(u32::from(C40_SHIFT2[value as usize]), &mut upper_shift)?
                        }
                        27 => out.push(GS),
                        30 => upper_shift = true,
                        _ => {
                            return Err(CodecError::format(format!(
                                "{:?} shift 2 value {}",
                                mode, value
                            )));
                        }
                    }
                    shift = 0;
                }
                _ => {
                    if text {
                        let c = TEXT_SHIFT3.get(value as usize).ok_or_else(|| {
                            CodecError::format(format!("TEXT shift 3 value {}", value))
                        })?;
                        out.push_value(u32::from(*c), &mut upper_shift)?;
                    } else {
                        out.push_value(value + 96, &mut upper_shift)?;
                    }
                    shift = 0;
                }
            }
        }
    }
    Ok(())
}

fn decode_x12_segment(bits: &mut BitReader<'_>, out: &mut Output) -> Result<()> {
    while let Some((first, second)) = read_pair(bits)? {
        for value in triplet_values(first, second)? {
            let c = match value {
                0 => b'\r',
                1 => b'*',
                2 => b'>',
                3 => b' ',
                4..=13 => value as u8 + 44,
                14..=39 => value as u8 + 51,
                _ => return Err(CodecError::format(format!("X12 value {}", value))),
            };
            out.push(c);
        }
    }
    Ok(())
}

fn decode_edifact_segment(bits: &mut BitReader<'_>, out: &mut Output) -> Result<()> {
    // Two codewords or fewer are ASCII without an unlatch
    while bits.remaining() > 16 {
        for _ in 0..4 {
            let value = bits.read_bits(6)?;
            if value == u32::from(EDIFACT_UNLATCH) {
                let bit_offset = bits.bit_offset();
                if bit_offset != 0 {
                    bits.read_bits(8 - bit_offset)?;
                }
                return Ok(());
            }
            let value = if value & 0x20 == 0 { value | 0x40 } else { value };
            out.push(value as u8);
        }
    }
    Ok(())
}

/// Undo the 255-state randomization at 1-based `position`.
fn unrandomize_255_state(value: u8, position: usize) -> u8 {
    let pseudo_random = ((149 * position) % 255 + 1) as u8;
    value.wrapping_sub(pseudo_random)
}

fn decode_base256_segment(bits: &mut BitReader<'_>, out: &mut Output) -> Result<()> {
    let mut position = bits.byte_offset() + 1;
    let d1 = unrandomize_255_state(read_codeword(bits)?, position) as usize;
    position += 1;

    let count = match d1 {
        0 => bits.remaining() / 8,
        1..=249 => d1,
        _ => {
            let d2 = unrandomize_255_state(read_codeword(bits)?, position) as usize;
            position += 1;
            250 * (d1 - 249) + d2
        }
    };
    if count * 8 > bits.remaining() {
        return Err(CodecError::format(format!(
            "Base 256 length {} exceeds the {} codewords left",
            count,
            bits.remaining() / 8
        )));
    }

    for _ in 0..count {
        let byte = unrandomize_255_state(read_codeword(bits)?, position);
        out.push(byte);
        position += 1;
    }
    Ok(())
}

fn decode_eci_segment(bits: &mut BitReader<'_>) -> Result<u32> {
    let c1 = u32::from(read_codeword(bits)?);
    match c1 {
        0 => Err(CodecError::format("ECI codeword 0")),
        1..=127 => Ok(c1 - 1),
        128..=191 => {
            let c2 = u32::from(read_codeword(bits)?);
            Ok((c1 - 128) * 254 + 126 + c2)
        }
        _ => {
            let c2 = u32::from(read_codeword(bits)?);
            let c3 = u32::from(read_codeword(bits)?);
            let low = (c2 * 254 + c3)
                .checked_sub(255)
                .ok_or_else(|| CodecError::format("malformed ECI designator"))?;
            Ok((c1 - 192) * 64516 + 16383 + low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::eci::dm_designator_codewords;

    fn content(codewords: &[u8]) -> String {
        decode(codewords).unwrap().content
    }

    #[test]
    fn test_ascii() {
        assert_eq!(content(&[73, 106, 34]), "Hi!");
        assert_eq!(content(&[142, 129, 70]), "12");
        assert_eq!(content(&[142, 164, 186]), "123456");
        let decoded = decode(&[235, 106, 129]).unwrap();
        assert_eq!(decoded.data, vec![0xE9]);
        assert_eq!(decoded.content, "\u{e9}");
        assert_eq!(decoded.segments, vec![ModeRun::new(Encodation::Ascii, 1)]);
    }

    #[test]
    fn test_text_segment() {
        let decoded =
            decode(&[73, 239, 116, 130, 175, 52, 19, 40, 179, 242, 106, 105]).unwrap();
        assert_eq!(decoded.content, "Hello, World!");
        assert_eq!(
            decoded.segments,
            vec![
                ModeRun::new(Encodation::Ascii, 1),
                ModeRun::new(Encodation::Text, 12)
            ]
        );
    }

    #[test]
    fn test_c40_segment() {
        assert_eq!(content(&[230, 91, 11, 91, 11, 91, 11, 254]), "AIMAIMAIM");
    }

    #[test]
    fn test_x12_then_ascii() {
        let decoded = decode(&[238, 89, 233, 14, 192, 100, 207, 44, 31, 67]).unwrap();
        assert_eq!(decoded.content, "ABC>ABC123>AB");
        assert_eq!(
            decoded.segments,
            vec![
                ModeRun::new(Encodation::X12, 12),
                ModeRun::new(Encodation::Ascii, 1)
            ]
        );
    }

    #[test]
    fn test_edifact_segment() {
        let codewords = [
            240, 184, 27, 131, 198, 236, 238, 16, 21, 1, 187, 28, 179, 16, 21, 1, 187, 28, 179, 16,
            21, 1,
        ];
        assert_eq!(content(&codewords), ".A.C1.3.DATA.123DATA.123DATA");
    }

    #[test]
    fn test_base256_segment() {
        let decoded = decode(&[231, 44, 108, 59, 226, 126, 1, 104]).unwrap();
        assert_eq!(decoded.data, b"\xAB\xE4\xF6\xFC\xE9\xBB");
        assert_eq!(decoded.segments, vec![ModeRun::new(Encodation::Base256, 6)]);
    }

    #[test]
    fn test_macro_and_eci() {
        let decoded = decode(&[236, 241, 27, 231, 240, 114, 183, 81, 219, 129]).unwrap();
        assert_eq!(decoded.content, "[)>\x1E05\x1D\u{1F918}\x1E\x04");
        assert_eq!(decoded.eci, vec![26]);
        assert_eq!(decoded.segments, vec![ModeRun::new(Encodation::Base256, 4)]);
    }

    #[test]
    fn test_fnc1_and_structured_append() {
        assert_eq!(content(&[232, 50, 51]), "\x1D12");
        // Sequence indicator and file id are skipped
        assert_eq!(content(&[233, 0x12, 1, 2, 66]), "A");
    }

    #[test]
    fn test_eci_designator_forms() {
        for value in [0, 26, 126, 127, 900, 16382, 16383, 100_000, 999_999] {
            let codewords = dm_designator_codewords(value).unwrap();
            let mut bits = BitReader::new(&codewords);
            assert_eq!(decode_eci_segment(&mut bits).unwrap(), value);
        }
    }

    #[test]
    fn test_rejects_malformed_streams() {
        assert!(matches!(decode(&[0]), Err(CodecError::Format(_))));
        assert!(matches!(decode(&[254, 66]), Err(CodecError::Format(_))));
        // Base 256 length running past the end
        assert!(matches!(decode(&[231, 54, 1]), Err(CodecError::Format(_))));
        // X12 value 40
        assert!(matches!(decode(&[238, 250, 129, 66]), Err(CodecError::Format(_))));
    }

    #[test]
    fn test_unlatch_at_end_is_accepted() {
        assert_eq!(content(&[66, 254]), "A");
    }
}
