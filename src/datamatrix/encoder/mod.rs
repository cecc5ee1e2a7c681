//! ECC 200 high-level encoding: message bytes to data codewords.
//!
//! Each encodation advances one shared [`EncoderContext`]; a look-ahead
//! cost estimate decides when to latch to another one.

mod ascii;
mod base256;
mod c40;
pub mod context;
mod edifact;
mod x12;

use tracing::debug;

pub use context::EncoderContext;

use super::DataMatrixOptions;
use super::symbol_info::SymbolInfo;
use crate::common::eci::dm_designator_codewords;
use crate::error::Result;
use crate::models::ModeRun;
use crate::models::segment::push_run;

pub const PAD: u8 = 129;
pub const LATCH_TO_C40: u8 = 230;
pub const LATCH_TO_BASE256: u8 = 231;
pub const FNC1: u8 = 232;
pub const STRUCTURED_APPEND: u8 = 233;
pub const READER_PROGRAMMING: u8 = 234;
pub const UPPER_SHIFT: u8 = 235;
pub const MACRO_05: u8 = 236;
pub const MACRO_06: u8 = 237;
pub const LATCH_TO_ANSIX12: u8 = 238;
pub const LATCH_TO_TEXT: u8 = 239;
pub const LATCH_TO_EDIFACT: u8 = 240;
pub const ECI: u8 = 241;
/// Leaves C40, TEXT and X12
pub const UNLATCH: u8 = 254;
/// EDIFACT value that returns to ASCII
pub const EDIFACT_UNLATCH: u8 = 31;

pub const MACRO_05_HEADER: &[u8] = b"[)>\x1E05\x1D";
pub const MACRO_06_HEADER: &[u8] = b"[)>\x1E06\x1D";
pub const MACRO_TRAILER: &[u8] = b"\x1E\x04";

/// Data Matrix encodation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encodation {
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

impl Encodation {
    /// Cost table order.
    pub const ALL: [Encodation; 6] = [
        Encodation::Ascii,
        Encodation::C40,
        Encodation::Text,
        Encodation::X12,
        Encodation::Edifact,
        Encodation::Base256,
    ];

    fn index(self) -> usize {
        match self {
            Encodation::Ascii => 0,
            Encodation::C40 => 1,
            Encodation::Text => 2,
            Encodation::X12 => 3,
            Encodation::Edifact => 4,
            Encodation::Base256 => 5,
        }
    }

    /// Codeword that switches from ASCII into this encodation.
    pub fn latch(self) -> Option<u8> {
        match self {
            Encodation::Ascii => None,
            Encodation::C40 => Some(LATCH_TO_C40),
            Encodation::Text => Some(LATCH_TO_TEXT),
            Encodation::X12 => Some(LATCH_TO_ANSIX12),
            Encodation::Edifact => Some(LATCH_TO_EDIFACT),
            Encodation::Base256 => Some(LATCH_TO_BASE256),
        }
    }

    /// Encode from the context position until the encodation ends or asks
    /// for a switch.
    fn encode(self, ctx: &mut EncoderContext<'_>) -> Result<()> {
        match self {
            Encodation::Ascii => ascii::encode(ctx),
            Encodation::C40 | Encodation::Text => c40::encode(ctx, self),
            Encodation::X12 => x12::encode(ctx),
            Encodation::Edifact => edifact::encode(ctx),
            Encodation::Base256 => base256::encode(ctx),
        }
    }
}

/// Result of high-level encoding.
#[derive(Debug, Clone)]
pub struct HighLevel {
    /// Data codewords, padded to the symbol capacity
    pub codewords: Vec<u8>,
    pub symbol: &'static SymbolInfo,
    pub segments: Vec<ModeRun<Encodation>>,
}

pub(crate) fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

pub(crate) fn is_extended_ascii(c: u8) -> bool {
    c >= 128
}

fn is_native_c40(c: u8) -> bool {
    c == b' ' || c.is_ascii_digit() || c.is_ascii_uppercase()
}

fn is_native_text(c: u8) -> bool {
    c == b' ' || c.is_ascii_digit() || c.is_ascii_lowercase()
}

fn is_x12_term_sep(c: u8) -> bool {
    matches!(c, b'\r' | b'*' | b'>')
}

pub(crate) fn is_native_x12(c: u8) -> bool {
    is_x12_term_sep(c) || c == b' ' || c.is_ascii_digit() || c.is_ascii_uppercase()
}

pub(crate) fn is_native_edifact(c: u8) -> bool {
    (b' '..=b'^').contains(&c)
}

/// Encodation to use from `start` given the current one.
pub fn look_ahead(message: &[u8], start: usize, current: Encodation) -> Encodation {
    let next = look_ahead_costs(message, start, current);
    // Entering or staying in X12 or EDIFACT needs the next full group to be native
    match next {
        Encodation::X12 => {
            let end = (start + 3).min(message.len());
            if !message[start..end].iter().all(|&c| is_native_x12(c)) {
                return Encodation::Ascii;
            }
        }
        Encodation::Edifact => {
            let end = (start + 4).min(message.len());
            if !message[start..end].iter().all(|&c| is_native_edifact(c)) {
                return Encodation::Ascii;
            }
        }
        _ => {}
    }
    next
}

/// Ceiled costs and how many encodations share the minimum.
fn minimums(costs: &[f32; 6]) -> ([usize; 6], usize, [bool; 6]) {
    let ints = costs.map(|c| c.ceil() as usize);
    let min = ints.iter().copied().min().unwrap_or(0);
    let mins = ints.map(|c| c == min);
    (ints, min, mins)
}

fn look_ahead_costs(message: &[u8], start: usize, current: Encodation) -> Encodation {
    use Encodation::*;

    if start >= message.len() {
        return current;
    }
    let mut costs: [f32; 6] = if current == Ascii {
        [0.0, 1.0, 1.0, 1.0, 1.0, 1.25]
    } else {
        let mut c = [1.0, 2.0, 2.0, 2.0, 2.0, 2.25];
        c[current.index()] = 0.0;
        c
    };

    let mut processed = 0;
    loop {
        if start + processed == message.len() {
            let (ints, min, mins) = minimums(&costs);
            if ints[Ascii.index()] == min {
                return Ascii;
            }
            if mins.iter().filter(|&&m| m).count() == 1 {
                for mode in [Base256, Edifact, Text, X12] {
                    if mins[mode.index()] {
                        return mode;
                    }
                }
            }
            return C40;
        }

        let c = message[start + processed];
        processed += 1;

        let ascii = &mut costs[Ascii.index()];
        if is_digit(c) {
            *ascii += 0.5;
        } else if is_extended_ascii(c) {
            *ascii = ascii.ceil() + 2.0;
        } else {
            *ascii = ascii.ceil() + 1.0;
        }

        costs[C40.index()] += if is_native_c40(c) {
            2.0 / 3.0
        } else if is_extended_ascii(c) {
            8.0 / 3.0
        } else {
            4.0 / 3.0
        };

        costs[Text.index()] += if is_native_text(c) {
            2.0 / 3.0
        } else if is_extended_ascii(c) {
            8.0 / 3.0
        } else {
            4.0 / 3.0
        };

        costs[X12.index()] += if is_native_x12(c) {
            2.0 / 3.0
        } else if is_extended_ascii(c) {
            13.0 / 3.0
        } else {
            10.0 / 3.0
        };

        costs[Edifact.index()] += if is_native_edifact(c) {
            3.0 / 4.0
        } else if is_extended_ascii(c) {
            17.0 / 4.0
        } else {
            13.0 / 4.0
        };

        costs[Base256.index()] += 1.0;

        if processed >= 4 {
            let (ints, _, _) = minimums(&costs);
            let [ascii, c40, text, x12, edifact, base256] = ints;

            if ascii < c40.min(text).min(x12).min(edifact).min(base256) {
                return Ascii;
            }
            if base256 < ascii || base256 + 1 < c40.min(text).min(x12).min(edifact) {
                return Base256;
            }
            if edifact + 1 < base256.min(c40).min(text).min(x12).min(ascii) {
                return Edifact;
            }
            if text + 1 < base256.min(c40).min(edifact).min(x12).min(ascii) {
                return Text;
            }
            if x12 + 1 < base256.min(c40).min(edifact).min(text).min(ascii) {
                return X12;
            }
            if c40 + 1 < ascii.min(base256).min(edifact).min(text) {
                if c40 < x12 {
                    return C40;
                }
                if c40 == x12 {
                    // X12 wins if a terminator or separator comes before a non-X12 character
                    for &tc in message.iter().skip(start + processed + 1) {
                        if is_x12_term_sep(tc) {
                            return X12;
                        }
                        if !is_native_x12(tc) {
                            break;
                        }
                    }
                    return C40;
                }
            }
        }
    }
}

/// Run of ASCII digits starting at `start`.
pub(crate) fn consecutive_digit_count(message: &[u8], start: usize) -> usize {
    message
        .iter()
        .skip(start)
        .take_while(|&&c| is_digit(c))
        .count()
}

/// Pad codeword for 1-based position `position` after the first pad.
fn randomize_253_state(position: usize) -> u8 {
    let pseudo_random = (149 * position) % 253 + 1;
    let value = PAD as usize + pseudo_random;
    if value <= 254 {
        value as u8
    } else {
        (value - 254) as u8
    }
}

/// Encode `message` bytes (ISO-8859-1 unless `eci` says otherwise) into
/// padded data codewords for the smallest allowed symbol.
pub fn encode_high_level(
    message: &[u8],
    options: &DataMatrixOptions,
    eci: Option<u32>,
) -> Result<HighLevel> {
    let mut ctx = EncoderContext::new(message, options);

    if options.detect_macros && message.ends_with(MACRO_TRAILER) {
        let macro_codeword = if message.starts_with(MACRO_05_HEADER) {
            Some((MACRO_05, MACRO_05_HEADER.len()))
        } else if message.starts_with(MACRO_06_HEADER) {
            Some((MACRO_06, MACRO_06_HEADER.len()))
        } else {
            None
        };
        if let Some((codeword, header_len)) = macro_codeword {
            if message.len() >= header_len + MACRO_TRAILER.len() {
                ctx.write_codeword(codeword);
                ctx.set_skip_at_end(MACRO_TRAILER.len());
                ctx.pos += header_len;
            }
        }
    }

    if let Some(value) = eci {
        ctx.write_codeword(ECI);
        ctx.write_codewords(&dm_designator_codewords(value)?);
    }

    let mut segments = Vec::new();
    let mut mode = Encodation::Ascii;
    while ctx.has_more_characters() {
        let start = ctx.pos;
        mode.encode(&mut ctx)?;
        push_run(&mut segments, mode, ctx.pos.saturating_sub(start));
        if let Some(next) = ctx.take_new_encoding() {
            if next != mode {
                debug!(from = ?mode, to = ?next, position = ctx.pos, "encodation switch");
            }
            mode = next;
        }
    }

    let len = ctx.codeword_count();
    let symbol = ctx.update_symbol_info(len)?;
    let capacity = symbol.data_capacity;
    if len < capacity
        && !matches!(
            mode,
            Encodation::Ascii | Encodation::Base256 | Encodation::Edifact
        )
    {
        ctx.write_codeword(UNLATCH);
    }

    let mut codewords = ctx.into_codewords();
    if codewords.len() < capacity {
        codewords.push(PAD);
    }
    while codewords.len() < capacity {
        codewords.push(randomize_253_state(codewords.len() + 1));
    }

    debug!(
        width = symbol.symbol_width(),
        height = symbol.symbol_height(),
        data_codewords = len,
        capacity,
        "Data Matrix symbol selected"
    );
    Ok(HighLevel {
        codewords,
        symbol,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamatrix::SymbolShape;
    use crate::error::CodecError;

    fn encode(message: &[u8]) -> Vec<u8> {
        encode_high_level(message, &DataMatrixOptions::default(), None)
            .unwrap()
            .codewords
    }

    #[test]
    fn test_digit_pair_is_one_codeword() {
        let high = encode_high_level(b"12", &DataMatrixOptions::default(), None).unwrap();
        assert_eq!(high.codewords[0], 142);
        assert_eq!(high.codewords, vec![142, 129, 70]);
        assert_eq!(high.segments, vec![ModeRun::new(Encodation::Ascii, 2)]);
    }

    #[test]
    fn test_ascii_reference_streams() {
        assert_eq!(encode(b"123456"), vec![142, 164, 186]);
        assert_eq!(encode(b"A"), vec![66, 129, 70]);
        assert_eq!(encode(b"\xE9"), vec![235, 106, 129]);
    }

    #[test]
    fn test_c40_reference_stream() {
        // C40 triplets for "AIM" and "AIM", then unlatch and padding
        assert_eq!(
            encode(b"AIMAIMAIM"),
            vec![230, 91, 11, 91, 11, 91, 11, 254]
        );
    }

    #[test]
    fn test_x12_reference_stream() {
        assert_eq!(
            encode(b"ABC>ABC123>AB"),
            vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 67]
        );
    }

    #[test]
    fn test_edifact_reference_stream() {
        assert_eq!(
            encode(b".A.C1.3.DATA.123DATA.123DATA"),
            vec![
                240, 184, 27, 131, 198, 236, 238, 16, 21, 1, 187, 28, 179, 16, 21, 1, 187, 28, 179,
                16, 21, 1
            ]
        );
    }

    #[test]
    fn test_base256_reference_stream() {
        assert_eq!(
            encode(b"\xAB\xE4\xF6\xFC\xE9\xBB"),
            vec![231, 44, 108, 59, 226, 126, 1, 104]
        );
    }

    #[test]
    fn test_padding_randomization() {
        let padded = encode_high_level(
            b"A",
            &DataMatrixOptions {
                min_size: Some((12, 12)),
                ..DataMatrixOptions::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(padded.codewords, vec![66, 129, 70, 220, 115]);
    }

    #[test]
    fn test_macro_and_eci_header() {
        let message = "[)>\x1E05\x1D\u{1F918}\x1E\x04";
        let high =
            encode_high_level(message.as_bytes(), &DataMatrixOptions::default(), Some(26))
                .unwrap();
        assert_eq!(
            high.codewords,
            vec![236, 241, 27, 231, 240, 114, 183, 81, 219, 129]
        );
        assert_eq!(high.segments, vec![ModeRun::new(Encodation::Base256, 4)]);
    }

    #[test]
    fn test_macro_detection_can_be_disabled() {
        let options = DataMatrixOptions {
            detect_macros: false,
            ..DataMatrixOptions::default()
        };
        let high = encode_high_level(b"[)>\x1E05\x1DX\x1E\x04", &options, None).unwrap();
        assert_ne!(high.codewords[0], MACRO_05);
    }

    #[test]
    fn test_capacity_exceeded() {
        let options = DataMatrixOptions {
            shape: SymbolShape::Square,
            max_size: Some((10, 10)),
            ..DataMatrixOptions::default()
        };
        assert!(matches!(
            encode_high_level(b"ABCDEFGH", &options, None),
            Err(CodecError::CapacityExceeded { .. })
        ));
        let huge = vec![b'7'; 3200];
        assert!(matches!(
            encode_high_level(&huge, &DataMatrixOptions::default(), None),
            Err(CodecError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_look_ahead_choices() {
        assert_eq!(look_ahead(b"1234", 0, Encodation::Ascii), Encodation::Ascii);
        assert_eq!(
            look_ahead(b"\xAB\xE4\xF6\xFC", 0, Encodation::Ascii),
            Encodation::Base256
        );
        assert_eq!(look_ahead(b"AIMAIMAIM", 0, Encodation::Ascii), Encodation::C40);
        assert_eq!(look_ahead(b"aimaimaim", 0, Encodation::Ascii), Encodation::Text);
        // Leaving X12 when the next triplet is not native
        assert_eq!(look_ahead(b"AB", 0, Encodation::X12), Encodation::X12);
        assert_eq!(look_ahead(b"Ab", 0, Encodation::X12), Encodation::Ascii);
    }

    #[test]
    fn test_x12_never_entered_before_foreign_character() {
        // Terminators make X12 look cheap, but '!' has no X12 value
        let high = encode_high_level(b"!BB>BA>B***\r\rB\r", &DataMatrixOptions::default(), None);
        assert!(high.is_ok());
    }

    #[test]
    fn test_determinism() {
        let message = b"Mixed 123 text / MORE UPPER 4567 \xE9\xE8";
        let first = encode_high_level(message, &DataMatrixOptions::default(), None).unwrap();
        let second = encode_high_level(message, &DataMatrixOptions::default(), None).unwrap();
        assert_eq!(first.codewords, second.codewords);
        assert_eq!(first.segments, second.segments);
    }
}
