use crate::common::{BitBuffer, BitReader};
use crate::error::{CodecError, Result};

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

const GROUP_SEPARATOR: char = '\u{1D}';

/// Index of `ch` in the alphanumeric table.
pub fn alphanumeric_code(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        'A'..='Z' => Some(ch as u32 - 'A' as u32 + 10),
        ' ' => Some(36),
        '$' => Some(37),
        '%' => Some(38),
        '*' => Some(39),
        '+' => Some(40),
        '-' => Some(41),
        '.' => Some(42),
        '/' => Some(43),
        ':' => Some(44),
        _ => None,
    }
}

/// Alphanumeric mode encoder (Mode 0010)
/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericEncoder;

impl AlphanumericEncoder {
    pub fn encode(content: &str, bits: &mut BitBuffer) -> Result<()> {
        let codes: Vec<u32> = content
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                alphanumeric_code(ch).ok_or(CodecError::IllegalCharacter { ch, position })
            })
            .collect::<Result<_>>()?;

        for pair in codes.chunks(2) {
            if let [a, b] = pair {
                bits.append_bits(a * 45 + b, 11)?;
            } else {
                bits.append_bits(pair[0], 6)?;
            }
        }
        Ok(())
    }

    pub fn bit_length(count: usize) -> usize {
        count / 2 * 11 + (count % 2) * 6
    }
}

/// Alphanumeric mode decoder (Mode 0010)
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `character_count` characters. With FNC1 in effect `%` stands
    /// for the GS separator and `%%` for a literal `%`.
    pub fn decode(
        reader: &mut BitReader<'_>,
        character_count: usize,
        fnc1_in_effect: bool,
    ) -> Result<String> {
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            if chars_remaining >= 2 {
                let value = reader.read_bits(11)?;
                result.push(Self::to_char(value / 45)?);
                result.push(Self::to_char(value % 45)?);
                chars_remaining -= 2;
            } else {
                let value = reader.read_bits(6)?;
                result.push(Self::to_char(value)?);
                chars_remaining -= 1;
            }
        }

        if fnc1_in_effect {
            let mut out = String::with_capacity(result.len());
            let mut chars = result.chars().peekable();
            while let Some(ch) = chars.next() {
                if ch == '%' {
                    if chars.peek() == Some(&'%') {
                        chars.next();
                        out.push('%');
                    } else {
                        out.push(GROUP_SEPARATOR);
                    }
                } else {
                    out.push(ch);
                }
            }
            result = out;
        }

        Ok(result)
    }

    fn to_char(value: u32) -> Result<char> {
        ALPHANUMERIC_TABLE
            .get(value as usize)
            .copied()
            .ok_or_else(|| CodecError::format(format!("alphanumeric value {} out of range", value)))
    }
}
