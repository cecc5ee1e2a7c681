use crate::common::{BitBuffer, BitReader};
use crate::error::{CodecError, Result};

/// Numeric mode encoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericEncoder;

impl NumericEncoder {
    pub fn encode(content: &str, bits: &mut BitBuffer) -> Result<()> {
        let digits: Vec<u32> = content
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                ch.to_digit(10)
                    .ok_or(CodecError::IllegalCharacter { ch, position })
            })
            .collect::<Result<_>>()?;

        for group in digits.chunks(3) {
            let value = group.iter().fold(0, |acc, &d| acc * 10 + d);
            let width = match group.len() {
                3 => 10,
                2 => 7,
                _ => 4,
            };
            bits.append_bits(value, width)?;
        }
        Ok(())
    }

    /// Bits needed for `count` digits.
    pub fn bit_length(count: usize) -> usize {
        count / 3 * 10
            + match count % 3 {
                2 => 7,
                1 => 4,
                _ => 0,
            }
    }
}

/// Numeric mode decoder (Mode 0001)
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits from the reader
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<String> {
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let (bits_needed, limit) = match group_size {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };

            let value = reader.read_bits(bits_needed)?;
            if value >= limit {
                return Err(CodecError::format(format!(
                    "numeric group {} out of range for {} digits",
                    value, group_size
                )));
            }

            let digits = match group_size {
                3 => format!("{:03}", value),
                2 => format!("{:02}", value),
                _ => format!("{}", value),
            };

            result.push_str(&digits);
            chars_remaining -= group_size;
        }

        Ok(result)
    }
}
