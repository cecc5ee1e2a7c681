use crate::common::{BitBuffer, BitReader};
use crate::error::{CodecError, Result};

/// Kanji mode encoder (Mode 1000)
///
/// Input is Shift_JIS: pairs in 0x8140-0x9FFC or 0xE040-0xEBBF.
pub struct KanjiEncoder;

impl KanjiEncoder {
    /// 13-bit value of one Shift_JIS pair, or `None` outside the kanji ranges.
    pub fn compact(high: u8, low: u8) -> Option<u32> {
        let code = ((high as u32) << 8) | low as u32;
        let subtracted = match code {
            0x8140..=0x9FFC => code - 0x8140,
            0xE040..=0xEBBF => code - 0xC140,
            _ => return None,
        };
        Some((subtracted >> 8) * 0xC0 + (subtracted & 0xFF))
    }

    /// True if `bytes` is a whole number of Shift_JIS kanji pairs.
    pub fn is_kanji(bytes: &[u8]) -> bool {
        !bytes.is_empty()
            && bytes.len() % 2 == 0
            && bytes
                .chunks_exact(2)
                .all(|pair| Self::compact(pair[0], pair[1]).is_some())
    }

    pub fn encode(sjis: &[u8], bits: &mut BitBuffer) -> Result<()> {
        if sjis.len() % 2 != 0 {
            return Err(CodecError::InvalidArgument(
                "kanji segment has an odd number of bytes".into(),
            ));
        }
        for (i, pair) in sjis.chunks_exact(2).enumerate() {
            let value = Self::compact(pair[0], pair[1]).ok_or(CodecError::IllegalCharacter {
                ch: char::from(pair[0]),
                position: i * 2,
            })?;
            bits.append_bits(value, 13)?;
        }
        Ok(())
    }
}

/// Kanji mode decoder (Mode 1000)
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `character_count` kanji back to Shift_JIS bytes.
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<Vec<u8>> {
        let mut sjis_bytes = Vec::with_capacity(character_count * 2);
        for _ in 0..character_count {
            let val = reader.read_bits(13)?;
            let mut assembled = ((val / 0xC0) << 8) | (val % 0xC0);
            if assembled < 0x1F00 {
                assembled += 0x8140;
            } else {
                assembled += 0xC140;
            }
            sjis_bytes.push((assembled >> 8) as u8);
            sjis_bytes.push((assembled & 0xFF) as u8);
        }
        Ok(sjis_bytes)
    }
}
