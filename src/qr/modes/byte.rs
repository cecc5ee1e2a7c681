use crate::common::{BitBuffer, BitReader};
use crate::error::Result;

/// Byte mode encoder (Mode 0100), 8 bits per byte
pub struct ByteEncoder;

impl ByteEncoder {
    pub fn encode(content: &[u8], bits: &mut BitBuffer) -> Result<()> {
        for &byte in content {
            bits.append_bits(byte as u32, 8)?;
        }
        Ok(())
    }
}

/// Byte mode decoder (Mode 0100)
///
/// Returns raw bytes; the charset in effect decides how they become text.
pub struct ByteDecoder;

impl ByteDecoder {
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(character_count);
        for _ in 0..character_count {
            bytes.push(reader.read_bits(8)? as u8);
        }
        Ok(bytes)
    }
}
