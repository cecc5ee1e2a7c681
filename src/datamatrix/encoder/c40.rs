//! C40 and TEXT: three values per codeword pair, shift sets for the rest.

use super::{Encodation, EncoderContext, UNLATCH, look_ahead};
use crate::error::Result;

/// Values for one character in C40. Returns how many were appended.
fn encode_char_c40(c: u8, out: &mut Vec<u8>) -> usize {
    match c {
        b' ' => out.push(3),
        b'0'..=b'9' => out.push(c - b'0' + 4),
        b'A'..=b'Z' => out.push(c - b'A' + 14),
        0..=0x1F => out.extend_from_slice(&[0, c]),
        b'!'..=b'/' => out.extend_from_slice(&[1, c - b'!']),
        b':'..=b'@' => out.extend_from_slice(&[1, c - b':' + 15]),
        b'['..=b'_' => out.extend_from_slice(&[1, c - b'[' + 22]),
        b'`'..=0x7F => out.extend_from_slice(&[2, c - b'`']),
        _ => {
            // Shift 2 + upper shift, then the low half
            out.extend_from_slice(&[1, 30]);
            return 2 + encode_char_c40(c - 128, out);
        }
    }
    match c {
        b' ' | b'0'..=b'9' | b'A'..=b'Z' => 1,
        _ => 2,
    }
}

/// TEXT swaps the case sets of C40.
fn encode_char_text(c: u8, out: &mut Vec<u8>) -> usize {
    match c {
        b' ' => out.push(3),
        b'0'..=b'9' => out.push(c - b'0' + 4),
        b'a'..=b'z' => out.push(c - b'a' + 14),
        0..=0x1F => out.extend_from_slice(&[0, c]),
        b'!'..=b'/' => out.extend_from_slice(&[1, c - b'!']),
        b':'..=b'@' => out.extend_from_slice(&[1, c - b':' + 15]),
        b'['..=b'_' => out.extend_from_slice(&[1, c - b'[' + 22]),
        b'`' => out.extend_from_slice(&[2, 0]),
        b'A'..=b'Z' => out.extend_from_slice(&[2, c - b'A' + 1]),
        b'{'..=0x7F => out.extend_from_slice(&[2, c - b'{' + 27]),
        _ => {
            out.extend_from_slice(&[1, 30]);
            return 2 + encode_char_text(c - 128, out);
        }
    }
    match c {
        b' ' | b'0'..=b'9' | b'a'..=b'z' => 1,
        _ => 2,
    }
}

pub(super) fn encode_char(mode: Encodation, c: u8, out: &mut Vec<u8>) -> usize {
    match mode {
        Encodation::Text => encode_char_text(c, out),
        _ => encode_char_c40(c, out),
    }
}

/// Pack three values into two codewords.
pub(super) fn triplet_codewords(values: &[u8]) -> [u8; 2] {
    let v = 1600 * values[0] as u16 + 40 * values[1] as u16 + values[2] as u16 + 1;
    [(v >> 8) as u8, (v & 0xFF) as u8]
}

fn write_triplets(ctx: &mut EncoderContext<'_>, buffer: &mut Vec<u8>) {
    for triplet in buffer.chunks_exact(3) {
        ctx.write_codewords(&triplet_codewords(triplet));
    }
    let written = buffer.len() - buffer.len() % 3;
    buffer.drain(..written);
}

pub(super) fn encode(ctx: &mut EncoderContext<'_>, mode: Encodation) -> Result<()> {
    let mut buffer: Vec<u8> = Vec::new();
    // Value count of every character in the buffer, for backtracking
    let mut sizes: Vec<usize> = Vec::new();

    while ctx.has_more_characters() {
        let c = ctx.current_char();
        ctx.pos += 1;
        sizes.push(encode_char(mode, c, &mut buffer));

        let written = ctx.codeword_count() + (buffer.len() / 3) * 2;
        let available = ctx.available_after(written)?;

        if !ctx.has_more_characters() {
            // Avoid a lone value in the last triplet
            if buffer.len() % 3 == 2 && available != 2 {
                backtrack_one_character(ctx, &mut buffer, &mut sizes);
            }
            while buffer.len() % 3 == 1 && (sizes.last() != Some(&1) || available != 1) {
                backtrack_one_character(ctx, &mut buffer, &mut sizes);
            }
            break;
        }

        if buffer.len() % 3 == 0 {
            let next = look_ahead(ctx.message(), ctx.pos, mode);
            if next != mode {
                // ASCII performs the latch to the next encodation
                ctx.signal_encoder_change(Encodation::Ascii);
                break;
            }
        }
    }
    handle_end_of_data(ctx, &mut buffer)
}

fn backtrack_one_character(
    ctx: &mut EncoderContext<'_>,
    buffer: &mut Vec<u8>,
    sizes: &mut Vec<usize>,
) {
    if let Some(size) = sizes.pop() {
        buffer.truncate(buffer.len().saturating_sub(size));
        ctx.pos -= 1;
        // The symbol may shrink again
        ctx.reset_symbol_info();
    }
}

fn handle_end_of_data(ctx: &mut EncoderContext<'_>, buffer: &mut Vec<u8>) -> Result<()> {
    let rest = buffer.len() % 3;
    let written = ctx.codeword_count() + (buffer.len() / 3) * 2;
    let available = ctx.available_after(written)?;

    match rest {
        2 => {
            // Pad the last triplet with Shift 1
            buffer.push(0);
            write_triplets(ctx, buffer);
            if ctx.has_more_characters() {
                ctx.write_codeword(UNLATCH);
            }
        }
        1 => {
            write_triplets(ctx, buffer);
            // A single last codeword is read as ASCII without unlatching
            if ctx.has_more_characters() || available != 1 {
                ctx.write_codeword(UNLATCH);
            }
            ctx.pos -= 1;
        }
        _ => {
            write_triplets(ctx, buffer);
            if available > 0 || ctx.has_more_characters() {
                ctx.write_codeword(UNLATCH);
            }
        }
    }
    ctx.signal_encoder_change(Encodation::Ascii);
    Ok(())
}
