use super::c40::triplet_codewords;
use super::{Encodation, EncoderContext, UNLATCH, look_ahead};
use crate::error::{CodecError, Result};

fn x12_value(c: u8, position: usize) -> Result<u8> {
    match c {
        b'\r' => Ok(0),
        b'*' => Ok(1),
        b'>' => Ok(2),
        b' ' => Ok(3),
        b'0'..=b'9' => Ok(c - b'0' + 4),
        b'A'..=b'Z' => Ok(c - b'A' + 14),
        _ => Err(CodecError::IllegalCharacter {
            ch: char::from(c),
            position,
        }),
    }
}

pub(super) fn encode(ctx: &mut EncoderContext<'_>) -> Result<()> {
    let mut buffer: Vec<u8> = Vec::with_capacity(3);
    while ctx.has_more_characters() {
        let c = ctx.current_char();
        buffer.push(x12_value(c, ctx.pos)?);
        ctx.pos += 1;

        if buffer.len() == 3 {
            ctx.write_codewords(&triplet_codewords(&buffer));
            buffer.clear();

            let next = look_ahead(ctx.message(), ctx.pos, Encodation::X12);
            if next != Encodation::X12 {
                ctx.signal_encoder_change(Encodation::Ascii);
                break;
            }
        }
    }
    handle_end_of_data(ctx, buffer.len())
}

/// Incomplete triplets go back to ASCII.
fn handle_end_of_data(ctx: &mut EncoderContext<'_>, unwritten: usize) -> Result<()> {
    let available = ctx.available_after(ctx.codeword_count())?;
    ctx.pos -= unwritten;
    let remaining = ctx.remaining_characters();
    if remaining > 1 || available > 1 || remaining != available {
        ctx.write_codeword(UNLATCH);
    }
    if ctx.new_encoding().is_none() {
        ctx.signal_encoder_change(Encodation::Ascii);
    }
    Ok(())
}
