use super::{
    Encodation, EncoderContext, UPPER_SHIFT, consecutive_digit_count, is_extended_ascii,
    look_ahead,
};
use crate::error::{CodecError, Result};

/// Digit pair as one codeword, 130..=229.
fn encode_digits(first: u8, second: u8) -> Result<u8> {
    if first.is_ascii_digit() && second.is_ascii_digit() {
        Ok((first - b'0') * 10 + (second - b'0') + 130)
    } else {
        let (ch, position) = if first.is_ascii_digit() {
            (second, 1)
        } else {
            (first, 0)
        };
        Err(CodecError::IllegalCharacter {
            ch: char::from(ch),
            position,
        })
    }
}

pub(super) fn encode(ctx: &mut EncoderContext<'_>) -> Result<()> {
    let message = ctx.message();
    if consecutive_digit_count(message, ctx.pos) >= 2 {
        let codeword = encode_digits(message[ctx.pos], message[ctx.pos + 1])?;
        ctx.write_codeword(codeword);
        ctx.pos += 2;
        return Ok(());
    }

    let c = ctx.current_char();
    let next = look_ahead(message, ctx.pos, Encodation::Ascii);
    if let Some(latch) = next.latch() {
        ctx.write_codeword(latch);
        ctx.signal_encoder_change(next);
        return Ok(());
    }

    if is_extended_ascii(c) {
        ctx.write_codeword(UPPER_SHIFT);
        ctx.write_codeword(c - 128 + 1);
    } else {
        ctx.write_codeword(c + 1);
    }
    ctx.pos += 1;
    Ok(())
}
