use super::{EDIFACT_UNLATCH, Encodation, EncoderContext, look_ahead};
use crate::error::{CodecError, Result};

/// Six-bit EDIFACT value of `c`.
fn edifact_value(c: u8, position: usize) -> Result<u8> {
    match c {
        b' '..=b'?' => Ok(c),
        b'@'..=b'^' => Ok(c - 64),
        _ => Err(CodecError::IllegalCharacter {
            ch: char::from(c),
            position,
        }),
    }
}

/// Pack up to four six-bit values; a group of `n` values needs `min(n, 3)`
/// codewords.
fn group_codewords(values: &[u8]) -> Vec<u8> {
    let value_at = |i: usize| values.get(i).copied().unwrap_or(0) as u32;
    let v = (value_at(0) << 18) | (value_at(1) << 12) | (value_at(2) << 6) | value_at(3);
    let bytes = [(v >> 16) as u8, (v >> 8) as u8, v as u8];
    bytes[..values.len().min(3)].to_vec()
}

pub(super) fn encode(ctx: &mut EncoderContext<'_>) -> Result<()> {
    let mut buffer: Vec<u8> = Vec::with_capacity(4);
    while ctx.has_more_characters() {
        let c = ctx.current_char();
        buffer.push(edifact_value(c, ctx.pos)?);
        ctx.pos += 1;

        if buffer.len() >= 4 {
            ctx.write_codewords(&group_codewords(&buffer));
            buffer.clear();

            let next = look_ahead(ctx.message(), ctx.pos, Encodation::Edifact);
            if next != Encodation::Edifact {
                ctx.signal_encoder_change(Encodation::Ascii);
                break;
            }
        }
    }
    buffer.push(EDIFACT_UNLATCH);
    let result = handle_end_of_data(ctx, &buffer);
    ctx.signal_encoder_change(Encodation::Ascii);
    result
}

fn handle_end_of_data(ctx: &mut EncoderContext<'_>, buffer: &[u8]) -> Result<()> {
    if buffer.len() == 1 {
        // Only the unlatch is pending
        let mut available = ctx.available_after(ctx.codeword_count())?;
        let remaining = ctx.remaining_characters();
        if remaining > available {
            ctx.update_symbol_info(ctx.codeword_count() + 1)?;
            available = ctx.available_after(ctx.codeword_count())?;
        }
        if remaining <= available && available <= 2 {
            return Ok(());
        }
    }

    let rest_chars = buffer.len() - 1;
    let encoded = group_codewords(buffer);
    let mut rest_in_ascii = !ctx.has_more_characters() && rest_chars <= 2;

    if rest_chars <= 2 {
        let available = ctx.available_after(ctx.codeword_count() + rest_chars)?
            + rest_chars;
        if available >= 3 {
            rest_in_ascii = false;
            ctx.update_symbol_info(ctx.codeword_count() + encoded.len())?;
        }
    }

    if rest_in_ascii {
        // Up to two trailing codewords are read as ASCII without unlatch
        ctx.reset_symbol_info();
        ctx.pos -= rest_chars;
    } else {
        ctx.write_codewords(&encoded);
    }
    Ok(())
}
