use super::{Encodation, EncoderContext, look_ahead};
use crate::error::{CodecError, Result};

/// Scramble a Base 256 codeword by its 1-based stream position.
pub(crate) fn randomize_255_state(value: u8, position: usize) -> u8 {
    let pseudo_random = (149 * position) % 255 + 1;
    ((value as usize + pseudo_random) % 256) as u8
}

pub(super) fn encode(ctx: &mut EncoderContext<'_>) -> Result<()> {
    let mut data: Vec<u8> = Vec::new();
    while ctx.has_more_characters() {
        data.push(ctx.current_char());
        ctx.pos += 1;

        let next = look_ahead(ctx.message(), ctx.pos, Encodation::Base256);
        if next != Encodation::Base256 {
            ctx.signal_encoder_change(Encodation::Ascii);
            break;
        }
    }

    let count = data.len();
    let current_size = ctx.codeword_count() + count + 1;
    let must_pad = ctx.available_after(current_size)? > 0;

    // A zero length field runs to the end of the symbol
    let mut field: Vec<u8> = Vec::with_capacity(count + 2);
    if ctx.has_more_characters() || must_pad {
        match count {
            0..=249 => field.push(count as u8),
            250..=1555 => {
                field.push((count / 250 + 249) as u8);
                field.push((count % 250) as u8);
            }
            _ => {
                return Err(CodecError::CapacityExceeded {
                    needed: current_size,
                    available: 1558,
                });
            }
        }
    } else {
        field.push(0);
    }
    field.extend_from_slice(&data);

    for value in field {
        let position = ctx.codeword_count() + 1;
        ctx.write_codeword(randomize_255_state(value, position));
    }
    Ok(())
}
