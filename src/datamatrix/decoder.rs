//! Data Matrix decode pipeline over an already sampled module grid.

use tracing::debug;

use super::decoded_bit_stream;
use super::placement::Placement;
use super::symbol;
use super::symbol_info;
use crate::ecc::{GaloisField, ReedSolomonDecoder};
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, DataMatrixCode};

/// Decode a symbol given as a grid of modules, dark = `true`, finder and
/// clock tracks included, no quiet zone.
pub fn decode(matrix: &BitMatrix) -> Result<DataMatrixCode> {
    // Geometry first; nothing is read from a grid of unknown size
    let info = symbol_info::from_dimensions(matrix.width(), matrix.height())?;
    let mapping = symbol::strip(info, matrix)?;

    let placement = Placement::new(info.mapping_width(), info.mapping_height())?;
    let raw = placement.extract(&mapping)?;

    let layout = info.block_layout()?;
    let raw = raw
        .get(..layout.total_codewords())
        .ok_or(CodecError::SizeMismatch {
            expected: layout.total_codewords(),
            actual: raw.len(),
        })?;
    let decoder = ReedSolomonDecoder::new(GaloisField::data_matrix());
    let (codewords, corrected) = layout.decode(raw, &decoder)?;

    let stream = decoded_bit_stream::decode(&codewords)?;
    debug!(
        width = info.symbol_width(),
        height = info.symbol_height(),
        corrected,
        runs = stream.segments.len(),
        "decoded Data Matrix symbol"
    );

    Ok(DataMatrixCode {
        data: stream.data,
        content: stream.content,
        width: info.symbol_width(),
        height: info.symbol_height(),
        modules: matrix.clone(),
        codewords,
        segments: stream.segments,
        corrected_errors: corrected,
    })
}
