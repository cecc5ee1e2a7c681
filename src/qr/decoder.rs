//! QR decode pipeline over an already sampled module grid.

use tracing::{debug, warn};

use super::bitstream::extract_codewords;
use super::format::FormatInfo;
use super::function_mask::FunctionMask;
use super::mask::apply_mask;
use super::payload::decode_payload;
use super::tables::block_layout;
use super::version::VersionInfo;
use crate::ecc::{GaloisField, ReedSolomonDecoder};
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, QRCode, Version};

/// Decode a symbol given as a square grid of modules, dark = `true`, with
/// no quiet zone. A grid that fails as read is retried mirrored.
pub fn decode(matrix: &BitMatrix) -> Result<QRCode> {
    match decode_oriented(matrix) {
        Ok(code) => Ok(code),
        Err(err @ CodecError::Format(_)) | Err(err @ CodecError::TooManyErrors) => {
            debug!(error = %err, "retrying QR decode with mirrored grid");
            decode_oriented(&mirror(matrix)).map_err(|_| err)
        }
        Err(err) => Err(err),
    }
}

fn decode_oriented(matrix: &BitMatrix) -> Result<QRCode> {
    if matrix.width() != matrix.height() {
        return Err(CodecError::format(format!(
            "QR grid is {}x{}, not square",
            matrix.width(),
            matrix.height()
        )));
    }
    let dimension_version = Version::from_dimension(matrix.width())?;

    let format = FormatInfo::extract(matrix)?;
    let version = read_version(matrix, dimension_version);

    let func = FunctionMask::new(version);
    let mut unmasked = matrix.clone();
    apply_mask(&mut unmasked, format.mask_pattern, &func);
    let raw = extract_codewords(&unmasked, &func);

    let layout = block_layout(version, format.ec_level)?;
    let decoder = ReedSolomonDecoder::new(GaloisField::qr_code());
    let raw = raw
        .get(..layout.total_codewords())
        .ok_or(CodecError::SizeMismatch {
            expected: layout.total_codewords(),
            actual: raw.len(),
        })?;
    let (data, corrected) = layout.decode(raw, &decoder)?;

    let payload = decode_payload(&data, version)?;
    debug!(
        version = version.number(),
        ec_level = ?format.ec_level,
        mask = format.mask_pattern.bits(),
        corrected,
        "decoded QR symbol"
    );

    let mut code = QRCode::new(
        payload.data,
        payload.content,
        version,
        format.ec_level,
        format.mask_pattern,
        matrix.clone(),
    );
    code.segments = payload.segments;
    code.structured_append = payload.structured_append;
    code.corrected_errors = corrected;
    Ok(code)
}

/// Version 7 and up also carry version information. The grid dimension
/// wins when the two disagree or the blocks are unreadable.
fn read_version(matrix: &BitMatrix, from_dimension: Version) -> Version {
    if from_dimension.number() < 7 {
        return from_dimension;
    }
    match VersionInfo::extract(matrix) {
        Ok(read) if read == from_dimension => read,
        Ok(read) => {
            warn!(
                read = read.number(),
                dimension = from_dimension.number(),
                "version information disagrees with grid size"
            );
            from_dimension
        }
        Err(err) => {
            debug!(error = %err, "version information unreadable");
            from_dimension
        }
    }
}

/// Swap rows and columns.
fn mirror(matrix: &BitMatrix) -> BitMatrix {
    let mut out = BitMatrix::new(matrix.height(), matrix.width());
    for y in 0..matrix.height() {
        for x in 0..matrix.width() {
            if matrix.get(x, y) {
                out.set(y, x, true);
            }
        }
    }
    out
}
