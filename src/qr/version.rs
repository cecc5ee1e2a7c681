/// Version information for QR codes v7+, BCH(18,6) protected
use tracing::debug;

use super::bch::{VERSION_GENERATOR, bch_code, hamming_distance};
use crate::config;
use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, Version};

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
pub struct VersionInfo;

impl VersionInfo {
    /// 18-bit codeword for a version, `None` below version 7.
    pub fn bits(version: Version) -> Option<u32> {
        let v = version.number() as u32;
        (v >= 7).then(|| (v << 12) | bch_code(v, VERSION_GENERATOR))
    }

    /// Write both 6x3 copies; no-op below version 7.
    pub fn embed(version: Version, matrix: &mut BitMatrix) {
        let Some(bits) = Self::bits(version) else {
            return;
        };
        let size = matrix.width();
        for i in 0..6 {
            for j in 0..3 {
                let bit = (bits >> (i * 3 + j)) & 1 == 1;
                // Bottom-left block is 6 wide and 3 tall, top-right its transpose
                matrix.set(i, size - 11 + j, bit);
                matrix.set(size - 11 + j, i, bit);
            }
        }
    }

    /// Raw bits of the top-right and bottom-left copies, MSB first.
    pub fn read_copies(matrix: &BitMatrix) -> (u32, u32) {
        let size = matrix.width();
        let mut top_right = 0u32;
        for y in (0..6).rev() {
            for x in ((size - 11)..=(size - 9)).rev() {
                top_right = (top_right << 1) | matrix.get(x, y) as u32;
            }
        }
        let mut bottom_left = 0u32;
        for x in (0..6).rev() {
            for y in ((size - 11)..=(size - 9)).rev() {
                bottom_left = (bottom_left << 1) | matrix.get(x, y) as u32;
            }
        }
        (top_right, bottom_left)
    }

    /// Closest version codeword to either copy within the configured distance.
    pub fn decode(copy1: u32, copy2: u32) -> Result<Version> {
        let max_distance = config::format_max_distance();
        let mut best: Option<(Version, u32)> = None;
        for version in Version::MIN.up_to_max() {
            let Some(target) = Self::bits(version) else {
                continue;
            };
            if target == copy1 || target == copy2 {
                return Ok(version);
            }
            let distance = hamming_distance(copy1, target).min(hamming_distance(copy2, target));
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((version, distance));
            }
        }
        match best {
            Some((version, distance)) if distance <= max_distance => {
                debug!(version = version.number(), distance, "version information repaired");
                Ok(version)
            }
            _ => Err(CodecError::format("unreadable version information")),
        }
    }

    /// Extract version from QR code matrix (versions 7+ only)
    pub fn extract(matrix: &BitMatrix) -> Result<Version> {
        if matrix.width() < 45 {
            return Err(CodecError::format("symbol too small to carry version information"));
        }
        let (copy1, copy2) = Self::read_copies(matrix);
        Self::decode(copy1, copy2)
    }
}
