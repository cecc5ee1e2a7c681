//! Symbol construction: function patterns, codeword placement and mask choice
use rayon::prelude::*;
use tracing::{debug, trace};

use super::bitstream::place_codewords;
use super::format::FormatInfo;
use super::function_mask::{FunctionMask, alignment_pattern_centers};
use super::mask::{apply_mask, penalty_score};
use super::version::VersionInfo;
use crate::config;
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// Draw a 7x7 finder pattern with its top-left corner at `(left, top)`.
fn draw_finder(matrix: &mut BitMatrix, left: usize, top: usize) {
    matrix.set_region(left, top, 7, 7, true);
    matrix.set_region(left + 1, top + 1, 5, 5, false);
    matrix.set_region(left + 2, top + 2, 3, 3, true);
}

fn draw_alignment(matrix: &mut BitMatrix, cx: usize, cy: usize) {
    matrix.set_region(cx - 2, cy - 2, 5, 5, true);
    matrix.set_region(cx - 1, cy - 1, 3, 3, false);
    matrix.set(cx, cy, true);
}

/// Everything except data and format information. Separators are the
/// light modules left around each finder.
pub fn function_patterns(version: Version) -> BitMatrix {
    let size = version.size();
    let mut matrix = BitMatrix::square(size);

    draw_finder(&mut matrix, 0, 0);
    draw_finder(&mut matrix, size - 7, 0);
    draw_finder(&mut matrix, 0, size - 7);

    for i in 8..size - 8 {
        let dark = i % 2 == 0;
        matrix.set(i, 6, dark);
        matrix.set(6, i, dark);
    }

    for (cx, cy) in alignment_pattern_centers(version) {
        draw_alignment(&mut matrix, cx, cy);
    }

    matrix.set(8, size - 8, true);
    VersionInfo::embed(version, &mut matrix);
    matrix
}

/// Finished symbol for one mask.
fn masked_symbol(
    unmasked: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
    mask: MaskPattern,
) -> BitMatrix {
    let mut matrix = unmasked.clone();
    apply_mask(&mut matrix, mask, func);
    FormatInfo::new(ec_level, mask).embed(&mut matrix);
    matrix
}

/// Build the symbol for already interleaved codewords. Without a forced
/// mask every pattern is scored and the lowest penalty wins, ties going
/// to the lowest pattern number.
pub fn build_symbol(
    version: Version,
    ec_level: ECLevel,
    codewords: &[u8],
    forced_mask: Option<MaskPattern>,
) -> (BitMatrix, MaskPattern) {
    let func = FunctionMask::new(version);
    let mut unmasked = function_patterns(version);
    place_codewords(&mut unmasked, &func, codewords);

    if let Some(mask) = forced_mask {
        return (masked_symbol(&unmasked, &func, ec_level, mask), mask);
    }

    let score = |&mask: &MaskPattern| {
        let matrix = masked_symbol(&unmasked, &func, ec_level, mask);
        let penalty = penalty_score(&matrix);
        trace!(mask = mask.bits(), penalty, "mask penalty");
        (penalty, mask, matrix)
    };

    let lower = |a: (u32, MaskPattern, BitMatrix), b: (u32, MaskPattern, BitMatrix)| {
        if (b.0, b.1) < (a.0, a.1) { b } else { a }
    };
    let first = score(&MaskPattern::Pattern0);
    let (penalty, mask, matrix) = if config::parallel_mask_scoring() {
        let scored: Vec<_> = MaskPattern::ALL[1..].par_iter().map(score).collect();
        scored.into_iter().fold(first, lower)
    } else {
        MaskPattern::ALL[1..].iter().map(score).fold(first, lower)
    };

    debug!(mask = mask.bits(), penalty, "selected mask");
    (matrix, mask)
}
