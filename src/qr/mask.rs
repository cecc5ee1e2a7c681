/// Mask application and the four penalty rules used to pick a mask
use super::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// XOR the mask pattern into every data module. Applying twice is a no-op,
/// so the same call masks on encode and unmasks on decode.
pub fn apply_mask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let width = matrix.width();
    let height = matrix.height();

    for y in 0..height {
        for x in 0..width {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

/// Total penalty of a finished symbol.
pub fn penalty_score(matrix: &BitMatrix) -> u32 {
    penalty_rule1(matrix) + penalty_rule2(matrix) + penalty_rule3(matrix) + penalty_rule4(matrix)
}

/// Runs of five or more same-colored modules in a row or column.
pub fn penalty_rule1(matrix: &BitMatrix) -> u32 {
    rule1_direction(matrix, true) + rule1_direction(matrix, false)
}

fn rule1_direction(matrix: &BitMatrix, horizontal: bool) -> u32 {
    let (outer, inner) = if horizontal {
        (matrix.height(), matrix.width())
    } else {
        (matrix.width(), matrix.height())
    };
    let get = |i: usize, j: usize| {
        if horizontal {
            matrix.get(j, i)
        } else {
            matrix.get(i, j)
        }
    };

    let mut penalty = 0;
    for i in 0..outer {
        let mut run = 0u32;
        let mut prev: Option<bool> = None;
        for j in 0..inner {
            let bit = get(i, j);
            if prev == Some(bit) {
                run += 1;
            } else {
                if run >= 5 {
                    penalty += N1 + (run - 5);
                }
                run = 1;
                prev = Some(bit);
            }
        }
        if run >= 5 {
            penalty += N1 + (run - 5);
        }
    }
    penalty
}

/// Every 2x2 block of one color.
pub fn penalty_rule2(matrix: &BitMatrix) -> u32 {
    let mut penalty = 0;
    for y in 0..matrix.height().saturating_sub(1) {
        for x in 0..matrix.width().saturating_sub(1) {
            let value = matrix.get(x, y);
            if value == matrix.get(x + 1, y)
                && value == matrix.get(x, y + 1)
                && value == matrix.get(x + 1, y + 1)
            {
                penalty += N2;
            }
        }
    }
    penalty
}

const FINDER_LIKE: [bool; 7] = [true, false, true, true, true, false, true];

/// 1:1:3:1:1 finder-like runs with four light modules on either side.
/// Modules beyond the edge count as light.
pub fn penalty_rule3(matrix: &BitMatrix) -> u32 {
    let width = matrix.width();
    let height = matrix.height();
    let mut hits = 0;
    for y in 0..height {
        for x in 0..width {
            if x + 7 <= width
                && (0..7).all(|k| matrix.get(x + k, y) == FINDER_LIKE[k])
                && (is_light_row(matrix, y, x as isize - 4, x as isize)
                    || is_light_row(matrix, y, x as isize + 7, x as isize + 11))
            {
                hits += 1;
            }
            if y + 7 <= height
                && (0..7).all(|k| matrix.get(x, y + k) == FINDER_LIKE[k])
                && (is_light_column(matrix, x, y as isize - 4, y as isize)
                    || is_light_column(matrix, x, y as isize + 7, y as isize + 11))
            {
                hits += 1;
            }
        }
    }
    hits * N3
}

fn is_light_row(matrix: &BitMatrix, y: usize, from: isize, to: isize) -> bool {
    let from = from.max(0) as usize;
    let to = (to.max(0) as usize).min(matrix.width());
    (from..to).all(|x| !matrix.get(x, y))
}

fn is_light_column(matrix: &BitMatrix, x: usize, from: isize, to: isize) -> bool {
    let from = from.max(0) as usize;
    let to = (to.max(0) as usize).min(matrix.height());
    (from..to).all(|y| !matrix.get(x, y))
}

/// Ten points per full 5% the dark ratio strays from one half.
pub fn penalty_rule4(matrix: &BitMatrix) -> u32 {
    let total = matrix.width() * matrix.height();
    if total == 0 {
        return 0;
    }
    let dark = matrix.count_dark();
    let deviation = (dark * 2).abs_diff(total) * 10 / total;
    deviation as u32 * N4
}
