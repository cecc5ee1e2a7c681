/// Codeword placement and extraction along the two-column zigzag
use super::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Data module coordinates `(x, y)` in bit order: two-column strips from
/// the right edge, alternating upward and downward, skipping the vertical
/// timing column and every function module.
pub fn data_module_order(func: &FunctionMask) -> Vec<(usize, usize)> {
    let dimension = func.size();
    let mut order = Vec::with_capacity(func.data_modules_count());

    let mut upward = true;
    let mut col = dimension as i32 - 1;

    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }

        let mut push_cell = |row: usize, c: usize| {
            if !func.is_function(c, row) {
                order.push((c, row));
            }
        };

        let right = col as usize;
        if upward {
            for row in (0..dimension).rev() {
                push_cell(row, right);
                push_cell(row, right - 1);
            }
        } else {
            for row in 0..dimension {
                push_cell(row, right);
                push_cell(row, right - 1);
            }
        }

        upward = !upward;
        col -= 2;
    }

    order
}

/// Write codewords MSB first into the data modules. Modules past the last
/// codeword bit are remainder bits and stay light.
pub fn place_codewords(matrix: &mut BitMatrix, func: &FunctionMask, codewords: &[u8]) {
    for (i, (x, y)) in data_module_order(func).into_iter().enumerate() {
        let byte = i / 8;
        let bit = codewords
            .get(byte)
            .is_some_and(|&cw| (cw >> (7 - i % 8)) & 1 == 1);
        matrix.set(x, y, bit);
    }
}

/// Read whole codewords back from the (unmasked) data modules; trailing
/// remainder bits are dropped.
pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
    let order = data_module_order(func);
    order
        .chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &(x, y)| (acc << 1) | matrix.get(x, y) as u8)
        })
        .collect()
}
