//! Finder and clock tracks around each data region.
//!
//! Every region has a solid left column and bottom row, and alternating
//! top row and right column starting dark at the top left.

use super::symbol_info::SymbolInfo;
use crate::error::{CodecError, Result};
use crate::models::BitMatrix;

/// Lay the mapping matrix out region by region inside its alignment patterns.
pub fn frame(info: &SymbolInfo, mapping: &BitMatrix) -> Result<BitMatrix> {
    if mapping.width() != info.mapping_width() || mapping.height() != info.mapping_height() {
        return Err(CodecError::SizeMismatch {
            expected: info.mapping_width() * info.mapping_height(),
            actual: mapping.width() * mapping.height(),
        });
    }
    let (width, height) = (info.symbol_width(), info.symbol_height());
    let mut symbol = BitMatrix::new(width, height);
    let (rw, rh) = (info.region_width, info.region_height);

    for region_y in 0..info.vertical_regions() {
        let top = region_y * (rh + 2);
        for x in (0..width).step_by(2) {
            symbol.set(x, top, true);
        }
        symbol.set_region(0, top + rh + 1, width, 1, true);

        for region_x in 0..info.horizontal_regions() {
            let left = region_x * (rw + 2);
            symbol.set_region(left, top + 1, 1, rh, true);
            for i in 0..rh {
                // Clock rows count from the first data row of the region
                if i % 2 == 0 {
                    symbol.set(left + rw + 1, top + 1 + i, true);
                }
                for j in 0..rw {
                    if mapping.get(region_x * rw + j, region_y * rh + i) {
                        symbol.set(left + 1 + j, top + 1 + i, true);
                    }
                }
            }
        }
    }
    Ok(symbol)
}

/// Drop the alignment patterns, leaving the mapping matrix.
pub fn strip(info: &SymbolInfo, symbol: &BitMatrix) -> Result<BitMatrix> {
    if symbol.width() != info.symbol_width() || symbol.height() != info.symbol_height() {
        return Err(CodecError::format(format!(
            "{}x{} grid given for a {}x{} symbol",
            symbol.width(),
            symbol.height(),
            info.symbol_width(),
            info.symbol_height()
        )));
    }
    let (rw, rh) = (info.region_width, info.region_height);
    let mut mapping = BitMatrix::new(info.mapping_width(), info.mapping_height());
    for region_y in 0..info.vertical_regions() {
        for region_x in 0..info.horizontal_regions() {
            for i in 0..rh {
                let read_y = region_y * (rh + 2) + 1 + i;
                for j in 0..rw {
                    let read_x = region_x * (rw + 2) + 1 + j;
                    if symbol.get(read_x, read_y) {
                        mapping.set(region_x * rw + j, region_y * rh + i, true);
                    }
                }
            }
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamatrix::symbol_info::{SYMBOLS, from_dimensions};

    #[test]
    fn test_empty_10x10_frame() {
        let info = from_dimensions(10, 10).unwrap();
        let symbol = frame(info, &BitMatrix::new(8, 8)).unwrap();
        let expected = BitMatrix::parse(
            "#.#.#.#.#.
             #........#
             #.........
             #........#
             #.........
             #........#
             #.........
             #........#
             #.........
             ##########",
            '#',
        )
        .unwrap();
        assert_eq!(symbol, expected);
    }

    #[test]
    fn test_four_region_tracks() {
        let info = from_dimensions(32, 32).unwrap();
        let symbol = frame(info, &BitMatrix::new(28, 28)).unwrap();
        // Inner finder column of the right regions and shared clock rows
        assert!(symbol.get(16, 1));
        assert!(symbol.get(15, 1));
        assert!(!symbol.get(15, 2));
        assert!(symbol.row(15).iter().all(|&m| m));
        assert!(symbol.get(0, 16));
        assert!(!symbol.get(1, 16));
    }

    #[test]
    fn test_frame_then_strip() {
        for info in SYMBOLS.iter().filter(|s| s.data_regions > 1).take(4) {
            let mut mapping = BitMatrix::new(info.mapping_width(), info.mapping_height());
            for y in 0..mapping.height() {
                for x in 0..mapping.width() {
                    mapping.set(x, y, (x * 7 + y * 3) % 5 == 0);
                }
            }
            let symbol = frame(info, &mapping).unwrap();
            assert_eq!(strip(info, &symbol).unwrap(), mapping);
        }
    }

    #[test]
    fn test_strip_rejects_wrong_size() {
        let info = from_dimensions(12, 12).unwrap();
        assert!(matches!(
            strip(info, &BitMatrix::square(14)),
            Err(CodecError::Format(_))
        ));
    }
}
