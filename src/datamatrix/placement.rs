//! ECC 200 codeword placement in the mapping matrix (finder and clock
//! tracks removed). The same traversal drives placement and extraction.

use crate::error::{CodecError, Result};
use crate::models::BitMatrix;

/// `(x, y)` of the eight modules of one codeword, most significant bit first.
pub type CodewordModules = [(usize, usize); 8];

/// Module positions of every codeword of a mapping matrix.
#[derive(Debug, Clone)]
pub struct Placement {
    width: usize,
    height: usize,
    codewords: Vec<CodewordModules>,
    /// The sweep left the bottom right 2x2 untouched
    fixed_corner: bool,
}

struct Sweep {
    rows: isize,
    cols: isize,
    visited: Vec<bool>,
    codewords: Vec<CodewordModules>,
}

impl Sweep {
    fn visited(&self, row: isize, col: isize) -> bool {
        self.visited[(row * self.cols + col) as usize]
    }

    fn module(&mut self, mut row: isize, mut col: isize) -> (usize, usize) {
        if row < 0 {
            row += self.rows;
            col += 4 - ((self.rows + 4) % 8);
        }
        if col < 0 {
            col += self.cols;
            row += 4 - ((self.cols + 4) % 8);
        }
        let x = col.rem_euclid(self.cols);
        let y = row.rem_euclid(self.rows);
        self.visited[(y * self.cols + x) as usize] = true;
        (x as usize, y as usize)
    }

    fn codeword(&mut self, cells: [(isize, isize); 8]) {
        let modules = cells.map(|(row, col)| self.module(row, col));
        self.codewords.push(modules);
    }

    fn utah(&mut self, row: isize, col: isize) {
        self.codeword([
            (row - 2, col - 2),
            (row - 2, col - 1),
            (row - 1, col - 2),
            (row - 1, col - 1),
            (row - 1, col),
            (row, col - 2),
            (row, col - 1),
            (row, col),
        ]);
    }

    fn corner1(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.codeword([
            (r - 1, 0),
            (r - 1, 1),
            (r - 1, 2),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
            (2, c - 1),
            (3, c - 1),
        ]);
    }

    fn corner2(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.codeword([
            (r - 3, 0),
            (r - 2, 0),
            (r - 1, 0),
            (0, c - 4),
            (0, c - 3),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
        ]);
    }

    fn corner3(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.codeword([
            (r - 3, 0),
            (r - 2, 0),
            (r - 1, 0),
            (0, c - 2),
            (0, c - 1),
            (1, c - 1),
            (2, c - 1),
            (3, c - 1),
        ]);
    }

    fn corner4(&mut self) {
        let (r, c) = (self.rows, self.cols);
        self.codeword([
            (r - 1, 0),
            (r - 1, c - 1),
            (0, c - 3),
            (0, c - 2),
            (0, c - 1),
            (1, c - 3),
            (1, c - 2),
            (1, c - 1),
        ]);
    }

    fn run(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        let mut row: isize = 4;
        let mut col: isize = 0;
        loop {
            if row == rows && col == 0 {
                self.corner1();
            }
            if row == rows - 2 && col == 0 && cols % 4 != 0 {
                self.corner2();
            }
            if row == rows - 2 && col == 0 && cols % 8 == 4 {
                self.corner3();
            }
            if row == rows + 4 && col == 2 && cols % 8 == 0 {
                self.corner4();
            }

            // Up and to the right
            loop {
                if row < rows && col >= 0 && !self.visited(row, col) {
                    self.utah(row, col);
                }
                row -= 2;
                col += 2;
                if !(row >= 0 && col < cols) {
                    break;
                }
            }
            row += 1;
            col += 3;

            // Down and to the left
            loop {
                if row >= 0 && col < cols && !self.visited(row, col) {
                    self.utah(row, col);
                }
                row += 2;
                col -= 2;
                if !(row < rows && col >= 0) {
                    break;
                }
            }
            row += 3;
            col += 1;

            if !(row < rows || col < cols) {
                break;
            }
        }
    }
}

impl Placement {
    /// Traverse a mapping matrix of `width` x `height` modules.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width < 6 || height < 6 || width % 2 != 0 || height % 2 != 0 {
            return Err(CodecError::format(format!(
                "{}x{} is not a Data Matrix mapping size",
                width, height
            )));
        }
        let mut sweep = Sweep {
            rows: height as isize,
            cols: width as isize,
            visited: vec![false; width * height],
            codewords: Vec::with_capacity(width * height / 8),
        };
        sweep.run();
        let fixed_corner = !sweep.visited(sweep.rows - 1, sweep.cols - 1);
        Ok(Self {
            width,
            height,
            codewords: sweep.codewords,
            fixed_corner,
        })
    }

    pub fn codeword_count(&self) -> usize {
        self.codewords.len()
    }

    pub fn modules(&self) -> &[CodewordModules] {
        &self.codewords
    }

    /// Mapping matrix holding `codewords`.
    pub fn place(&self, codewords: &[u8]) -> Result<BitMatrix> {
        if codewords.len() != self.codewords.len() {
            return Err(CodecError::SizeMismatch {
                expected: self.codewords.len(),
                actual: codewords.len(),
            });
        }
        let mut matrix = BitMatrix::new(self.width, self.height);
        for (&codeword, modules) in codewords.iter().zip(&self.codewords) {
            for (bit, &(x, y)) in modules.iter().enumerate() {
                if codeword & (0x80 >> bit) != 0 {
                    matrix.set(x, y, true);
                }
            }
        }
        if self.fixed_corner {
            matrix.set(self.width - 1, self.height - 1, true);
            matrix.set(self.width - 2, self.height - 2, true);
        }
        Ok(matrix)
    }

    /// Read every codeword back out of a mapping matrix.
    pub fn extract(&self, mapping: &BitMatrix) -> Result<Vec<u8>> {
        if mapping.width() != self.width || mapping.height() != self.height {
            return Err(CodecError::SizeMismatch {
                expected: self.width * self.height,
                actual: mapping.width() * mapping.height(),
            });
        }
        Ok(self
            .codewords
            .iter()
            .map(|modules| {
                modules
                    .iter()
                    .fold(0u8, |acc, &(x, y)| (acc << 1) | u8::from(mapping.get(x, y)))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamatrix::symbol_info::SYMBOLS;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_traversal_covers_every_codeword() {
        for s in &SYMBOLS {
            let placement = Placement::new(s.mapping_width(), s.mapping_height()).unwrap();
            assert_eq!(placement.codeword_count(), s.total_codewords(), "{:?}", s);

            let mut seen = vec![false; s.mapping_width() * s.mapping_height()];
            for &(x, y) in placement.modules().iter().flatten() {
                let index = y * s.mapping_width() + x;
                assert!(!seen[index], "module ({}, {}) used twice", x, y);
                seen[index] = true;
            }
        }
    }

    #[test]
    fn test_place_then_extract() {
        let mut rng = StdRng::seed_from_u64(7);
        for s in &SYMBOLS {
            let placement = Placement::new(s.mapping_width(), s.mapping_height()).unwrap();
            let codewords: Vec<u8> = (0..s.total_codewords()).map(|_| rng.random()).collect();
            let matrix = placement.place(&codewords).unwrap();
            assert_eq!(placement.extract(&matrix).unwrap(), codewords);
        }
    }

    #[test]
    fn test_first_codeword_and_fixed_corner() {
        // 10x10 symbol: 8x8 mapping, codeword 1 is a utah shape anchored at row 4, column 0
        let placement = Placement::new(8, 8).unwrap();
        assert_eq!(placement.modules()[0][7], (0, 4));
        assert_eq!(placement.modules()[0][0], (6, 2));
        assert_eq!(placement.place(&[0; 8]).unwrap().count_dark(), 0);

        // 12x12 symbol: 100 mapping modules hold 12 codewords, the rest is fixed
        let placement = Placement::new(10, 10).unwrap();
        let matrix = placement.place(&[0; 12]).unwrap();
        assert!(matrix.get(9, 9));
        assert!(matrix.get(8, 8));
        assert!(!matrix.get(8, 9));
        assert_eq!(matrix.count_dark(), 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Placement::new(7, 8).is_err());
        let placement = Placement::new(8, 8).unwrap();
        assert!(matches!(
            placement.place(&[0; 7]),
            Err(CodecError::SizeMismatch { expected: 8, actual: 7 })
        ));
    }
}
