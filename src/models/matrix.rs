use std::fmt;

use crate::error::{CodecError, Result};

/// Compact bit matrix of symbol modules (true = dark, false = light).
///
/// Coordinates are always `(x, y)` = (column, row); storage is row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create a square matrix
    pub fn square(dimension: usize) -> Self {
        Self::new(dimension, dimension)
    }

    /// Build a matrix from row-major module values.
    pub fn from_bits(bits: &[bool], width: usize) -> Result<Self> {
        if width == 0 || bits.len() % width != 0 {
            return Err(CodecError::InvalidArgument(format!(
                "{} modules do not fill rows of width {}",
                bits.len(),
                width
            )));
        }
        let height = bits.len() / width;
        let mut matrix = Self::new(width, height);
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                matrix.set(i % width, i / width, true);
            }
        }
        Ok(matrix)
    }

    /// Parse a textual picture of the matrix, one line per row.
    ///
    /// `dark` marks a dark module; every other non-whitespace character is light.
    /// Whitespace inside a line is ignored so rows may be spaced for readability.
    pub fn parse(picture: &str, dark: char) -> Result<Self> {
        let rows: Vec<Vec<bool>> = picture
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| c == dark)
                    .collect::<Vec<bool>>()
            })
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(CodecError::SizeMismatch {
                expected: width,
                actual: bad.len(),
            });
        }
        if width == 0 {
            return Ok(Self::new(0, 0));
        }
        let bits: Vec<bool> = rows.into_iter().flatten().collect();
        Self::from_bits(&bits, width)
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let bit = 1 << (index % 8);
        if value {
            self.data[index / 8] |= bit;
        } else {
            self.data[index / 8] &= !bit;
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Set every module of a rectangle to `value`.
    pub fn set_region(&mut self, left: usize, top: usize, width: usize, height: usize, value: bool) {
        for y in top..(top + height).min(self.height) {
            for x in left..(left + width).min(self.width) {
                self.set(x, y, value);
            }
        }
    }

    /// Copy of row `y`.
    pub fn row(&self, y: usize) -> Vec<bool> {
        (0..self.width).map(|x| self.get(x, y)).collect()
    }

    /// Copy of column `x`.
    pub fn column(&self, x: usize) -> Vec<bool> {
        (0..self.height).map(|y| self.get(x, y)).collect()
    }

    /// Number of dark modules.
    pub fn count_dark(&self) -> usize {
        let full = (self.width * self.height) / 8;
        let mut count: usize = self.data[..full].iter().map(|b| b.count_ones() as usize).sum();
        for index in full * 8..self.width * self.height {
            count += ((self.data[index / 8] >> (index % 8)) & 1) as usize;
        }
        count
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Get raw data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Row-major copy of all modules.
    pub fn to_bits(&self) -> Vec<bool> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.get(x, y))
            .collect()
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "X " } else { "  " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
