use crate::models::{BitMatrix, Version};

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // Finder patterns + separators (8x8 areas at the three corners)
        mask.set_region(0, 0, 8, 8, true);
        mask.set_region(size - 8, 0, 8, 8, true);
        mask.set_region(0, size - 8, 8, 8, true);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_pattern_centers(version) {
            mask.set_region(cx - 2, cy - 2, 5, 5, true);
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Dark module
        mask.set(8, size - 8, true);

        // Version info (v7+): 3x6 top-right, 6x3 bottom-left
        if version.number() >= 7 {
            mask.set_region(size - 11, 0, 3, 6, true);
            mask.set_region(0, size - 11, 6, 3, true);
        }

        Self { mask, version }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    pub fn data_modules_count(&self) -> usize {
        self.size() * self.size() - self.mask.count_dark()
    }
}

/// Alignment pattern center coordinates along one axis.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let ver = version.number() as usize;
    if ver == 1 {
        return Vec::new();
    }
    let num_align = ver / 7 + 2;
    let step = (ver * 8 + num_align * 3 + 5) / (num_align * 4 - 4) * 2;
    let mut positions = vec![6usize; num_align];
    let mut pos = version.size() - 7;
    for slot in positions.iter_mut().skip(1).rev() {
        *slot = pos;
        pos -= step;
    }
    positions
}

/// Every alignment pattern center `(x, y)`, skipping the three that would
/// overlap a finder pattern.
pub fn alignment_pattern_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &cx) in positions.iter().enumerate() {
        for (j, &cy) in positions.iter().enumerate() {
            let finder_corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !finder_corner {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::tables::raw_data_modules;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(v(1)).is_empty());
        assert_eq!(alignment_pattern_positions(v(2)), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(v(7)), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(v(32)), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(
            alignment_pattern_positions(v(40)),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
        assert_eq!(alignment_pattern_centers(v(7)).len(), 6);
    }

    #[test]
    fn test_data_modules_match_capacity() {
        for n in 1..=40 {
            let mask = FunctionMask::new(v(n));
            assert_eq!(mask.data_modules_count(), raw_data_modules(v(n)), "version {}", n);
        }
    }

    #[test]
    fn test_version_blocks_are_function_modules() {
        let mask = FunctionMask::new(v(7));
        let size = mask.size();
        assert!(mask.is_function(5, size - 9));
        assert!(mask.is_function(size - 9, 5));
        assert!(!mask.is_function(6 + 3, size - 9));
        assert!(mask.is_function(8, size - 8));
    }
}
