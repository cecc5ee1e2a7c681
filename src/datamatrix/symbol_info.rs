use crate::ecc::{BlockLayout, BlockSpec, Weave};
use crate::error::{CodecError, Result};

/// Shape restriction for the symbol size search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymbolShape {
    /// Square and rectangular sizes in table order
    #[default]
    None,
    Square,
    Rectangle,
}

/// One ECC 200 symbol size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo {
    pub rectangular: bool,
    pub data_capacity: usize,
    pub error_codewords: usize,
    /// Data modules per region, horizontally
    pub region_width: usize,
    /// Data modules per region, vertically
    pub region_height: usize,
    pub data_regions: usize,
    /// Interleaved Reed-Solomon blocks
    pub blocks: usize,
}

const fn info(
    rectangular: bool,
    data_capacity: usize,
    error_codewords: usize,
    region_width: usize,
    region_height: usize,
    data_regions: usize,
    blocks: usize,
) -> SymbolInfo {
    SymbolInfo {
        rectangular,
        data_capacity,
        error_codewords,
        region_width,
        region_height,
        data_regions,
        blocks,
    }
}

/// Production sizes, ordered by data capacity. Rectangles are interleaved
/// with squares so an unrestricted search takes the smallest fit.
pub static SYMBOLS: [SymbolInfo; 30] = [
    info(false, 3, 5, 8, 8, 1, 1),
    info(false, 5, 7, 10, 10, 1, 1),
    info(true, 5, 7, 16, 6, 1, 1),
    info(false, 8, 10, 12, 12, 1, 1),
    info(true, 10, 11, 14, 6, 2, 1),
    info(false, 12, 12, 14, 14, 1, 1),
    info(true, 16, 14, 24, 10, 1, 1),
    info(false, 18, 14, 16, 16, 1, 1),
    info(false, 22, 18, 18, 18, 1, 1),
    info(true, 22, 18, 16, 10, 2, 1),
    info(false, 30, 20, 20, 20, 1, 1),
    info(true, 32, 24, 16, 14, 2, 1),
    info(false, 36, 24, 22, 22, 1, 1),
    info(false, 44, 28, 24, 24, 1, 1),
    info(true, 49, 28, 22, 14, 2, 1),
    info(false, 62, 36, 14, 14, 4, 1),
    info(false, 86, 42, 16, 16, 4, 1),
    info(false, 114, 48, 18, 18, 4, 1),
    info(false, 144, 56, 20, 20, 4, 1),
    info(false, 174, 68, 22, 22, 4, 1),
    info(false, 204, 84, 24, 24, 4, 2),
    info(false, 280, 112, 14, 14, 16, 2),
    info(false, 368, 144, 16, 16, 16, 4),
    info(false, 456, 192, 18, 18, 16, 4),
    info(false, 576, 224, 20, 20, 16, 4),
    info(false, 696, 272, 22, 22, 16, 4),
    info(false, 816, 336, 24, 24, 16, 6),
    info(false, 1050, 408, 18, 18, 36, 6),
    info(false, 1304, 496, 20, 20, 36, 8),
    info(false, 1558, 620, 22, 22, 36, 10),
];

impl SymbolInfo {
    pub fn horizontal_regions(&self) -> usize {
        match self.data_regions {
            1 => 1,
            2 | 4 => 2,
            16 => 4,
            36 => 6,
            _ => 1,
        }
    }

    pub fn vertical_regions(&self) -> usize {
        match self.data_regions {
            1 | 2 => 1,
            4 => 2,
            16 => 4,
            36 => 6,
            _ => 1,
        }
    }

    /// Width of the mapping matrix (data modules only).
    pub fn mapping_width(&self) -> usize {
        self.horizontal_regions() * self.region_width
    }

    pub fn mapping_height(&self) -> usize {
        self.vertical_regions() * self.region_height
    }

    /// Full symbol width, finder and clock tracks included.
    pub fn symbol_width(&self) -> usize {
        self.mapping_width() + 2 * self.horizontal_regions()
    }

    pub fn symbol_height(&self) -> usize {
        self.mapping_height() + 2 * self.vertical_regions()
    }

    pub fn total_codewords(&self) -> usize {
        self.data_capacity + self.error_codewords
    }

    /// Reed-Solomon blocks; with ten blocks the first eight carry one
    /// extra data codeword.
    pub fn block_layout(&self) -> Result<BlockLayout> {
        let n = self.blocks;
        let short_data = self.data_capacity / n;
        let long_blocks = self.data_capacity % n;
        let ec = self.error_codewords / n;
        let blocks = (0..n)
            .map(|b| BlockSpec::new(short_data + usize::from(b < long_blocks), ec))
            .collect();
        BlockLayout::new(blocks, Weave::Strided)
    }

    fn allowed(&self, shape: SymbolShape) -> bool {
        match shape {
            SymbolShape::None => true,
            SymbolShape::Square => !self.rectangular,
            SymbolShape::Rectangle => self.rectangular,
        }
    }

    fn within(&self, min: Option<(usize, usize)>, max: Option<(usize, usize)>) -> bool {
        let (w, h) = (self.symbol_width(), self.symbol_height());
        min.is_none_or(|(min_w, min_h)| w >= min_w && h >= min_h)
            && max.is_none_or(|(max_w, max_h)| w <= max_w && h <= max_h)
    }
}

/// Smallest allowed size holding `data_codewords`. Size bounds are
/// `(width, height)` in modules.
pub fn lookup(
    data_codewords: usize,
    shape: SymbolShape,
    min_size: Option<(usize, usize)>,
    max_size: Option<(usize, usize)>,
) -> Result<&'static SymbolInfo> {
    let mut largest = 0;
    for symbol in SYMBOLS
        .iter()
        .filter(|s| s.allowed(shape) && s.within(min_size, max_size))
    {
        if data_codewords <= symbol.data_capacity {
            return Ok(symbol);
        }
        largest = largest.max(symbol.data_capacity);
    }
    Err(CodecError::CapacityExceeded {
        needed: data_codewords,
        available: largest,
    })
}

/// Size with exactly these symbol dimensions.
pub fn from_dimensions(width: usize, height: usize) -> Result<&'static SymbolInfo> {
    SYMBOLS
        .iter()
        .find(|s| s.symbol_width() == width && s.symbol_height() == height)
        .ok_or_else(|| {
            CodecError::format(format!("no Data Matrix symbol is {}x{}", width, height))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_dimensions() {
        let dims: Vec<(usize, usize)> = SYMBOLS
            .iter()
            .map(|s| (s.symbol_width(), s.symbol_height()))
            .collect();
        assert_eq!(dims[0], (10, 10));
        assert_eq!(dims[2], (18, 8));
        assert_eq!(dims[4], (32, 8));
        assert_eq!(dims[14], (48, 16));
        assert_eq!(dims[20], (52, 52));
        assert_eq!(dims[29], (144, 144));
        // 24 square, 6 rectangular
        assert_eq!(SYMBOLS.iter().filter(|s| s.rectangular).count(), 6);
    }

    #[test]
    fn test_codeword_totals_fill_mapping_matrix() {
        for s in &SYMBOLS {
            let modules = s.mapping_width() * s.mapping_height();
            // At most four modules are left for the fixed corner pattern
            assert_eq!(modules / 8, s.total_codewords(), "{:?}", s);
        }
    }

    #[test]
    fn test_lookup_respects_shape_and_bounds() {
        assert_eq!(lookup(3, SymbolShape::None, None, None).unwrap().symbol_width(), 10);
        assert_eq!(lookup(9, SymbolShape::None, None, None).unwrap().symbol_width(), 32);
        assert_eq!(lookup(9, SymbolShape::Square, None, None).unwrap().symbol_width(), 16);
        let rect = lookup(4, SymbolShape::Rectangle, None, None).unwrap();
        assert!(rect.rectangular);
        let bounded = lookup(1, SymbolShape::None, Some((20, 20)), None).unwrap();
        assert_eq!(bounded.symbol_width(), 20);
        assert!(matches!(
            lookup(50, SymbolShape::Rectangle, None, None),
            Err(CodecError::CapacityExceeded { needed: 50, available: 49 })
        ));
        assert!(matches!(
            lookup(1559, SymbolShape::None, None, None),
            Err(CodecError::CapacityExceeded { .. })
        ));
        assert!(lookup(5, SymbolShape::None, None, Some((10, 10))).is_err());
    }

    #[test]
    fn test_from_dimensions() {
        assert_eq!(from_dimensions(16, 16).unwrap().data_capacity, 12);
        assert_eq!(from_dimensions(26, 12).unwrap().data_capacity, 16);
        assert!(matches!(from_dimensions(11, 11), Err(CodecError::Format(_))));
        assert!(from_dimensions(8, 18).is_err());
    }

    #[test]
    fn test_largest_symbol_blocks() {
        let layout = SYMBOLS[29].block_layout().unwrap();
        let blocks = layout.blocks();
        assert_eq!(blocks.len(), 10);
        assert!(blocks[..8].iter().all(|b| b.data == 156 && b.ec == 62));
        assert!(blocks[8..].iter().all(|b| b.data == 155 && b.ec == 62));
        assert_eq!(layout.total_codewords(), 2178);
    }
}
