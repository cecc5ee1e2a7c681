use crate::ecc::{BlockLayout, BlockSpec, Weave};
use crate::error::Result;
use crate::models::{ECLevel, Version};

/// Error correction block structure of one (version, level) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    pub num_blocks: usize,
    pub ecc_per_block: usize,
    pub total_codewords: usize,
    pub data_codewords: usize,
}

// Tables from the QR Code specification (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Modules available for codeword bits after all function patterns,
/// including the remainder bits.
pub fn raw_data_modules(version: Version) -> usize {
    let ver = version.number() as usize;
    let mut result = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let num_align = ver / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

/// Total codewords (data + check) in a symbol.
pub fn total_codewords(version: Version) -> usize {
    raw_data_modules(version) / 8
}

pub fn ec_block_info(version: Version, ec_level: ECLevel) -> EcBlockInfo {
    let v = version.number() as usize;
    let idx = ec_level.ordinal();
    let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][v] as usize;
    let ecc_per_block = ECC_CODEWORDS_PER_BLOCK[idx][v] as usize;
    let total_codewords = total_codewords(version);
    EcBlockInfo {
        num_blocks,
        ecc_per_block,
        total_codewords,
        data_codewords: total_codewords - num_blocks * ecc_per_block,
    }
}

/// Data codewords a symbol of this version and level carries.
pub fn data_codewords(version: Version, ec_level: ECLevel) -> usize {
    ec_block_info(version, ec_level).data_codewords
}

/// Blocks in stream order: the shorter group first, then blocks one
/// data codeword longer.
pub fn block_layout(version: Version, ec_level: ECLevel) -> Result<BlockLayout> {
    let info = ec_block_info(version, ec_level);
    let long_blocks = info.total_codewords % info.num_blocks;
    let short_blocks = info.num_blocks - long_blocks;
    let short_data = info.data_codewords / info.num_blocks;

    let mut blocks = Vec::with_capacity(info.num_blocks);
    blocks.extend(std::iter::repeat_n(
        BlockSpec::new(short_data, info.ecc_per_block),
        short_blocks,
    ));
    blocks.extend(std::iter::repeat_n(
        BlockSpec::new(short_data + 1, info.ecc_per_block),
        long_blocks,
    ));
    BlockLayout::new(blocks, Weave::DataThenEc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_total_codewords() {
        assert_eq!(total_codewords(v(1)), 26);
        assert_eq!(total_codewords(v(2)), 44);
        assert_eq!(total_codewords(v(7)), 196);
        assert_eq!(total_codewords(v(40)), 3706);
    }

    #[test]
    fn test_data_codewords() {
        assert_eq!(data_codewords(v(1), ECLevel::L), 19);
        assert_eq!(data_codewords(v(1), ECLevel::M), 16);
        assert_eq!(data_codewords(v(1), ECLevel::Q), 13);
        assert_eq!(data_codewords(v(1), ECLevel::H), 9);
        assert_eq!(data_codewords(v(40), ECLevel::L), 2956);
        assert_eq!(data_codewords(v(40), ECLevel::H), 1276);
    }

    #[test]
    fn test_block_groups() {
        // 5-Q: 2 blocks of 15 data, 2 blocks of 16 data, 18 check codewords each
        let layout = block_layout(v(5), ECLevel::Q).unwrap();
        let blocks = layout.blocks();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], BlockSpec::new(15, 18));
        assert_eq!(blocks[1], BlockSpec::new(15, 18));
        assert_eq!(blocks[2], BlockSpec::new(16, 18));
        assert_eq!(blocks[3], BlockSpec::new(16, 18));
        assert_eq!(layout.total_codewords(), total_codewords(v(5)));
    }

    #[test]
    fn test_every_layout_adds_up() {
        for n in 1..=40 {
            for level in ECLevel::ALL {
                let layout = block_layout(v(n), level).unwrap();
                assert_eq!(layout.total_codewords(), total_codewords(v(n)));
                assert_eq!(layout.data_codewords(), data_codewords(v(n), level));
            }
        }
    }
}
