/// BCH check bits for QR format and version information

/// Generator for format information: x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
pub const FORMAT_GENERATOR: u32 = 0x537;
/// Generator for version information: x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
pub const VERSION_GENERATOR: u32 = 0x1F25;

fn find_msb_set(value: u32) -> u32 {
    32 - value.leading_zeros()
}

/// Remainder of `value * x^deg(poly)` divided by `poly`.
pub fn bch_code(value: u32, poly: u32) -> u32 {
    let msb_poly = find_msb_set(poly);
    let mut value = value << (msb_poly - 1);
    while find_msb_set(value) >= msb_poly {
        value ^= poly << (find_msb_set(value) - msb_poly);
    }
    value
}

/// Number of differing bits.
pub fn hamming_distance(a: u32, b: u32) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bch() {
        // M / mask 5 (data 00101) from the reference format table
        assert_eq!(bch_code(0b00101, FORMAT_GENERATOR), 0b0011011100);
    }

    #[test]
    fn test_version_bch() {
        // Version 7 carries 000111 110010 010100
        assert_eq!((7 << 12) | bch_code(7, VERSION_GENERATOR), 0x07C94);
    }

    #[test]
    fn test_hamming() {
        assert_eq!(hamming_distance(0b1010, 0b0110), 2);
        assert_eq!(hamming_distance(7, 7), 0);
    }
}
