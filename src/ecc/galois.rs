use std::fmt;
use std::sync::OnceLock;

use crate::error::{CodecError, Result};

/// GF(2^m) arithmetic backed by log/exp tables.
///
/// Elements are stored as `u16` so the 10- and 12-bit Aztec fields share the
/// same representation as the byte-oriented QR and Data Matrix fields.
pub struct GaloisField {
    name: &'static str,
    size: usize,
    primitive: u32,
    generator_base: usize,
    exp_table: Vec<u16>,
    log_table: Vec<u16>,
}

impl GaloisField {
    /// Build a field of `size` elements from its primitive polynomial.
    ///
    /// `generator_base` is the exponent of the first root of generator
    /// polynomials built over this field (0 for QR, 1 for Data Matrix).
    pub fn new(name: &'static str, primitive: u32, size: usize, generator_base: usize) -> Self {
        let mut exp_table = vec![0u16; size];
        let mut log_table = vec![0u16; size];
        let mut x: u32 = 1;
        for slot in exp_table.iter_mut() {
            *slot = x as u16;
            x <<= 1;
            if x as usize >= size {
                x ^= primitive;
                x &= size as u32 - 1;
            }
        }
        for i in 0..size - 1 {
            log_table[exp_table[i] as usize] = i as u16;
        }
        Self {
            name,
            size,
            primitive,
            generator_base,
            exp_table,
            log_table,
        }
    }

    /// QR Code field: x^8 + x^4 + x^3 + x^2 + 1, first root alpha^0.
    pub fn qr_code() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("QR_CODE_FIELD_256", 0x011D, 256, 0))
    }

    /// Data Matrix field: x^8 + x^5 + x^3 + x^2 + 1, first root alpha^1.
    pub fn data_matrix() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("DATA_MATRIX_FIELD_256", 0x012D, 256, 1))
    }

    /// Aztec 8-bit codeword field (same polynomial as Data Matrix).
    pub fn aztec_data_8() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("AZTEC_DATA_8", 0x012D, 256, 1))
    }

    pub fn aztec_data_6() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("AZTEC_DATA_6", 0x43, 64, 1))
    }

    pub fn aztec_data_10() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("AZTEC_DATA_10", 0x409, 1024, 1))
    }

    pub fn aztec_data_12() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("AZTEC_DATA_12", 0x1069, 4096, 1))
    }

    /// Aztec mode message field.
    pub fn aztec_param() -> &'static GaloisField {
        static FIELD: OnceLock<GaloisField> = OnceLock::new();
        FIELD.get_or_init(|| GaloisField::new("AZTEC_PARAM", 0x13, 16, 1))
    }

    /// Addition and subtraction are the same operation in GF(2^m).
    #[inline]
    pub fn add(a: u16, b: u16) -> u16 {
        a ^ b
    }

    /// alpha^a, with `a` reduced modulo the multiplicative group order.
    #[inline]
    pub fn exp(&self, a: usize) -> u16 {
        self.exp_table[a % (self.size - 1)]
    }

    /// Discrete logarithm of a non-zero element.
    pub fn log(&self, a: u16) -> Result<usize> {
        if a == 0 {
            return Err(CodecError::DivisionByZero);
        }
        Ok(self.log_table[a as usize] as usize)
    }

    /// Multiplicative inverse of a non-zero element.
    pub fn inverse(&self, a: u16) -> Result<u16> {
        if a == 0 {
            return Err(CodecError::DivisionByZero);
        }
        let log = self.log_table[a as usize] as usize;
        Ok(self.exp_table[self.size - 1 - log])
    }

    #[inline]
    pub fn multiply(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log_table[a as usize] as usize + self.log_table[b as usize] as usize;
        self.exp_table[sum % (self.size - 1)]
    }

    pub fn divide(&self, a: u16, b: u16) -> Result<u16> {
        if b == 0 {
            return Err(CodecError::DivisionByZero);
        }
        Ok(self.multiply(a, self.inverse(b)?))
    }

    /// Number of field elements.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Exponent of the first generator root.
    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    pub fn primitive(&self) -> u32 {
        self.primitive
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF(0x{:x},{})", self.primitive, self.size)
    }
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        self.primitive == other.primitive
            && self.size == other.size
            && self.generator_base == other.generator_base
    }
}

impl Eq for GaloisField {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_field_tables() {
        let gf = GaloisField::qr_code();
        assert_eq!(gf.exp(0), 1);
        assert_eq!(gf.exp(8), 29);
        assert_eq!(gf.exp(255), 1);
        assert_eq!(gf.exp(256), 2);
        assert_eq!(gf.log(2).unwrap(), 1);
        assert_eq!(gf.log(29).unwrap(), 8);
    }

    #[test]
    fn test_data_matrix_field_tables() {
        let gf = GaloisField::data_matrix();
        // x^8 = x^5 + x^3 + x^2 + 1
        assert_eq!(gf.exp(8), 0x2D);
        assert_eq!(gf.generator_base(), 1);
    }

    #[test]
    fn test_multiply_divide_inverse() {
        for gf in [GaloisField::qr_code(), GaloisField::aztec_data_10()] {
            for a in 1..gf.size() as u16 {
                let inv = gf.inverse(a).unwrap();
                assert_eq!(gf.multiply(a, inv), 1, "{:?} a={}", gf, a);
                assert_eq!(gf.divide(a, a).unwrap(), 1);
            }
            assert_eq!(gf.multiply(0, 5), 0);
            assert_eq!(gf.multiply(5, 0), 0);
            assert_eq!(gf.divide(0, 5).unwrap(), 0);
        }
    }

    #[test]
    fn test_zero_is_rejected() {
        let gf = GaloisField::aztec_param();
        assert_eq!(gf.inverse(0), Err(CodecError::DivisionByZero));
        assert_eq!(gf.divide(3, 0), Err(CodecError::DivisionByZero));
        assert_eq!(gf.log(0), Err(CodecError::DivisionByZero));
    }

    #[test]
    fn test_exp_log_are_inverse_on_every_field() {
        let fields = [
            GaloisField::qr_code(),
            GaloisField::data_matrix(),
            GaloisField::aztec_data_6(),
            GaloisField::aztec_data_8(),
            GaloisField::aztec_data_10(),
            GaloisField::aztec_data_12(),
            GaloisField::aztec_param(),
        ];
        for gf in fields {
            let mut seen = vec![false; gf.size()];
            for i in 0..gf.size() - 1 {
                let e = gf.exp(i);
                assert_ne!(e, 0);
                assert!(!seen[e as usize], "{} repeats at {}", gf.name(), i);
                seen[e as usize] = true;
                assert_eq!(gf.log(e).unwrap(), i);
            }
        }
    }
}
