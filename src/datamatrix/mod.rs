//! Data Matrix (ECC 200)
//!
//! Encoding runs the high-level encodation search, appends interleaved
//! Reed-Solomon check codewords, places them with the utah pattern and
//! frames each data region. Decoding reverses the path from a module grid.

pub mod decoded_bit_stream;
pub mod decoder;
pub mod encoder;
/// Codeword placement inside the mapping matrix
pub mod placement;
/// Finder and clock track framing
pub mod symbol;
pub mod symbol_info;

use tracing::debug;

pub use decoder::decode;
pub use encoder::Encodation;
pub use symbol_info::{SymbolInfo, SymbolShape};

use crate::common::eci::{ECI_UTF8, encode_latin1, encode_latin1_strict};
use crate::ecc::ReedSolomonEncoder;
use crate::error::Result;
use crate::models::DataMatrixCode;
use placement::Placement;

/// Options for Data Matrix encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataMatrixOptions {
    /// Restrict the symbol to square or rectangular sizes
    pub shape: SymbolShape,
    /// Smallest symbol (width, height) to consider
    pub min_size: Option<(usize, usize)>,
    /// Largest symbol (width, height) to consider
    pub max_size: Option<(usize, usize)>,
    /// Compress `[)>RS05GS ... RS EOT` and `06` envelopes into one codeword
    pub detect_macros: bool,
    /// Send text above U+00FF as UTF-8 behind ECI 26 instead of rejecting it
    pub emit_eci: bool,
}

impl Default for DataMatrixOptions {
    fn default() -> Self {
        Self {
            shape: SymbolShape::None,
            min_size: None,
            max_size: None,
            detect_macros: true,
            emit_eci: false,
        }
    }
}

impl DataMatrixOptions {
    pub fn with_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_min_size(mut self, width: usize, height: usize) -> Self {
        self.min_size = Some((width, height));
        self
    }

    pub fn with_max_size(mut self, width: usize, height: usize) -> Self {
        self.max_size = Some((width, height));
        self
    }

    pub fn with_eci(mut self, emit_eci: bool) -> Self {
        self.emit_eci = emit_eci;
        self
    }
}

fn encode_message(
    message: &[u8],
    content: String,
    options: &DataMatrixOptions,
    eci: Option<u32>,
) -> Result<DataMatrixCode> {
    let high_level = encoder::encode_high_level(message, options, eci)?;
    let info = high_level.symbol;

    let layout = info.block_layout()?;
    let codewords = layout.encode(&high_level.codewords, ReedSolomonEncoder::data_matrix())?;
    let mapping = Placement::new(info.mapping_width(), info.mapping_height())?.place(&codewords)?;
    let modules = symbol::frame(info, &mapping)?;

    debug!(
        width = info.symbol_width(),
        height = info.symbol_height(),
        total_codewords = codewords.len(),
        "encoded Data Matrix symbol"
    );

    Ok(DataMatrixCode {
        data: message.to_vec(),
        content,
        width: info.symbol_width(),
        height: info.symbol_height(),
        modules,
        codewords: high_level.codewords,
        segments: high_level.segments,
        corrected_errors: 0,
    })
}

/// Encode text as ISO-8859-1. Characters above U+00FF are an
/// `IllegalCharacter` unless `emit_eci` allows UTF-8 behind ECI 26.
pub fn encode_text(text: &str, options: &DataMatrixOptions) -> Result<DataMatrixCode> {
    match encode_latin1(text) {
        Some(bytes) => encode_message(&bytes, text.to_string(), options, None),
        None if options.emit_eci => {
            encode_message(text.as_bytes(), text.to_string(), options, Some(ECI_UTF8))
        }
        None => {
            let bytes = encode_latin1_strict(text)?;
            encode_message(&bytes, text.to_string(), options, None)
        }
    }
}

/// Encode raw bytes, read back as ISO-8859-1.
pub fn encode_bytes(data: &[u8], options: &DataMatrixOptions) -> Result<DataMatrixCode> {
    let content = data.iter().map(|&b| b as char).collect();
    encode_message(data, content, options, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn test_encode_digits_symbol() {
        let code = encode_text("12", &DataMatrixOptions::default()).unwrap();
        assert_eq!(code.codewords, vec![142, 129, 70]);
        assert_eq!((code.width, code.height), (10, 10));
        assert_eq!(code.modules.width(), 10);
        assert_eq!(code.encodations(), vec![Encodation::Ascii]);
    }

    #[test]
    fn test_encode_hello_world() {
        let code = encode_text("Hello, World!", &DataMatrixOptions::default()).unwrap();
        // Lowercase text after a capital stays in ASCII
        assert_eq!(
            code.codewords,
            vec![73, 102, 109, 109, 112, 45, 33, 88, 112, 115, 109, 101, 34, 129, 87, 237]
        );
        assert_eq!((code.width, code.height), (26, 12));
        assert!(code.is_rectangular());
    }

    #[test]
    fn test_shape_hint() {
        let options = DataMatrixOptions::default().with_shape(SymbolShape::Rectangle);
        let code = encode_text("ABCDEFGH", &options).unwrap();
        assert!(code.is_rectangular());

        let options = DataMatrixOptions::default().with_shape(SymbolShape::Square);
        let code = encode_text("ABCDEFGH", &options).unwrap();
        assert!(!code.is_rectangular());
    }

    #[test]
    fn test_non_latin1_text_is_rejected() {
        let err = encode_text("ab\u{20ac}", &DataMatrixOptions::default()).unwrap_err();
        assert_eq!(err, CodecError::IllegalCharacter { ch: '\u{20ac}', position: 2 });
        // Latin-1 above 0x7F still encodes with an upper shift
        let code = encode_text("\u{e9}", &DataMatrixOptions::default()).unwrap();
        assert_eq!(code.codewords[..2], [235, 0xE9 - 127]);
    }

    #[test]
    fn test_non_latin1_text_with_eci() {
        let options = DataMatrixOptions::default().with_eci(true);
        let code = encode_text("\u{20ac}", &options).unwrap();
        assert_eq!(code.codewords, vec![241, 27, 231, 90, 206, 4, 196, 129]);
        assert_eq!(code.data, "\u{20ac}".as_bytes());
    }

    #[test]
    fn test_max_size_limits_capacity() {
        let options = DataMatrixOptions::default().with_max_size(10, 10);
        let err = encode_bytes(b"0123456789", &options).unwrap_err();
        assert!(matches!(err, CodecError::CapacityExceeded { .. }));
    }
}
