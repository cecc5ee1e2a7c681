//! rust_matrix - QR Code and Data Matrix codec core
//!
//! Turns text or bytes into module grids and module grids back into text.
//! Locating a symbol in an image and rendering one are left to the caller:
//! the codec starts and ends at a [`BitMatrix`] with dark modules set.
//!
//! ```
//! use rust_matrix::{DataMatrixOptions, QrEncodeOptions};
//!
//! let qr = rust_matrix::encode_qr("HELLO WORLD", &QrEncodeOptions::default()).unwrap();
//! let read = rust_matrix::decode_qr(&qr.modules).unwrap();
//! assert_eq!(read.content, "HELLO WORLD");
//!
//! let dm = rust_matrix::encode_datamatrix("12", &DataMatrixOptions::default()).unwrap();
//! assert_eq!(dm.codewords[0], 142);
//! assert_eq!(rust_matrix::decode_datamatrix(&dm.modules).unwrap().content, "12");
//! ```

/// Environment tuning knobs
pub mod config;
/// Shared error type
pub mod error;
/// Core data structures (QRCode, DataMatrixCode, BitMatrix, Version, etc.)
pub mod models;

/// Galois fields, Reed-Solomon and block interleaving
pub mod ecc;
/// Bit buffers and ECI charsets shared by both symbologies
pub mod common;

/// QR Code encoder and decoder
pub mod qr;
/// Data Matrix (ECC 200) encoder and decoder
pub mod datamatrix;

pub use datamatrix::{DataMatrixOptions, Encodation, SymbolShape};
pub use error::{CodecError, Result};
pub use models::{BitMatrix, DataMatrixCode, ECLevel, MaskPattern, ModeRun, QRCode, Version};
pub use qr::{Mode, QrEncodeOptions, Segment};

/// Encode text as a QR Code, choosing mode, charset and version.
pub fn encode_qr(text: &str, options: &QrEncodeOptions) -> Result<QRCode> {
    qr::encode_text(text, options)
}

/// Encode raw bytes as a single QR byte segment.
pub fn encode_qr_bytes(data: &[u8], options: &QrEncodeOptions) -> Result<QRCode> {
    qr::encode_bytes(data, options)
}

/// Encode caller-built QR segments.
pub fn encode_qr_segments(segments: &[Segment], options: &QrEncodeOptions) -> Result<QRCode> {
    qr::encode_segments(segments, options)
}

/// Decode a square QR module grid without quiet zone.
pub fn decode_qr(matrix: &BitMatrix) -> Result<QRCode> {
    qr::decode(matrix)
}

/// Encode text as a Data Matrix symbol.
pub fn encode_datamatrix(text: &str, options: &DataMatrixOptions) -> Result<DataMatrixCode> {
    datamatrix::encode_text(text, options)
}

/// Encode raw bytes as a Data Matrix symbol.
pub fn encode_datamatrix_bytes(data: &[u8], options: &DataMatrixOptions) -> Result<DataMatrixCode> {
    datamatrix::encode_bytes(data, options)
}

/// Decode a Data Matrix module grid, finder and clock tracks included.
pub fn decode_datamatrix(matrix: &BitMatrix) -> Result<DataMatrixCode> {
    datamatrix::decode(matrix)
}
