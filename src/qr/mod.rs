//! QR Code (ISO/IEC 18004, model 2)
//!
//! Encoding goes segments → bit stream → Reed-Solomon blocks → placement
//! → mask selection. Decoding walks the same path backwards from a module
//! grid.

/// BCH(15,5) and BCH(18,6) helpers
pub mod bch;
/// Zigzag codeword placement and extraction
pub mod bitstream;
pub mod decoder;
pub mod encoder;
/// Format information (EC level + mask)
pub mod format;
/// Which modules carry function patterns
pub mod function_mask;
/// Data masks and penalty scoring
pub mod mask;
pub mod matrix;
pub mod modes;
pub mod payload;
/// Capacity and block tables
pub mod tables;
/// Version information (v7+)
pub mod version;

pub use decoder::decode;
pub use encoder::{QrEncodeOptions, Segment, encode_bytes, encode_segments, encode_text};
pub use format::FormatInfo;
pub use modes::Mode;
pub use version::VersionInfo;
