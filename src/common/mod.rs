//! Pieces shared by the QR and Data Matrix codecs

/// MSB-first bit buffer and reader
pub mod bits;
/// Character set designators
pub mod eci;

pub use bits::{BitBuffer, BitReader};
pub use eci::Charset;
