//! Error correction shared by both symbologies
//!
//! - Galois field arithmetic (QR, Data Matrix and the Aztec fields)
//! - Polynomials over those fields
//! - Reed-Solomon encoding and decoding
//! - Block split and interleaving

/// GF(2^m) log/exp arithmetic
pub mod galois;
/// Block split, check codewords and weave order
pub mod interleave;
/// Polynomials with field coefficients
pub mod poly;
/// Reed-Solomon encoder and decoder
pub mod reed_solomon;

pub use galois::GaloisField;
pub use interleave::{BlockLayout, BlockSpec, Weave};
pub use poly::GfPoly;
pub use reed_solomon::{ReedSolomonDecoder, ReedSolomonEncoder};
