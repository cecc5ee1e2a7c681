use super::{BitMatrix, ModeRun};
use crate::datamatrix::Encodation;

/// An encoded or decoded Data Matrix (ECC 200) symbol
#[derive(Debug, Clone)]
pub struct DataMatrixCode {
    /// Raw payload bytes, macro header and trailer included
    pub data: Vec<u8>,
    /// Payload as text
    pub content: String,
    /// Symbol width in modules, finder and clock tracks included
    pub width: usize,
    /// Symbol height in modules
    pub height: usize,
    /// Module matrix (true = dark)
    pub modules: BitMatrix,
    /// Data codewords, padding included, without check codewords
    pub codewords: Vec<u8>,
    /// Encodation runs in stream order
    pub segments: Vec<ModeRun<Encodation>>,
    /// Number of codewords repaired by error correction (decode only)
    pub corrected_errors: usize,
}

impl DataMatrixCode {
    pub fn is_rectangular(&self) -> bool {
        self.width != self.height
    }

    /// Encodations used, in stream order.
    pub fn encodations(&self) -> Vec<Encodation> {
        self.segments.iter().map(|run| run.mode).collect()
    }
}
