//! Splitting a message into error correction blocks and weaving the blocks
//! into the codeword order placed in the symbol.

use tracing::debug;

use super::reed_solomon::{ReedSolomonDecoder, ReedSolomonEncoder};
use crate::error::{CodecError, Result};

/// Data and check codeword counts of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    pub data: usize,
    pub ec: usize,
}

impl BlockSpec {
    pub fn new(data: usize, ec: usize) -> Self {
        Self { data, ec }
    }

    pub fn total(&self) -> usize {
        self.data + self.ec
    }
}

/// Order in which block codewords are woven into the symbol stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weave {
    /// QR: blocks take consecutive runs of the message; the stream holds
    /// codeword `i` of every block in turn, all data first, then all check
    /// codewords. Blocks shorter than `i` are skipped.
    DataThenEc,
    /// Data Matrix: with `n` blocks, block `b` owns stream (and message)
    /// positions `b, b + n, b + 2n, ...` across its data then check codewords.
    Strided,
}

/// Block structure of one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    blocks: Vec<BlockSpec>,
    weave: Weave,
}

/// Where each codeword of a block lives.
struct BlockPositions {
    /// Message index of each data codeword.
    message: Vec<usize>,
    /// Stream index of each codeword, data then check.
    stream: Vec<usize>,
}

impl BlockLayout {
    pub fn new(blocks: Vec<BlockSpec>, weave: Weave) -> Result<Self> {
        if blocks.is_empty() || blocks.iter().any(|b| b.data == 0 || b.ec == 0) {
            return Err(CodecError::InvalidArgument(format!(
                "unusable block layout {:?}",
                blocks
            )));
        }
        Ok(Self { blocks, weave })
    }

    pub fn blocks(&self) -> &[BlockSpec] {
        &self.blocks
    }

    pub fn weave(&self) -> Weave {
        self.weave
    }

    pub fn data_codewords(&self) -> usize {
        self.blocks.iter().map(|b| b.data).sum()
    }

    pub fn total_codewords(&self) -> usize {
        self.blocks.iter().map(BlockSpec::total).sum()
    }

    fn positions(&self) -> Vec<BlockPositions> {
        match self.weave {
            Weave::DataThenEc => self.positions_data_then_ec(),
            Weave::Strided => self.positions_strided(),
        }
    }

    fn positions_data_then_ec(&self) -> Vec<BlockPositions> {
        let mut out: Vec<BlockPositions> = Vec::with_capacity(self.blocks.len());
        let mut offset = 0;
        for block in &self.blocks {
            out.push(BlockPositions {
                message: (offset..offset + block.data).collect(),
                stream: vec![0; block.total()],
            });
            offset += block.data;
        }

        let max_data = self.blocks.iter().map(|b| b.data).max().unwrap_or(0);
        let max_ec = self.blocks.iter().map(|b| b.ec).max().unwrap_or(0);
        let mut next = 0;
        for i in 0..max_data {
            for (b, block) in self.blocks.iter().enumerate() {
                if i < block.data {
                    out[b].stream[i] = next;
                    next += 1;
                }
            }
        }
        for i in 0..max_ec {
            for (b, block) in self.blocks.iter().enumerate() {
                if i < block.ec {
                    out[b].stream[block.data + i] = next;
                    next += 1;
                }
            }
        }
        out
    }

    fn positions_strided(&self) -> Vec<BlockPositions> {
        let n = self.blocks.len();
        self.blocks
            .iter()
            .enumerate()
            .map(|(b, block)| BlockPositions {
                message: (0..block.data).map(|k| b + k * n).collect(),
                stream: (0..block.total()).map(|k| b + k * n).collect(),
            })
            .collect()
    }

    fn check_strided_coverage(&self) -> Result<()> {
        if self.weave != Weave::Strided {
            return Ok(());
        }
        let total = self.total_codewords();
        let n = self.blocks.len();
        let mut seen = vec![false; total];
        for (b, block) in self.blocks.iter().enumerate() {
            for k in 0..block.total() {
                let index = b + k * n;
                if index >= total || seen[index] {
                    return Err(CodecError::SizeMismatch {
                        expected: total,
                        actual: index + 1,
                    });
                }
                seen[index] = true;
            }
        }
        Ok(())
    }

    /// Split `data`, append check codewords per block and weave the result.
    pub fn encode(&self, data: &[u8], encoder: &ReedSolomonEncoder<'_>) -> Result<Vec<u8>> {
        if data.len() != self.data_codewords() {
            return Err(CodecError::SizeMismatch {
                expected: self.data_codewords(),
                actual: data.len(),
            });
        }
        self.check_strided_coverage()?;

        let total = self.total_codewords();
        let mut stream = vec![0u8; total];
        for (block, positions) in self.blocks.iter().zip(self.positions()) {
            let block_data: Vec<u8> = positions.message.iter().map(|&i| data[i]).collect();
            let ec = encoder.ec_codewords(&block_data, block.ec)?;
            for (&value, &index) in block_data.iter().chain(ec.iter()).zip(positions.stream.iter()) {
                stream[index] = value;
            }
        }
        debug!(
            blocks = self.blocks.len(),
            data = data.len(),
            total,
            "interleaved codewords"
        );
        Ok(stream)
    }

    /// Un-weave `raw`, correct every block and return the message with the
    /// total number of corrected codewords.
    pub fn decode(&self, raw: &[u8], decoder: &ReedSolomonDecoder<'_>) -> Result<(Vec<u8>, usize)> {
        if raw.len() != self.total_codewords() {
            return Err(CodecError::SizeMismatch {
                expected: self.total_codewords(),
                actual: raw.len(),
            });
        }
        self.check_strided_coverage()?;

        let mut message = vec![0u8; self.data_codewords()];
        let mut corrected = 0;
        for (block, positions) in self.blocks.iter().zip(self.positions()) {
            let mut codewords: Vec<u8> = positions.stream.iter().map(|&i| raw[i]).collect();
            corrected += decoder.decode_bytes(&mut codewords, block.ec)?;
            for (&value, &index) in codewords[..block.data].iter().zip(positions.message.iter()) {
                message[index] = value;
            }
        }
        Ok((message, corrected))
    }
}
