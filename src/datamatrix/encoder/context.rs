use super::Encodation;
use crate::datamatrix::DataMatrixOptions;
use crate::datamatrix::symbol_info::{self, SymbolInfo, SymbolShape};
use crate::error::Result;

/// Cursor and output of one high-level encoding run.
pub struct EncoderContext<'a> {
    message: &'a [u8],
    pub(crate) pos: usize,
    skip_at_end: usize,
    codewords: Vec<u8>,
    new_encoding: Option<Encodation>,
    shape: SymbolShape,
    min_size: Option<(usize, usize)>,
    max_size: Option<(usize, usize)>,
    symbol_info: Option<&'static SymbolInfo>,
}

impl<'a> EncoderContext<'a> {
    pub fn new(message: &'a [u8], options: &DataMatrixOptions) -> Self {
        Self {
            message,
            pos: 0,
            skip_at_end: 0,
            codewords: Vec::with_capacity(message.len()),
            new_encoding: None,
            shape: options.shape,
            min_size: options.min_size,
            max_size: options.max_size,
            symbol_info: None,
        }
    }

    /// The whole message, trailing macro bytes included.
    pub fn message(&self) -> &'a [u8] {
        self.message
    }

    pub fn current_char(&self) -> u8 {
        self.message[self.pos]
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    pub fn into_codewords(self) -> Vec<u8> {
        self.codewords
    }

    pub fn write_codeword(&mut self, codeword: u8) {
        self.codewords.push(codeword);
    }

    pub fn write_codewords(&mut self, codewords: &[u8]) {
        self.codewords.extend_from_slice(codewords);
    }

    pub fn codeword_count(&self) -> usize {
        self.codewords.len()
    }

    pub fn signal_encoder_change(&mut self, encodation: Encodation) {
        self.new_encoding = Some(encodation);
    }

    pub fn new_encoding(&self) -> Option<Encodation> {
        self.new_encoding
    }

    pub fn take_new_encoding(&mut self) -> Option<Encodation> {
        self.new_encoding.take()
    }

    pub fn set_skip_at_end(&mut self, count: usize) {
        self.skip_at_end = count;
    }

    fn total_message_chars(&self) -> usize {
        self.message.len().saturating_sub(self.skip_at_end)
    }

    pub fn has_more_characters(&self) -> bool {
        self.pos < self.total_message_chars()
    }

    pub fn remaining_characters(&self) -> usize {
        self.total_message_chars().saturating_sub(self.pos)
    }

    /// Current symbol, grown to the smallest allowed one holding `len`
    /// data codewords when it is too small.
    pub fn update_symbol_info(&mut self, len: usize) -> Result<&'static SymbolInfo> {
        match self.symbol_info {
            Some(info) if len <= info.data_capacity => Ok(info),
            _ => {
                let info = symbol_info::lookup(len, self.shape, self.min_size, self.max_size)?;
                self.symbol_info = Some(info);
                Ok(info)
            }
        }
    }

    /// Capacity left in the current symbol after `len` codewords.
    pub fn available_after(&mut self, len: usize) -> Result<usize> {
        Ok(self
            .update_symbol_info(len)?
            .data_capacity
            .saturating_sub(len))
    }

    pub fn reset_symbol_info(&mut self) {
        self.symbol_info = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_info_only_grows() {
        let options = DataMatrixOptions::default();
        let mut ctx = EncoderContext::new(b"ABC", &options);
        assert_eq!(ctx.update_symbol_info(4).unwrap().data_capacity, 5);
        // A smaller need keeps the current symbol
        assert_eq!(ctx.update_symbol_info(1).unwrap().data_capacity, 5);
        assert_eq!(ctx.update_symbol_info(6).unwrap().data_capacity, 8);
        ctx.reset_symbol_info();
        assert_eq!(ctx.update_symbol_info(1).unwrap().data_capacity, 3);
        assert_eq!(ctx.available_after(2).unwrap(), 1);
    }

    #[test]
    fn test_skip_at_end() {
        let options = DataMatrixOptions::default();
        let mut ctx = EncoderContext::new(b"ABCDE", &options);
        ctx.set_skip_at_end(2);
        ctx.pos = 2;
        assert_eq!(ctx.remaining_characters(), 1);
        ctx.pos = 3;
        assert!(!ctx.has_more_characters());
        assert_eq!(ctx.message().len(), 5);
    }
}
