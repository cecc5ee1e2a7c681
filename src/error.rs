//! Error type shared by every encode and decode path.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a symbol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The matrix or codeword stream is structurally invalid for its geometry.
    #[error("Format error: {0}")]
    Format(String),

    /// More symbol errors than the Reed-Solomon code can correct.
    #[error("Too many errors to correct")]
    TooManyErrors,

    /// A character cannot be represented in the selected encodation.
    #[error("Illegal character {ch:?} at position {position}")]
    IllegalCharacter {
        /// Offending character.
        ch: char,
        /// Index of the character in the input.
        position: usize,
    },

    /// The payload does not fit any allowed symbol size.
    #[error("Capacity exceeded: need {needed} data codewords, at most {available} available")]
    CapacityExceeded {
        /// Data codewords (or bytes) required by the payload.
        needed: usize,
        /// Largest capacity among the allowed symbols.
        available: usize,
    },

    /// Block accounting or interleaving does not add up.
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Division by zero (or logarithm/inverse of zero) in a Galois field.
    #[error("Division by zero in Galois field")]
    DivisionByZero,

    /// Caller supplied options that cannot be satisfied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        CodecError::Format(msg.into())
    }
}
