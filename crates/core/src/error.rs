//! Error types for the huffpack codec.
//!
//! All operations return structured errors rather than panicking.
//! Decode-time errors are raised at the first inconsistency found, so a
//! damaged container is reported instead of being decoded into wrong bytes.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Header: the container header is malformed, inconsistent or of an
///   unknown version
/// - Payload: the bitstream ends early or does not decode against the tree
/// - Integrity: the decoded bytes disagree with the header's length or CRC
/// - Bit I/O and Huffman: misuse of the lower-level building blocks
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Header is malformed, internally inconsistent, or of an unknown version
    #[error("corrupt header: {reason}")]
    CorruptHeader { reason: String },

    /// Payload ran out of bits before the end-of-stream code was decoded
    #[error("truncated payload: bitstream ended at bit {position} before end of stream")]
    TruncatedPayload { position: usize },

    /// A bit sequence does not correspond to any code in the tree
    #[error("invalid code at bit position {position}")]
    InvalidCode { position: usize },

    /// Decoded byte count disagrees with the header
    #[error("decoded length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// CRC of the decoded bytes disagrees with the header
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman tree construction failed
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `CorruptHeader` error from anything displayable.
    pub fn corrupt_header(reason: impl Into<String>) -> Self {
        Error::CorruptHeader {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the container contents rather than by
    /// the environment.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman tree construction errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Code length exceeds what the bit writer can emit in one call
    #[error("code length {length} exceeds maximum {max}")]
    CodeLengthTooLong { length: usize, max: usize },

    /// Code lengths cannot form a complete prefix code
    #[error("invalid code lengths: {reason}")]
    InvalidCodeLengths { reason: String },

    /// Asked to encode a symbol the code table has no code for
    #[error("symbol {symbol} has no code")]
    MissingSymbol { symbol: u16 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
