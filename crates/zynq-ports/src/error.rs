//! Error types for port declaration parsing.

use std::path::PathBuf;

/// Errors that can occur while reading a port declaration list.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A range bound that is not a non-negative integer.
    #[error("line {line}: invalid width token '{token}' (expected a non-negative integer)")]
    InvalidWidth {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A range whose least significant bound is not zero.
    #[error("line {line}: range '[{range}]' must end at bit 0")]
    NonZeroLsb {
        /// 1-based line number.
        line: usize,
        /// Range text between the brackets.
        range: String,
    },

    /// A range that is unterminated or has no `:` separator.
    #[error("line {line}: malformed range '{range}'")]
    MalformedRange {
        /// 1-based line number.
        line: usize,
        /// Range text as found.
        range: String,
    },

    /// A direction keyword followed by no identifier.
    #[error("line {line}: '{direction}' declaration has no port name")]
    MissingName {
        /// 1-based line number.
        line: usize,
        /// The direction keyword that opened the declaration.
        direction: String,
    },

    /// Declaration file not found.
    #[error("port declaration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// I/O error reading a declaration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for port parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
