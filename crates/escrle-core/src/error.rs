//! Error types for the escrle-core library.
//!
//! Encoding cannot fail, so the only error type here describes why an
//! encoded stream was rejected by the decoder. Every variant carries the
//! scan position (counted in characters, not bytes) where the fault was found.

use thiserror::Error;

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Structural violation found while decoding a run-length stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A token did not start with a decimal count
    #[error("invalid format: missing count at position {offset}")]
    MissingCount {
        /// Character offset of the token start
        offset: usize,
    },

    /// The stream ended right after the count digits
    #[error("invalid format: count not followed by character at position {offset}")]
    MissingLiteral {
        /// Character offset just past the last count digit
        offset: usize,
    },

    /// The escape marker was the last character in the stream
    #[error("invalid format: escape at end of stream at position {offset}")]
    DanglingEscape {
        /// Character offset of the escape marker
        offset: usize,
    },

    /// The count does not fit in a 64-bit integer
    #[error("invalid format: count overflows at position {offset}")]
    CountOverflow {
        /// Character offset of the token start
        offset: usize,
    },

    /// The count exceeds the configured maximum run length
    #[error("run of {count} at position {offset} exceeds maximum run length {max}")]
    RunTooLong {
        /// Character offset of the token start
        offset: usize,
        /// The count found in the stream
        count: u64,
        /// Configured maximum
        max: u64,
    },

    /// Expanding the token would exceed the configured output size
    #[error("decoded output exceeds {limit} bytes at position {offset}")]
    OutputTooLarge {
        /// Character offset of the token start
        offset: usize,
        /// Configured output limit in bytes
        limit: usize,
    },
}

impl DecodeError {
    /// Creates a new missing count error
    pub fn missing_count(offset: usize) -> Self {
        Self::MissingCount { offset }
    }

    /// Creates a new missing literal error
    pub fn missing_literal(offset: usize) -> Self {
        Self::MissingLiteral { offset }
    }

    /// Creates a new dangling escape error
    pub fn dangling_escape(offset: usize) -> Self {
        Self::DanglingEscape { offset }
    }

    /// Creates a new count overflow error
    pub fn count_overflow(offset: usize) -> Self {
        Self::CountOverflow { offset }
    }

    /// Creates a new run length limit error
    pub fn run_too_long(offset: usize, count: u64, max: u64) -> Self {
        Self::RunTooLong { offset, count, max }
    }

    /// Creates a new output limit error
    pub fn output_too_large(offset: usize, limit: usize) -> Self {
        Self::OutputTooLarge { offset, limit }
    }

    /// Scan position where the fault was detected
    pub fn offset(&self) -> usize {
        match *self {
            Self::MissingCount { offset }
            | Self::MissingLiteral { offset }
            | Self::DanglingEscape { offset }
            | Self::CountOverflow { offset }
            | Self::RunTooLong { offset, .. }
            | Self::OutputTooLarge { offset, .. } => offset,
        }
    }

    /// Returns true if the stream itself is malformed, as opposed to
    /// well-formed but rejected by a configured limit
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCount { .. }
                | Self::MissingLiteral { .. }
                | Self::DanglingEscape { .. }
                | Self::CountOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::missing_count(4);
        assert!(err.to_string().contains("missing count"));
        assert!(err.to_string().contains('4'));

        let err = DecodeError::missing_literal(1);
        assert!(err.to_string().contains("count not followed by character"));

        let err = DecodeError::dangling_escape(1);
        assert!(err.to_string().contains("escape at end of stream"));
    }

    #[test]
    fn test_offset() {
        assert_eq!(DecodeError::run_too_long(7, 100, 10).offset(), 7);
        assert_eq!(DecodeError::output_too_large(3, 64).offset(), 3);
    }

    #[test]
    fn test_is_format_error() {
        assert!(DecodeError::dangling_escape(0).is_format_error());
        assert!(DecodeError::count_overflow(0).is_format_error());
        assert!(!DecodeError::run_too_long(0, 2, 1).is_format_error());
    }
}
