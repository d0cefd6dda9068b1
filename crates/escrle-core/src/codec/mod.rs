//! Run-length encoding and decoding.
//!
//! ## Algorithm Overview
//!
//! Encoding:
//! 1. Split the input into maximal runs of one repeated character
//! 2. Emit each run as a [`Token`]: count, optional escape marker, literal
//!
//! Decoding reverses this one token at a time:
//! 1. Read the maximal sequence of ASCII digits as the count
//! 2. Read the literal, unwrapping it if it is preceded by the escape marker
//! 3. Append the literal `count` times
//!
//! Decoding fails fast on the first malformed token and produces no output.
//!
//! ## Extensibility
//!
//! The [`TextCodec`] trait lets front ends work against any text codec:
//!
//! ```
//! use escrle_core::{RunLengthCodec, TextCodec};
//!
//! let codec = RunLengthCodec::new();
//! let packed = codec.encode("aaab");
//! assert_eq!(packed, "3a1b");
//! assert_eq!(codec.decode(&packed)?, "aaab");
//! # Ok::<(), escrle_core::DecodeError>(())
//! ```

mod token;

use crate::error::{DecodeError, Result};
use std::fmt::Write as _;
use tracing::{debug, trace};

pub use token::{needs_escape, runs, Run, Runs, Token, ESCAPE_MARKER};

/// Encodes `text` into a run-length stream.
///
/// Never fails. Empty input produces an empty stream.
pub fn encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for run in runs(text) {
        // Writing into a String is infallible
        let _ = write!(encoded, "{}", run.to_token());
    }
    encoded
}

/// Decodes a run-length stream with the default [`DecoderConfig`].
///
/// See [`Decoder::decode`] for the error conditions.
pub fn decode(stream: &str) -> Result<String> {
    Decoder::new().decode(stream)
}

/// Limits applied while decoding untrusted streams
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest count accepted for a single token (None = unlimited)
    pub max_run_length: Option<u64>,
    /// Largest decoded output in bytes (None = unlimited)
    pub max_output_len: Option<usize>,
}

impl DecoderConfig {
    /// Creates a new decoder config with no limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum count accepted for a single token
    pub fn max_run_length(mut self, max: u64) -> Self {
        self.max_run_length = Some(max);
        self
    }

    /// Sets the maximum decoded output size in bytes
    pub fn max_output_len(mut self, limit: usize) -> Self {
        self.max_output_len = Some(limit);
        self
    }
}

/// Stream decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a new decoder with default configuration
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
        }
    }

    /// Creates a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes `stream` back into the original text.
    ///
    /// Positions reported in errors count characters from the start of the
    /// stream. Counts with leading zeros are accepted, and a zero count
    /// expands to nothing.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MissingCount`] if a token does not start with a digit
    /// - [`DecodeError::MissingLiteral`] if the stream ends after a count
    /// - [`DecodeError::DanglingEscape`] if the stream ends after an escape marker
    /// - [`DecodeError::CountOverflow`] if a count does not fit in memory
    /// - [`DecodeError::RunTooLong`] / [`DecodeError::OutputTooLarge`] if a
    ///   configured limit is exceeded
    pub fn decode(&self, stream: &str) -> Result<String> {
        let mut decoded = String::with_capacity(stream.len());
        let mut chars = stream.chars().peekable();
        let mut position = 0;
        let mut tokens = 0usize;

        while chars.peek().is_some() {
            let token_start = position;

            // Count: maximal run of ASCII digits, accumulated with overflow checks
            let mut count = Some(0u64);
            let mut digits = 0;
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                count = count
                    .and_then(|c| c.checked_mul(10))
                    .and_then(|c| c.checked_add(u64::from(digit as u8 - b'0')));
                digits += 1;
            }
            if digits == 0 {
                return Err(DecodeError::missing_count(token_start));
            }
            position += digits;
            let count = count.ok_or_else(|| DecodeError::count_overflow(token_start))?;

            // Literal, possibly behind an escape marker
            let literal = match chars.next() {
                None => return Err(DecodeError::missing_literal(position)),
                Some(ESCAPE_MARKER) => {
                    let escape_at = position;
                    let ch = chars
                        .next()
                        .ok_or_else(|| DecodeError::dangling_escape(escape_at))?;
                    position += 2;
                    ch
                }
                Some(ch) => {
                    position += 1;
                    ch
                }
            };

            let repeat = self.check_limits(token_start, count, literal, decoded.len())?;
            trace!(
                "Token {} at position {}: {} x {:?}",
                tokens,
                token_start,
                count,
                literal
            );
            decoded.extend(std::iter::repeat(literal).take(repeat));
            tokens += 1;
        }

        debug!(
            "Decoded {} token(s): {} bytes -> {} bytes",
            tokens,
            stream.len(),
            decoded.len()
        );

        Ok(decoded)
    }

    /// Validates a token against the configured limits and returns the
    /// number of repetitions to append
    fn check_limits(
        &self,
        offset: usize,
        count: u64,
        literal: char,
        current_len: usize,
    ) -> Result<usize> {
        if let Some(max) = self.config.max_run_length {
            if count > max {
                debug!("Rejecting run of {} at position {} (max {})", count, offset, max);
                return Err(DecodeError::run_too_long(offset, count, max));
            }
        }

        let repeat = usize::try_from(count).map_err(|_| DecodeError::count_overflow(offset))?;
        let total_len = repeat
            .checked_mul(literal.len_utf8())
            .and_then(|bytes| bytes.checked_add(current_len))
            .ok_or_else(|| DecodeError::count_overflow(offset))?;

        if let Some(limit) = self.config.max_output_len {
            if total_len > limit {
                debug!(
                    "Rejecting token at position {}: output would reach {} bytes (limit {})",
                    offset, total_len, limit
                );
                return Err(DecodeError::output_too_large(offset, limit));
            }
        }

        Ok(repeat)
    }
}

/// Trait for text codecs usable by front ends
pub trait TextCodec: Send + Sync {
    /// Short human-readable name of the codec
    fn name(&self) -> &str;

    /// Encode text. Never fails.
    fn encode(&self, text: &str) -> String;

    /// Decode a stream previously produced by [`TextCodec::encode`]
    fn decode(&self, stream: &str) -> Result<String>;
}

/// Escaped run-length codec
#[derive(Debug, Clone, Default)]
pub struct RunLengthCodec {
    decoder: Decoder,
}

impl RunLengthCodec {
    /// Creates a new codec with an unrestricted decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new codec whose decoder enforces `config`
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            decoder: Decoder::with_config(config),
        }
    }

    /// Returns the decoder used by [`TextCodec::decode`]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}

impl TextCodec for RunLengthCodec {
    fn name(&self) -> &str {
        "rle"
    }

    fn encode(&self, text: &str) -> String {
        encode(text)
    }

    fn decode(&self, stream: &str) -> Result<String> {
        self.decoder.decode(stream)
    }
}
