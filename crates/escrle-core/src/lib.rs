//! # escrle-core
//!
//! A lossless run-length codec for text.
//!
//! Runs of identical characters are written as `<count><char>` tokens with
//! no separators. Digits and the backslash would be ambiguous in the literal
//! slot, so they are preceded by a backslash escape:
//!
//! | text    | encoded      |
//! |---------|--------------|
//! | `aaab`  | `3a1b`       |
//! | `5`     | `1\5`        |
//! | `\`     | `1\\`        |
//!
//! ## Architecture
//!
//! - [`codec`]: Encoder, decoder and the token format
//! - [`report`]: Size reporting over encoded output
//! - [`error`]: Decode error types
//!
//! A character is one Unicode scalar value (`char`). Multi-byte characters
//! form runs like any other character and are never split.
//!
//! ## Example
//!
//! ```
//! use escrle_core::{decode, encode};
//!
//! let packed = encode("zzzz 2000");
//! assert_eq!(packed, "4z1 1\\23\\0");
//! assert_eq!(decode(&packed)?, "zzzz 2000");
//! # Ok::<(), escrle_core::DecodeError>(())
//! ```
//!
//! ## Untrusted input
//!
//! A short stream can claim a huge count. Use [`DecoderConfig`] to bound what
//! a single decode call may allocate:
//!
//! ```
//! use escrle_core::{Decoder, DecoderConfig};
//!
//! let decoder = Decoder::with_config(DecoderConfig::new().max_run_length(1 << 20));
//! assert!(decoder.decode("999999999x").is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod codec;
pub mod error;
pub mod report;

// Re-export primary types for convenience
pub use codec::{
    decode, encode, needs_escape, runs, Decoder, DecoderConfig, Run, RunLengthCodec, TextCodec,
    Token, ESCAPE_MARKER,
};
pub use error::{DecodeError, Result};
pub use report::SizeReport;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
