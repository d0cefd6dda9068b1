//! Token-level format of the encoded stream.
//!
//! ## Stream Format
//!
//! An encoded stream is a plain concatenation of tokens with no separators.
//! Each token is:
//! - The run length in decimal, with no leading zeros
//! - An escape marker (`\`) if the literal is a digit or the marker itself
//! - The literal character
//!
//! Counts are always anchored at the start of a token and the escape keeps
//! digits out of the literal slot, so the stream parses without lookahead.
//!
//! A "character" here is one Unicode scalar value. Multi-byte UTF-8
//! sequences are never split, so `"éé"` is a single run of length 2.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Marker placed before a literal that would otherwise read as part of a count
pub const ESCAPE_MARKER: char = '\\';

/// Returns true if `ch` must be preceded by [`ESCAPE_MARKER`] in the literal slot
#[inline]
pub fn needs_escape(ch: char) -> bool {
    ch.is_ascii_digit() || ch == ESCAPE_MARKER
}

/// A maximal run of one repeated character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// The repeated character
    pub ch: char,
    /// Number of repetitions, always at least 1
    pub len: usize,
}

impl Run {
    /// Converts the run into the token that encodes it
    pub fn to_token(self) -> Token {
        Token::new(self.len as u64, self.ch)
    }
}

/// Iterator over the maximal runs of a string
///
/// Created by [`runs`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Iterator for Runs<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let ch = self.chars.next()?;
        let mut len = 1;
        while self.chars.next_if_eq(&ch).is_some() {
            len += 1;
        }
        Some(Run { ch, len })
    }
}

/// Splits `text` into maximal runs, left to right
pub fn runs(text: &str) -> Runs<'_> {
    Runs {
        chars: text.chars().peekable(),
    }
}

/// One encoded unit: a count and the literal it repeats
///
/// The `Display` impl writes the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Repetition count
    pub count: u64,
    /// The literal character
    pub literal: char,
}

impl Token {
    /// Creates a new token
    pub fn new(count: u64, literal: char) -> Self {
        Self { count, literal }
    }

    /// Returns true if the literal is written with an escape marker
    pub fn is_escaped(&self) -> bool {
        needs_escape(self.literal)
    }

    /// Length of the serialized token in bytes
    pub fn encoded_len(&self) -> usize {
        let digits = self.count.checked_ilog10().map_or(1, |d| d as usize + 1);
        let escape = if self.is_escaped() {
            ESCAPE_MARKER.len_utf8()
        } else {
            0
        };
        digits + escape + self.literal.len_utf8()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_escaped() {
            write!(f, "{}{}{}", self.count, ESCAPE_MARKER, self.literal)
        } else {
            write!(f, "{}{}", self.count, self.literal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_escape() {
        for ch in '0'..='9' {
            assert!(needs_escape(ch));
        }
        assert!(needs_escape('\\'));
        assert!(!needs_escape('a'));
        assert!(!needs_escape(' '));
        assert!(!needs_escape('\n'));
        // Non-ASCII digits are ordinary literals
        assert!(!needs_escape('٣'));
    }

    #[test]
    fn test_runs_basic() {
        let found: Vec<Run> = runs("aaab").collect();
        assert_eq!(
            found,
            vec![Run { ch: 'a', len: 3 }, Run { ch: 'b', len: 1 }]
        );
    }

    #[test]
    fn test_runs_empty() {
        assert_eq!(runs("").count(), 0);
    }

    #[test]
    fn test_runs_multibyte() {
        let found: Vec<Run> = runs("ééx🦀🦀").collect();
        assert_eq!(
            found,
            vec![
                Run { ch: 'é', len: 2 },
                Run { ch: 'x', len: 1 },
                Run { ch: '🦀', len: 2 },
            ]
        );
    }

    #[test]
    fn test_runs_non_adjacent_repeats() {
        let found: Vec<Run> = runs("abab").collect();
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|r| r.len == 1));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(3, 'a').to_string(), "3a");
        assert_eq!(Token::new(1, '5').to_string(), "1\\5");
        assert_eq!(Token::new(12, '\\').to_string(), "12\\\\");
        assert_eq!(Token::new(1000, 'z').to_string(), "1000z");
    }

    #[test]
    fn test_token_encoded_len() {
        for token in [
            Token::new(1, 'a'),
            Token::new(9, '7'),
            Token::new(10, '\\'),
            Token::new(1000, 'é'),
            Token::new(u64::MAX, '🦀'),
        ] {
            assert_eq!(token.encoded_len(), token.to_string().len());
        }
    }

    #[test]
    fn test_run_to_token() {
        let token = Run { ch: '0', len: 4 }.to_token();
        assert_eq!(token, Token::new(4, '0'));
        assert!(token.is_escaped());
    }
}
