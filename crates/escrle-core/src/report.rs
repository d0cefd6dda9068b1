//! Size reporting for encoded output.

use std::fmt;

/// Byte sizes of a text before and after encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeReport {
    /// Size of the original text in UTF-8 bytes
    pub original_bytes: usize,
    /// Size of the encoded stream in UTF-8 bytes
    pub encoded_bytes: usize,
}

impl SizeReport {
    /// Measures an original text and its encoded form
    pub fn new(original: &str, encoded: &str) -> Self {
        Self {
            original_bytes: original.len(),
            encoded_bytes: encoded.len(),
        }
    }

    /// Percentage saved relative to the original.
    ///
    /// Negative when encoding grew the text. `None` for an empty original.
    pub fn reduction_percent(&self) -> Option<f64> {
        if self.original_bytes == 0 {
            return None;
        }
        Some(100.0 - (self.encoded_bytes as f64 / self.original_bytes as f64) * 100.0)
    }

    /// Returns true if the encoded form is smaller than the original
    pub fn is_smaller(&self) -> bool {
        self.encoded_bytes < self.original_bytes
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes -> {} bytes",
            self.original_bytes, self.encoded_bytes
        )?;
        if let Some(pct) = self.reduction_percent() {
            write!(f, " ({:.2}% reduction)", pct)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reduction() {
        let text = "a".repeat(100);
        let report = SizeReport::new(&text, &encode(&text));
        assert_eq!(report.encoded_bytes, 4);
        assert_eq!(report.reduction_percent(), Some(96.0));
        assert!(report.is_smaller());
        assert_eq!(report.to_string(), "100 bytes -> 4 bytes (96.00% reduction)");
    }

    #[test]
    fn test_growth_is_negative() {
        let report = SizeReport::new("ab", &encode("ab"));
        assert_eq!(report.encoded_bytes, 4);
        assert_eq!(report.reduction_percent(), Some(-100.0));
        assert!(!report.is_smaller());
    }

    #[test]
    fn test_empty_original() {
        let report = SizeReport::new("", "");
        assert_eq!(report.reduction_percent(), None);
        assert_eq!(report.to_string(), "0 bytes -> 0 bytes");
    }
}
