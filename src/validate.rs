//! Output validation
//!
//! A payload is only cached (or reused) if it matches the invocation's
//! validator pattern. Matching is "found anywhere in the text", with
//! multiline anchors and a dot that crosses newlines, so `^x` accepts
//! any output containing a line starting with `x`.

use crate::error::{RuncachedError, RuncachedResult};
use regex::{Regex, RegexBuilder};

/// Compiled acceptance check for produced output
#[derive(Debug, Clone)]
pub struct Validator {
    pattern: String,
    regex: Regex,
}

impl Validator {
    /// Compile a pattern; done once per invocation
    pub fn new(pattern: &str) -> RuncachedResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| RuncachedError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check whether the text contains a match.
    ///
    /// The empty string never validates: an empty payload is the
    /// "no record" sentinel, not a real response.
    pub fn is_match(&self, text: &str) -> bool {
        !text.is_empty() && self.regex.is_match(text)
    }

    /// The original pattern text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
