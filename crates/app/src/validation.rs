//! Request payload validation.
//!
//! Every check appends a human-readable message rather than failing fast, so
//! callers can report all problems with a payload at once.

use std::fmt::{self, Display, Formatter};

use smallvec::SmallVec;
use thiserror::Error;

/// Collected validation failures for a single payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    messages: SmallVec<[String; 4]>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set holding a single message.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        let mut errors = Self::new();

        errors.push(message);

        errors
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages.into_vec()
    }

    /// Convert into a result, succeeding when nothing was collected.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one message was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Check a string's trimmed length falls within `min..=max` characters.
    pub fn check_length(&mut self, value: &str, min: usize, max: usize, too_short: &str, too_long: &str) {
        let length = value.trim().chars().count();

        if length < min {
            self.push(too_short);
        } else if length > max {
            self.push(too_long);
        }
    }

    /// Check a string is non-empty once trimmed.
    pub fn check_present(&mut self, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(message);
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join("; "))
    }
}

/// Indian postal index number: six digits, not starting with zero.
#[must_use]
pub fn is_valid_pincode(value: &str) -> bool {
    let bytes = value.as_bytes();

    bytes.len() == 6
        && bytes.iter().all(u8::is_ascii_digit)
        && bytes.first().is_some_and(|first| *first != b'0')
}
