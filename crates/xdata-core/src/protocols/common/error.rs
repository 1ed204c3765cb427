use std::ops::Range;

use thiserror::Error;

/// Errors returned when a fixed-width hex field cannot be decoded.
///
/// # Examples
/// ```
/// use xdata_core::protocols::common::error::FieldError;
///
/// let err = FieldError::TooShort { needed: 8, actual: 6 };
/// assert!(err.to_string().contains("segment too short"));
///
/// let err = FieldError::NonHex { range: 2..4, text: "R2".to_string() };
/// assert_eq!(err.to_string(), "non-hex characters at 2..4: \"R2\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("segment too short: need {needed} hex chars, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("non-hex characters at {range:?}: {text:?}")]
    NonHex { range: Range<usize>, text: String },
}
