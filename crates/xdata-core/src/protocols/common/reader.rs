use std::ops::Range;

use tracing::{debug, trace};

use super::error::FieldError;

/// Fixed-offset reader over one hex-encoded XDATA segment.
///
/// Offsets and ranges are expressed in hex characters, not bytes, because
/// several instruments pack fields on nibble boundaries (3 or 5 chars).
pub struct HexReader<'a> {
    segment: &'a str,
}

impl<'a> HexReader<'a> {
    pub fn new(segment: &'a str) -> Self {
        Self { segment }
    }

    /// Reader for a segment that must be plain ASCII. A segment carrying any
    /// other character is structurally invalid and yields `None`.
    pub fn checked(segment: &'a str) -> Option<Self> {
        if !segment.is_ascii() {
            debug!(segment, "segment contains non-ASCII characters");
            return None;
        }
        Some(Self::new(segment))
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.segment.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    pub fn read_str(&self, range: Range<usize>) -> Result<&'a str, FieldError> {
        self.segment
            .get(range.clone())
            .ok_or(FieldError::TooShort {
                needed: range.end,
                actual: self.len(),
            })
    }

    /// Big-endian unsigned value of the field.
    pub fn read_unsigned(&self, range: Range<usize>) -> Result<u64, FieldError> {
        let text = self.read_str(range.clone())?;
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FieldError::NonHex {
                range,
                text: text.to_string(),
            });
        }
        u64::from_str_radix(text, 16).map_err(|_| FieldError::NonHex {
            range,
            text: text.to_string(),
        })
    }

    /// Two's-complement value of the field; the sign bit is the top bit of
    /// the `4 * width` bit field.
    pub fn read_signed(&self, range: Range<usize>) -> Result<i64, FieldError> {
        let bits = (range.end - range.start) as u32 * 4;
        let raw = self.read_unsigned(range)?;
        Ok(twos_complement(raw, bits))
    }

    /// Unsigned field as `f64`, `NaN` when the field is missing or not hex.
    pub fn unsigned_or_nan(&self, range: Range<usize>) -> f64 {
        match self.read_unsigned(range) {
            Ok(raw) => raw as f64,
            Err(err) => {
                trace!(error = %err, "field decode failed");
                f64::NAN
            }
        }
    }

    /// Signed field as `f64`, `NaN` when the field is missing or not hex.
    pub fn signed_or_nan(&self, range: Range<usize>) -> f64 {
        match self.read_signed(range) {
            Ok(raw) => raw as f64,
            Err(err) => {
                trace!(error = %err, "field decode failed");
                f64::NAN
            }
        }
    }

    /// Unsigned integer field, `None` when the field is missing or not hex.
    pub fn unsigned_opt(&self, range: Range<usize>) -> Option<i64> {
        match self.read_unsigned(range) {
            Ok(raw) => i64::try_from(raw).ok(),
            Err(err) => {
                trace!(error = %err, "field decode failed");
                None
            }
        }
    }

    /// Signed integer field, `None` when the field is missing or not hex.
    pub fn signed_opt(&self, range: Range<usize>) -> Option<i64> {
        match self.read_signed(range) {
            Ok(raw) => Some(raw),
            Err(err) => {
                trace!(error = %err, "field decode failed");
                None
            }
        }
    }
}

pub(crate) fn twos_complement(raw: u64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit != 0 {
        raw as i64 - (1i64 << bits)
    } else {
        raw as i64
    }
}

/// Round to `dp` decimal places with halves going toward positive infinity.
pub(crate) fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor + 0.5).floor() / factor
}
