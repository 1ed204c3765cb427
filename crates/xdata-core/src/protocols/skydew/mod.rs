//! SKYDEW chilled-mirror hygrometer decoding.
//!
//! Each frame carries one slow-changing parameter (serial number, one of
//! four mirror temperature coefficients, or firmware version) selected by
//! the trailing type byte. How that parameter populates the output slots is
//! governed by [`SkydewSlotMode`].

pub mod layout;
pub mod parser;

pub use parser::{SkydewParameter, SkydewRecord, SkydewSlotMode, parse_skydew};
