//! Per-instrument XDATA decoders.
//!
//! Each instrument follows a layered structure:
//! - `layout`: hex-char offsets, lengths and scale constants (source of truth)
//! - `parser`: validation and domain-level decoding into a typed record
//!
//! Shared fixed-width hex access lives in `common::reader`. Parsers are pure
//! and never fail: structural rejection (wrong type code or length) is
//! `None`, and an undecodable field becomes `NaN` inside an otherwise valid
//! record.

pub mod cfh;
pub mod cobald;
pub mod common;
pub mod flashb;
pub mod oif411;
pub mod pcfh;
pub mod skydew;
