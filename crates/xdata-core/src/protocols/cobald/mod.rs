//! COBALD backscatter sonde decoding.
//!
//! Raw detector values are reported as-is; only the internal temperature is
//! scaled (1/8 °C per count).

pub mod layout;
pub mod parser;

pub use parser::{CobaldRecord, parse_cobald};
