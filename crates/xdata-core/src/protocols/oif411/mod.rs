//! OIF411 ozone sounder decoding.
//!
//! Two record shapes share the `05` type code and are told apart by length:
//! 21 hex chars carry identification (serial, diagnostics, firmware), 20 hex
//! chars carry a measurement. Measurements additionally derive the ozone
//! partial pressure, corrected for pump efficiency at the ambient pressure
//! through the `calibration` curve.

pub mod calibration;
pub mod layout;
pub mod parser;

pub use calibration::correction_factor;
pub use parser::{Oif411Identification, Oif411Measurement, Oif411Record, parse_oif411};
