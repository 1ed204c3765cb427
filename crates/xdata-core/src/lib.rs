//! XDATA decoder for radiosonde auxiliary instruments.
//!
//! Radiosonde telemetry frames may carry an `xdata` string: hex-encoded
//! readings from auxiliary scientific instruments (ozone sounders,
//! frost-point hygrometers, backscatter detectors), several of which can be
//! concatenated with `#`. This crate turns such a payload into a flat,
//! instrument-prefixed field mapping plus the list of recognized
//! instruments.
//!
//! The pipeline is dispatcher -> per-instrument decoders (layout/parser) ->
//! merged result. Decoding is pure and side-effect free; no state is shared
//! between calls, so payloads can be decoded from any number of threads.
//!
//! Invariants:
//! - Decoding never fails. Wrong type code or length yields no fields for
//!   that segment; undecodable hex yields a `NaN` field.
//! - Field names carry an instrument prefix (`oif411_`, `cfh_`, ...), so
//!   segments from different instruments never collide.
//! - `xdata_instrument` lists each recognized instrument once, in
//!   first-seen order, including instruments without a field decoder.
//!
//! # Examples
//! ```
//! use xdata_core::{DEFAULT_PRESSURE_HPA, decode};
//!
//! let result = decode("0501034F02C978A06300", DEFAULT_PRESSURE_HPA, 20.0);
//! assert_eq!(result.instrument_label(), "OIF411");
//!
//! let json = serde_json::to_value(&result)?;
//! assert_eq!(json["oif411_ozone_pump_temp"], 8.47);
//! assert_eq!(json["xdata_instrument"][0], "OIF411");
//! # Ok::<(), serde_json::Error>(())
//! ```

mod dispatch;
mod fields;
pub mod protocols;
pub mod record;

pub use dispatch::{
    DecodeOptions, DecodeResult, IGNORED_TYPE_CODE, Instrument, SEGMENT_DELIMITER, decode,
    decode_with,
};
pub use fields::{FieldMap, FieldValue, XdataFields};
pub use protocols::oif411::correction_factor;
pub use protocols::skydew::SkydewSlotMode;

/// Ambient pressure (hPa) assumed when a telemetry record has no measured
/// pressure. At this pressure the pump efficiency correction is 1.0.
pub const DEFAULT_PRESSURE_HPA: f64 = 1100.0;
