//! FLASH-B Lyman-alpha hygrometer decoding.
//!
//! Only the raw housekeeping and photomultiplier values are decoded. The
//! water vapour mixing ratio needs per-instrument reference calibration that
//! is not available, so [`parser::water_vapour`] always yields `None`.

pub mod layout;
pub mod parser;

pub use parser::{FlashbRecord, parse_flashb};
