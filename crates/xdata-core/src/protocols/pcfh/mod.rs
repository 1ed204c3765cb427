//! PCFH Peltier-cooled frost-point hygrometer decoding.
//!
//! PCFH multiplexes several sub-packets behind one type code. The byte at
//! offset 4 selects the sub-packet:
//! - `00`: identification (serial number and four component dates)
//! - `01`/`02`: per-second readings of frost-point sensor 1 or 2
//! - `03`: five-second temperature block
//! - `04`: status block (clean reflectances and supply voltages)
//!
//! Sensor readings carry the sub-packet id as a field-name suffix so both
//! sensors can coexist in one merged result.

pub mod layout;
pub mod parser;

pub use parser::{PcfhPacket, PcfhRecord, parse_pcfh};
