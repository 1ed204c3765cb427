use tracing::debug;

use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

#[derive(Debug, Clone, PartialEq)]
pub struct CobaldRecord {
    pub instrument_number: Option<i64>,
    pub sonde_number: Option<i64>,
    /// Internal temperature, °C.
    pub internal_temperature: f64,
    pub blue_backscatter: Option<i64>,
    pub red_backscatter: Option<i64>,
    pub blue_monitor: Option<i64>,
    pub red_monitor: Option<i64>,
}

/// Decode one COBALD segment (exactly 30 hex chars, type code `19`).
pub fn parse_cobald(segment: &str) -> Option<CobaldRecord> {
    let reader = HexReader::checked(segment)?;
    if reader.len() != layout::LEN {
        debug!(len = reader.len(), "COBALD segment has wrong length");
        return None;
    }
    if !reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
    {
        debug!("COBALD segment has wrong type code");
        return None;
    }

    Some(CobaldRecord {
        instrument_number: reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE),
        sonde_number: reader.unsigned_opt(layout::SONDE_NUMBER_RANGE),
        internal_temperature: round_dp(
            reader.signed_or_nan(layout::INTERNAL_TEMP_RANGE) / layout::INTERNAL_TEMP_DIVISOR,
            2,
        ),
        blue_backscatter: reader.signed_opt(layout::BLUE_BACKSCATTER_RANGE),
        red_backscatter: reader.signed_opt(layout::RED_BACKSCATTER_RANGE),
        blue_monitor: reader.signed_opt(layout::BLUE_MONITOR_RANGE),
        red_monitor: reader.signed_opt(layout::RED_MONITOR_RANGE),
    })
}

impl XdataFields for CobaldRecord {
    fn write_fields(&self, out: &mut FieldMap) {
        put(out, "cobald_instrument_number", self.instrument_number);
        put(out, "cobald_sonde_number", self.sonde_number);
        put(out, "cobald_internal_temperature", self.internal_temperature);
        put(out, "cobald_blue_backscatter", self.blue_backscatter);
        put(out, "cobald_red_backscatter", self.red_backscatter);
        put(out, "cobald_blue_monitor", self.blue_monitor);
        put(out, "cobald_red_monitor", self.red_monitor);
    }
}
