use tracing::debug;

use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

#[derive(Debug, Clone, PartialEq)]
pub struct CfhRecord {
    pub instrument_number: Option<i64>,
    /// Mirror temperature, °C.
    pub mirror_temperature: f64,
    /// Optics voltage, V.
    pub optics_voltage: f64,
    /// Optics temperature, °C.
    pub optics_temperature: f64,
    /// Battery voltage, V.
    pub battery: f64,
}

/// Decode one CFH segment (exactly 24 hex chars, type code `08`).
pub fn parse_cfh(segment: &str) -> Option<CfhRecord> {
    let reader = HexReader::checked(segment)?;
    if reader.len() != layout::LEN {
        debug!(len = reader.len(), "CFH segment has wrong length");
        return None;
    }
    if !reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
    {
        debug!("CFH segment has wrong type code");
        return None;
    }

    Some(CfhRecord {
        instrument_number: reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE),
        mirror_temperature: round_dp(
            reader.signed_or_nan(layout::MIRROR_TEMP_RANGE) * layout::MIRROR_TEMP_SCALE,
            5,
        ),
        optics_voltage: round_dp(
            reader.unsigned_or_nan(layout::OPTICS_VOLTAGE_RANGE) * layout::OPTICS_VOLTAGE_SCALE,
            6,
        ),
        optics_temperature: round_dp(
            reader.signed_or_nan(layout::OPTICS_TEMP_RANGE) * layout::OPTICS_TEMP_SCALE,
            2,
        ),
        battery: round_dp(
            reader.unsigned_or_nan(layout::BATTERY_RANGE) * layout::BATTERY_SCALE,
            2,
        ),
    })
}

impl XdataFields for CfhRecord {
    fn write_fields(&self, out: &mut FieldMap) {
        put(out, "cfh_instrument_number", self.instrument_number);
        put(out, "cfh_mirror_temperature", self.mirror_temperature);
        put(out, "cfh_optics_voltage", self.optics_voltage);
        put(out, "cfh_optics_temperature", self.optics_temperature);
        put(out, "cfh_battery", self.battery);
    }
}
