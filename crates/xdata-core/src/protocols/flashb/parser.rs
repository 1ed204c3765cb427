use tracing::{debug, trace};

use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

#[derive(Debug, Clone, PartialEq)]
pub struct FlashbRecord {
    pub instrument_number: Option<i64>,
    pub photomultiplier_counts: Option<i64>,
    pub photomultiplier_background_counts: Option<i64>,
    /// Photomultiplier temperature, °C.
    pub photomultiplier_temperature: f64,
    /// Battery voltage, V.
    pub battery_voltage: f64,
    /// YUV lamp current, mA.
    pub yuv_current: f64,
    /// Photomultiplier high voltage, V.
    pub photomultiplier_voltage: f64,
    pub firmware_version: f64,
    pub production_year: Option<i64>,
    pub hardware_version: Option<i64>,
}

/// Decode one FLASH-B segment (exactly 35 hex chars, type code `3D`).
///
/// `pressure` (hPa) and `temperature` (°C) are accepted for the water vapour
/// derivation, which is not computed.
pub fn parse_flashb(segment: &str, pressure: f64, temperature: f64) -> Option<FlashbRecord> {
    let reader = HexReader::checked(segment)?;
    if reader.len() != layout::LEN {
        debug!(len = reader.len(), "FLASH-B segment has wrong length");
        return None;
    }
    if !reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
    {
        debug!("FLASH-B segment has wrong type code");
        return None;
    }

    let record = FlashbRecord {
        instrument_number: reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE),
        photomultiplier_counts: reader.unsigned_opt(layout::PMT_COUNTS_RANGE),
        photomultiplier_background_counts: reader.unsigned_opt(layout::PMT_BACKGROUND_RANGE),
        photomultiplier_temperature: round_dp(
            pmt_temperature(reader.unsigned_or_nan(layout::PMT_TEMPERATURE_RANGE)),
            2,
        ),
        battery_voltage: round_dp(
            reader.unsigned_or_nan(layout::BATTERY_RANGE) * layout::BATTERY_SCALE,
            2,
        ),
        yuv_current: round_dp(
            reader.unsigned_or_nan(layout::YUV_CURRENT_RANGE) * layout::YUV_CURRENT_SCALE,
            3,
        ),
        photomultiplier_voltage: round_dp(
            reader.unsigned_or_nan(layout::PMT_VOLTAGE_RANGE) * layout::PMT_VOLTAGE_SCALE,
            1,
        ),
        firmware_version: round_dp(
            reader.unsigned_or_nan(layout::FIRMWARE_RANGE) * layout::FIRMWARE_SCALE,
            1,
        ),
        production_year: reader
            .unsigned_opt(layout::PRODUCTION_YEAR_RANGE)
            .map(|year| year + layout::PRODUCTION_YEAR_BASE),
        hardware_version: reader.unsigned_opt(layout::HARDWARE_VERSION_RANGE),
    };

    if water_vapour(&record, pressure, temperature).is_none() {
        trace!("FLASH-B water vapour not derived");
    }
    Some(record)
}

/// Photomultiplier temperature in °C from its raw 12-bit ADC code.
pub fn pmt_temperature(raw: f64) -> f64 {
    let ratio = (layout::PMT_TEMP_K1 * raw) / (layout::PMT_TEMP_VREF - layout::PMT_TEMP_K2 * raw);
    layout::PMT_TEMP_A * ratio.ln() + layout::PMT_TEMP_B
}

/// Water vapour mixing ratio; not derivable without reference calibration.
// TODO: derive mixing ratio once FLASH-B reference calibration coefficients are published.
pub fn water_vapour(_record: &FlashbRecord, _pressure: f64, _temperature: f64) -> Option<f64> {
    None
}

impl XdataFields for FlashbRecord {
    fn write_fields(&self, out: &mut FieldMap) {
        put(out, "flashb_instrument_number", self.instrument_number);
        put(out, "flashb_photomultiplier_counts", self.photomultiplier_counts);
        put(
            out,
            "flashb_photomultiplier_background_counts",
            self.photomultiplier_background_counts,
        );
        put(
            out,
            "flashb_photomultiplier_temperature",
            self.photomultiplier_temperature,
        );
        put(out, "flashb_battery_voltage", self.battery_voltage);
        put(out, "flashb_yuv_current", self.yuv_current);
        put(
            out,
            "flashb_photomultiplier_voltage",
            self.photomultiplier_voltage,
        );
        put(out, "flashb_firmware_version", self.firmware_version);
        put(out, "flashb_production_year", self.production_year);
        put(out, "flashb_hardware_version", self.hardware_version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3D0200E2000140700062005DA0BF6171703";

    #[test]
    fn parse_valid_flashb() {
        let record = parse_flashb(SAMPLE, 1100.0, 20.0).unwrap();
        assert_eq!(record.instrument_number, Some(2));
        assert_eq!(record.photomultiplier_counts, Some(0x0e20));
        assert_eq!(record.photomultiplier_background_counts, Some(0x0014));
        assert_eq!(record.photomultiplier_temperature, 30.63);
        assert_eq!(record.battery_voltage, 8.13);
        assert_eq!(record.yuv_current, 15.233);
        assert_eq!(record.photomultiplier_voltage, 1131.9);
        assert_eq!(record.firmware_version, 2.3);
        assert_eq!(record.production_year, Some(2023));
        assert_eq!(record.hardware_version, Some(3));
    }

    #[test]
    fn zero_pmt_code_is_not_finite() {
        assert!(!pmt_temperature(0.0).is_finite());
    }

    #[test]
    fn water_vapour_is_not_derived() {
        let record = parse_flashb(SAMPLE, 500.0, -20.0).unwrap();
        assert_eq!(water_vapour(&record, 500.0, -20.0), None);
        assert!(!record.to_fields().keys().any(|key| key.contains("vapour")));
    }

    #[test]
    fn reject_wrong_length() {
        assert!(parse_flashb(&SAMPLE[..34], 1100.0, 20.0).is_none());
    }

    #[test]
    fn reject_wrong_prefix() {
        let segment = format!("3E{}", &SAMPLE[2..]);
        assert!(parse_flashb(&segment, 1100.0, 20.0).is_none());
    }
}
