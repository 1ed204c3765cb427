use tracing::debug;

use super::calibration::correction_factor;
use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

#[derive(Debug, Clone, PartialEq)]
pub enum Oif411Record {
    Identification(Oif411Identification),
    Measurement(Oif411Measurement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Oif411Identification {
    pub instrument_number: Option<i64>,
    pub serial: Option<String>,
    pub diagnostics: Oif411Diagnostics,
    /// Firmware version formatted with two decimals, e.g. `"1.10"`.
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Oif411Measurement {
    pub instrument_number: Option<i64>,
    /// Pump temperature, °C.
    pub pump_temp: f64,
    /// Ozone cell current, µA.
    pub ozone_current_ua: f64,
    /// Battery voltage, V.
    pub battery_v: f64,
    /// Pump motor current, mA.
    pub pump_current_ma: f64,
    /// External voltage, V.
    pub ext_voltage: f64,
    /// Ozone partial pressure, mPa.
    pub o3_partial_pressure: f64,
}

/// Diagnostics word carried by identification records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Oif411Diagnostics {
    AllOk,
    PumpTempLow,
    BatteryNotConnected,
    PumpTempLowAndBatteryNotConnected,
    Unknown(String),
}

impl Oif411Diagnostics {
    pub fn from_word(word: &str) -> Self {
        match word {
            "0000" => Self::AllOk,
            "0004" => Self::PumpTempLow,
            "0400" => Self::BatteryNotConnected,
            "0404" => Self::PumpTempLowAndBatteryNotConnected,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::AllOk => "All OK".to_string(),
            Self::PumpTempLow => "Ozone pump temperature below −5 °C.".to_string(),
            Self::BatteryNotConnected => {
                "Ozone pump battery voltage (+VBatt) is not connected to OIF411".to_string()
            }
            Self::PumpTempLowAndBatteryNotConnected => {
                "Ozone pump temp low, and +VBatt not connected.".to_string()
            }
            Self::Unknown(word) => format!("Unknown State: {word}"),
        }
    }
}

/// Decode one OIF411 segment.
///
/// Returns `None` when the segment is shorter than 20 chars, does not start
/// with `05`, or has neither the identification nor the measurement length.
/// `pressure` (hPa) selects the pump efficiency correction for the ozone
/// partial pressure.
///
/// # Examples
/// ```
/// use xdata_core::protocols::oif411::{Oif411Record, parse_oif411};
///
/// let record = parse_oif411("0501034F02C978A06300", 1100.0).unwrap();
/// assert!(matches!(record, Oif411Record::Measurement(_)));
/// assert!(parse_oif411("0801034F02C978A06300", 1100.0).is_none());
/// ```
pub fn parse_oif411(segment: &str, pressure: f64) -> Option<Oif411Record> {
    let reader = HexReader::checked(segment)?;
    if reader.len() < layout::MIN_LEN {
        debug!(len = reader.len(), "OIF411 segment too short");
        return None;
    }
    if !has_type_code(&reader) {
        debug!("OIF411 segment has wrong type code");
        return None;
    }

    let instrument_number = reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE);
    match reader.len() {
        layout::IDENTIFICATION_LEN => Some(Oif411Record::Identification(parse_identification(
            &reader,
            instrument_number,
        ))),
        layout::MEASUREMENT_LEN => Some(Oif411Record::Measurement(parse_measurement(
            &reader,
            instrument_number,
            pressure,
        ))),
        len => {
            debug!(len, "OIF411 segment has unsupported length");
            None
        }
    }
}

fn has_type_code(reader: &HexReader<'_>) -> bool {
    reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
}

fn parse_identification(
    reader: &HexReader<'_>,
    instrument_number: Option<i64>,
) -> Oif411Identification {
    let serial = reader
        .read_str(layout::SERIAL_RANGE)
        .ok()
        .map(str::to_string);
    let diagnostics = reader
        .read_str(layout::DIAGNOSTICS_RANGE)
        .map(Oif411Diagnostics::from_word)
        .unwrap_or_else(|_| Oif411Diagnostics::Unknown(String::new()));
    let version = reader
        .unsigned_opt(layout::VERSION_RANGE)
        .map(|raw| format!("{:.2}", raw as f64 / 100.0));

    Oif411Identification {
        instrument_number,
        serial,
        diagnostics,
        version,
    }
}

fn parse_measurement(
    reader: &HexReader<'_>,
    instrument_number: Option<i64>,
    pressure: f64,
) -> Oif411Measurement {
    let pump_temp = round_dp(
        reader.signed_or_nan(layout::PUMP_TEMP_RANGE) * layout::PUMP_TEMP_SCALE,
        2,
    );
    let ozone_current_ua = round_dp(
        reader.unsigned_or_nan(layout::OZONE_CURRENT_RANGE) * layout::OZONE_CURRENT_SCALE,
        4,
    );
    let battery_v = round_dp(
        reader.unsigned_or_nan(layout::BATTERY_RANGE) * layout::VOLTAGE_SCALE,
        1,
    );
    let pump_current_ma = round_dp(reader.unsigned_or_nan(layout::PUMP_CURRENT_RANGE), 1);
    let ext_voltage = round_dp(
        reader.unsigned_or_nan(layout::EXT_VOLTAGE_RANGE) * layout::VOLTAGE_SCALE,
        1,
    );

    let o3_partial_pressure = round_dp(
        ozone_partial_pressure(ozone_current_ua, pump_temp, correction_factor(pressure)),
        3,
    );

    Oif411Measurement {
        instrument_number,
        pump_temp,
        ozone_current_ua,
        battery_v,
        pump_current_ma,
        ext_voltage,
        o3_partial_pressure,
    }
}

/// Ozone partial pressure in mPa from cell current (µA) and pump
/// temperature (°C), scaled by the pump efficiency correction `cef`.
pub fn ozone_partial_pressure(current_ua: f64, pump_temp_c: f64, cef: f64) -> f64 {
    layout::O3_CONVERSION
        * (current_ua - layout::BACKGROUND_CURRENT_UA)
        * (pump_temp_c + layout::KELVIN_OFFSET)
        * layout::FLOW_RATE
        * cef
}

impl XdataFields for Oif411Record {
    fn write_fields(&self, out: &mut FieldMap) {
        match self {
            Oif411Record::Identification(id) => {
                put(out, "oif411_instrument_number", id.instrument_number);
                if let Some(serial) = &id.serial {
                    put(out, "oif411_serial", serial.as_str());
                }
                put(out, "oif411_diagnostics", id.diagnostics.message());
                if let Some(version) = &id.version {
                    put(out, "oif411_version", version.as_str());
                }
            }
            Oif411Record::Measurement(m) => {
                put(out, "oif411_instrument_number", m.instrument_number);
                put(out, "oif411_ozone_pump_temp", m.pump_temp);
                put(out, "oif411_ozone_current_uA", m.ozone_current_ua);
                put(out, "oif411_ozone_battery_v", m.battery_v);
                put(out, "oif411_ozone_pump_curr_mA", m.pump_current_ma);
                put(out, "oif411_ext_voltage", m.ext_voltage);
                put(out, "oif411_O3_partial_pressure", m.o3_partial_pressure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(segment: &str, pressure: f64) -> Oif411Measurement {
        match parse_oif411(segment, pressure) {
            Some(Oif411Record::Measurement(m)) => m,
            other => panic!("expected measurement, got {other:?}"),
        }
    }

    #[test]
    fn parse_measurement_record() {
        let m = measurement("0501034F02C978A06300", 1100.0);
        assert_eq!(m.instrument_number, Some(1));
        assert_eq!(m.pump_temp, 8.47);
        assert_eq!(m.ozone_current_ua, 1.1415);
        assert_eq!(m.battery_v, 13.8);
        assert_eq!(m.pump_current_ma, 99.0);
        assert_eq!(m.ext_voltage, 0.0);
        assert_eq!(m.o3_partial_pressure, 3.947);
    }

    #[test]
    fn negative_pump_temperature() {
        let m = measurement("0501FF9C02C978A06300", 1100.0);
        assert_eq!(m.pump_temp, -1.0);
    }

    #[test]
    fn low_pressure_raises_partial_pressure() {
        let ground = measurement("0501034F02C978A06300", 1100.0);
        let high = measurement("0501034F02C978A06300", 7.0);
        assert!(high.o3_partial_pressure > ground.o3_partial_pressure);
    }

    #[test]
    fn parse_identification_record() {
        let record = parse_oif411("0501R20234850000006EI", 1100.0).unwrap();
        let Oif411Record::Identification(id) = record else {
            panic!("expected identification");
        };
        assert_eq!(id.instrument_number, Some(1));
        assert_eq!(id.serial.as_deref(), Some("R2023485"));
        assert_eq!(id.diagnostics, Oif411Diagnostics::AllOk);
        assert_eq!(id.version.as_deref(), Some("1.10"));
    }

    #[test]
    fn diagnostics_words() {
        assert_eq!(
            Oif411Diagnostics::from_word("0404"),
            Oif411Diagnostics::PumpTempLowAndBatteryNotConnected
        );
        assert_eq!(
            Oif411Diagnostics::from_word("1234").message(),
            "Unknown State: 1234"
        );
    }

    #[test]
    fn reject_short_segment() {
        assert!(parse_oif411("0501034F02C978A063", 1100.0).is_none());
    }

    #[test]
    fn reject_wrong_prefix() {
        assert!(parse_oif411("0601034F02C978A06300", 1100.0).is_none());
    }

    #[test]
    fn reject_unsupported_length() {
        assert!(parse_oif411("0501034F02C978A0630000", 1100.0).is_none());
    }

    #[test]
    fn non_hex_measurement_field_is_nan() {
        let m = measurement("0501034F02C978A0ZZ00", 1100.0);
        assert!(m.pump_current_ma.is_nan());
        assert_eq!(m.pump_temp, 8.47);
    }

    #[test]
    fn measurement_fields_are_prefixed() {
        let fields = parse_oif411("0501034F02C978A06300", 1100.0)
            .unwrap()
            .to_fields();
        assert_eq!(fields.len(), 7);
        assert!(fields.keys().all(|key| key.starts_with("oif411_")));
    }
}
