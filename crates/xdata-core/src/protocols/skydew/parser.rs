use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

/// How the trailing parameter is assigned to output slots.
///
/// Deployed decoders assign the parameter to the slot named by the type byte
/// and to every slot after it (`Fallthrough`). `Strict` assigns exactly one
/// slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkydewSlotMode {
    #[default]
    Fallthrough,
    Strict,
}

/// Parameter slots in type-byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkydewParameter {
    SerialNumber,
    CoefficientB,
    CoefficientC,
    CoefficientD,
    CoefficientE,
    FirmwareVersion,
}

impl SkydewParameter {
    pub const ALL: [SkydewParameter; 6] = [
        SkydewParameter::SerialNumber,
        SkydewParameter::CoefficientB,
        SkydewParameter::CoefficientC,
        SkydewParameter::CoefficientD,
        SkydewParameter::CoefficientE,
        SkydewParameter::FirmwareVersion,
    ];

    pub fn from_type_byte(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    pub fn field_name(self) -> &'static str {
        match self {
            SkydewParameter::SerialNumber => "skydew_serial_number",
            SkydewParameter::CoefficientB => "skydew_coefficient_b",
            SkydewParameter::CoefficientC => "skydew_coefficient_c",
            SkydewParameter::CoefficientD => "skydew_coefficient_d",
            SkydewParameter::CoefficientE => "skydew_coefficient_e",
            SkydewParameter::FirmwareVersion => "skydew_firmware_version",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkydewRecord {
    pub instrument_number: Option<i64>,
    /// Raw mirror temperature code; needs the B..E coefficients to convert.
    pub mirror_temperature_value: Option<i64>,
    /// Scattered light level, V.
    pub scattered_light: f64,
    pub reference_resistance: Option<i64>,
    pub offset: Option<i64>,
    /// Peltier current, A (positive when cooling).
    pub peltier_current: f64,
    /// Heatsink temperature, °C.
    pub heatsink_temperature: f64,
    /// Circuit board temperature, °C.
    pub board_temperature: f64,
    /// Battery voltage, V.
    pub battery: f64,
    pub pid: Option<i64>,
    /// Parameter slots populated by this frame, in slot order.
    pub parameters: Vec<(SkydewParameter, i64)>,
}

/// Decode one SKYDEW segment (exactly 38 hex chars, type code `3F`).
///
/// # Examples
/// ```
/// use xdata_core::protocols::skydew::{SkydewParameter, SkydewSlotMode, parse_skydew};
///
/// let segment = "3F0144A75446416100160ECAFFFF6EE8000000";
/// let strict = parse_skydew(segment, SkydewSlotMode::Strict).unwrap();
/// assert_eq!(strict.parameters, vec![(SkydewParameter::SerialNumber, 0)]);
///
/// let legacy = parse_skydew(segment, SkydewSlotMode::Fallthrough).unwrap();
/// assert_eq!(legacy.parameters.len(), 6);
/// ```
pub fn parse_skydew(segment: &str, mode: SkydewSlotMode) -> Option<SkydewRecord> {
    let reader = HexReader::checked(segment)?;
    if reader.len() != layout::LEN {
        debug!(len = reader.len(), "SKYDEW segment has wrong length");
        return None;
    }
    if !reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
    {
        debug!("SKYDEW segment has wrong type code");
        return None;
    }

    let parameters = match (
        reader.unsigned_opt(layout::PARAMETER_RANGE),
        reader
            .unsigned_opt(layout::PARAMETER_TYPE_RANGE)
            .and_then(SkydewParameter::from_type_byte),
    ) {
        (Some(value), Some(slot)) => assign_parameter(slot, value, mode),
        _ => Vec::new(),
    };

    Some(SkydewRecord {
        instrument_number: reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE),
        mirror_temperature_value: reader.unsigned_opt(layout::MIRROR_TEMP_CODE_RANGE),
        scattered_light: round_dp(
            reader.unsigned_or_nan(layout::SCATTERED_LIGHT_RANGE) * layout::ADC_VOLTS_PER_COUNT,
            4,
        ),
        reference_resistance: reader.unsigned_opt(layout::REFERENCE_RESISTANCE_RANGE),
        offset: reader.unsigned_opt(layout::OFFSET_RANGE),
        peltier_current: round_dp(
            peltier_current(reader.unsigned_or_nan(layout::PELTIER_CURRENT_RANGE)),
            3,
        ),
        heatsink_temperature: round_dp(
            thermistor_temperature(reader.unsigned_or_nan(layout::HEATSINK_TEMP_RANGE)),
            2,
        ),
        board_temperature: round_dp(
            thermistor_temperature(reader.unsigned_or_nan(layout::BOARD_TEMP_RANGE)),
            2,
        ),
        battery: round_dp(
            reader.unsigned_or_nan(layout::BATTERY_RANGE) * layout::BATTERY_SCALE,
            2,
        ),
        pid: reader.unsigned_opt(layout::PID_RANGE),
        parameters,
    })
}

fn assign_parameter(
    slot: SkydewParameter,
    value: i64,
    mode: SkydewSlotMode,
) -> Vec<(SkydewParameter, i64)> {
    match mode {
        SkydewSlotMode::Strict => vec![(slot, value)],
        SkydewSlotMode::Fallthrough => SkydewParameter::ALL
            .iter()
            .skip_while(|candidate| **candidate != slot)
            .map(|candidate| (*candidate, value))
            .collect(),
    }
}

/// Peltier current in A from its raw 16-bit code. Codes above the mid code
/// are cooling, below it heating; the two halves use different gains.
pub fn peltier_current(raw: f64) -> f64 {
    let volts = raw * layout::ADC_VOLTS_PER_COUNT - layout::PELTIER_ZERO_VOLTS;
    if raw >= layout::PELTIER_MID_CODE {
        volts * layout::PELTIER_COOLING_GAIN
    } else {
        volts * layout::PELTIER_HEATING_GAIN
    }
}

/// NTC thermistor temperature in °C from its raw 8-bit divider code.
pub fn thermistor_temperature(raw: f64) -> f64 {
    let fraction = raw / layout::THERMISTOR_ADC_FULL_SCALE;
    let resistance = layout::THERMISTOR_SERIES_KOHM * fraction / (1.0 - fraction);
    let inverse_kelvin = (resistance / layout::THERMISTOR_R25_KOHM).ln() / layout::THERMISTOR_BETA
        + 1.0 / layout::THERMISTOR_T25_KELVIN;
    1.0 / inverse_kelvin - layout::KELVIN_OFFSET
}

impl XdataFields for SkydewRecord {
    fn write_fields(&self, out: &mut FieldMap) {
        put(out, "skydew_instrument_number", self.instrument_number);
        put(
            out,
            "skydew_mirror_temperature_value",
            self.mirror_temperature_value,
        );
        put(out, "skydew_scattered_light", self.scattered_light);
        put(out, "skydew_reference_resistance", self.reference_resistance);
        put(out, "skydew_offset", self.offset);
        put(out, "skydew_peltier_current", self.peltier_current);
        put(out, "skydew_heatsink_temperature", self.heatsink_temperature);
        put(out, "skydew_board_temperature", self.board_temperature);
        put(out, "skydew_battery", self.battery);
        put(out, "skydew_pid", self.pid);
        for (slot, value) in &self.parameters {
            put(out, slot.field_name(), *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3F0144A75446416100160ECAFFFF6EE8000000";

    #[test]
    fn parse_valid_skydew() {
        let record = parse_skydew(SAMPLE, SkydewSlotMode::Strict).unwrap();
        assert_eq!(record.instrument_number, Some(1));
        assert_eq!(record.mirror_temperature_value, Some(0x44a7));
        assert_eq!(record.scattered_light, 1.3484);
        assert_eq!(record.reference_resistance, Some(0x4161));
        assert_eq!(record.offset, Some(0x16));
        assert_eq!(record.peltier_current, -1.811);
        assert_eq!(record.heatsink_temperature, -72.69);
        assert_eq!(record.board_temperature, -72.69);
        assert_eq!(record.battery, 5.5);
        assert_eq!(record.pid, Some(0xe8));
    }

    #[test]
    fn strict_mode_sets_one_slot() {
        let segment = format!("{}012303", &SAMPLE[..32]);
        let record = parse_skydew(&segment, SkydewSlotMode::Strict).unwrap();
        assert_eq!(
            record.parameters,
            vec![(SkydewParameter::CoefficientD, 0x0123)]
        );
    }

    #[test]
    fn fallthrough_mode_sets_trailing_slots() {
        let segment = format!("{}012303", &SAMPLE[..32]);
        let record = parse_skydew(&segment, SkydewSlotMode::Fallthrough).unwrap();
        assert_eq!(
            record.parameters,
            vec![
                (SkydewParameter::CoefficientD, 0x0123),
                (SkydewParameter::CoefficientE, 0x0123),
                (SkydewParameter::FirmwareVersion, 0x0123),
            ]
        );
        let fields = record.to_fields();
        assert!(fields.contains_key("skydew_firmware_version"));
        assert!(!fields.contains_key("skydew_serial_number"));
    }

    #[test]
    fn unknown_parameter_type_sets_nothing() {
        let segment = format!("{}012306", &SAMPLE[..32]);
        let record = parse_skydew(&segment, SkydewSlotMode::Fallthrough).unwrap();
        assert!(record.parameters.is_empty());
    }

    #[test]
    fn peltier_current_is_piecewise() {
        assert!(peltier_current(32768.0).abs() < 1e-12);
        assert!(peltier_current(40000.0) > 0.0);
        assert!(peltier_current(1000.0) < 0.0);
        let above = peltier_current(32768.0 + 1000.0);
        let below = peltier_current(32768.0 - 1000.0);
        assert!((above + 2.0 * below).abs() < 1e-9);
    }

    #[test]
    fn thermistor_reads_25c_at_midscale() {
        assert!((thermistor_temperature(128.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn reject_wrong_length() {
        assert!(parse_skydew(&SAMPLE[..37], SkydewSlotMode::Strict).is_none());
    }

    #[test]
    fn reject_wrong_prefix() {
        let segment = format!("3E{}", &SAMPLE[2..]);
        assert!(parse_skydew(&segment, SkydewSlotMode::Strict).is_none());
        assert!(parse_skydew(&segment, SkydewSlotMode::Fallthrough).is_none());
    }
}
