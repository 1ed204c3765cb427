use std::ops::Range;

use tracing::debug;

use super::layout;
use crate::fields::{FieldMap, XdataFields, put};
use crate::protocols::common::reader::{HexReader, round_dp};

#[derive(Debug, Clone, PartialEq)]
pub struct PcfhRecord {
    pub instrument_number: Option<i64>,
    pub packet: PcfhPacket,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PcfhPacket {
    Identification(PcfhIdentification),
    /// Readings of frost-point sensor `sensor` (1 or 2).
    Sensor { sensor: u8, readings: PcfhSensorReadings },
    Temperatures(PcfhTemperatures),
    Status(PcfhStatus),
    /// Sub-packet id with no decoder; only the instrument number is kept.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcfhIdentification {
    pub serial_number: Option<i64>,
    pub temperature_pcb_date: Option<String>,
    pub main_pcb_date: Option<String>,
    pub controller_fw_date: Option<String>,
    pub fpga_fw_date: Option<String>,
}

/// Temperatures in °C, reflectances as ratios, currents in mA.
#[derive(Debug, Clone, PartialEq)]
pub struct PcfhSensorReadings {
    pub mirror_temperature: f64,
    pub peltier_hot_side_temperature: f64,
    pub air_temperature: f64,
    pub anticipated_frost_temperature: f64,
    pub frost_mirror_reflectance: f64,
    pub reference_surface_reflectance: f64,
    pub reference_heating_current: f64,
    pub peltier_current: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcfhTemperatures {
    pub heat_sink_temperature_1: f64,
    pub heat_sink_temperature_2: f64,
    pub reference_surface_temperature_1: f64,
    pub reference_surface_temperature_2: f64,
    pub thermocouple_reference_temperature: f64,
    pub reserved_temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PcfhStatus {
    pub clean_frost_mirror_reflectance_1: f64,
    pub clean_reference_reflectance_1: f64,
    pub clean_frost_mirror_reflectance_2: f64,
    pub clean_reference_reflectance_2: f64,
    pub analog_supply_voltage: f64,
    pub logic_supply_voltage: f64,
    pub peltier_supply_voltage: f64,
}

/// Decode one PCFH segment (at most 32 hex chars, type code `3C`).
///
/// Fields that extend past the end of a short sub-packet decode as `NaN`.
///
/// # Examples
/// ```
/// use xdata_core::protocols::pcfh::{PcfhPacket, parse_pcfh};
///
/// let record = parse_pcfh("3C0104A427104E203A9861A8AB6A65").unwrap();
/// assert!(matches!(record.packet, PcfhPacket::Status(_)));
/// ```
pub fn parse_pcfh(segment: &str) -> Option<PcfhRecord> {
    let reader = HexReader::checked(segment)?;
    if reader.len() > layout::MAX_LEN {
        debug!(len = reader.len(), "PCFH segment too long");
        return None;
    }
    if reader.len() < layout::PACKET_ID_RANGE.end {
        debug!(len = reader.len(), "PCFH segment has no sub-packet ID");
        return None;
    }
    if !reader
        .read_str(0..2)
        .is_ok_and(|code| code.eq_ignore_ascii_case(layout::TYPE_CODE))
    {
        debug!("PCFH segment has wrong type code");
        return None;
    }

    let instrument_number = reader.unsigned_opt(layout::INSTRUMENT_NUMBER_RANGE);
    let packet_id = reader.read_str(layout::PACKET_ID_RANGE).unwrap_or_default();
    let packet = match packet_id {
        layout::PACKET_IDENTIFICATION => PcfhPacket::Identification(parse_identification(&reader)),
        layout::PACKET_SENSOR_1 => PcfhPacket::Sensor {
            sensor: 1,
            readings: parse_sensor(&reader),
        },
        layout::PACKET_SENSOR_2 => PcfhPacket::Sensor {
            sensor: 2,
            readings: parse_sensor(&reader),
        },
        layout::PACKET_TEMPERATURES => PcfhPacket::Temperatures(parse_temperatures(&reader)),
        layout::PACKET_STATUS => PcfhPacket::Status(parse_status(&reader)),
        other => {
            debug!(packet_id = other, "PCFH sub-packet not decoded");
            PcfhPacket::Unknown(other.to_string())
        }
    };

    Some(PcfhRecord {
        instrument_number,
        packet,
    })
}

fn parse_identification(reader: &HexReader<'_>) -> PcfhIdentification {
    let date = |range: Range<usize>| reader.read_str(range).ok().and_then(decode_date);
    PcfhIdentification {
        serial_number: reader.unsigned_opt(layout::SERIAL_RANGE),
        temperature_pcb_date: date(layout::TEMPERATURE_PCB_DATE_RANGE),
        main_pcb_date: date(layout::MAIN_PCB_DATE_RANGE),
        controller_fw_date: date(layout::CONTROLLER_FW_DATE_RANGE),
        fpga_fw_date: date(layout::FPGA_FW_DATE_RANGE),
    }
}

/// Component date code `YM`: year nibble counts from 2016, month nibble is
/// 1-based.
pub fn decode_date(code: &str) -> Option<String> {
    let mut nibbles = code.chars().map(|c| c.to_digit(16));
    let (Some(Some(year)), Some(Some(month)), None) =
        (nibbles.next(), nibbles.next(), nibbles.next())
    else {
        return None;
    };
    let month = (month as usize)
        .checked_sub(1)
        .and_then(|index| layout::MONTH_NAMES.get(index))
        .copied()
        .unwrap_or("Unknown");
    Some(format!("{month} {}", layout::DATE_BASE_YEAR + year as i64))
}

fn temperature(reader: &HexReader<'_>, range: Range<usize>) -> f64 {
    round_dp(
        reader.unsigned_or_nan(range) * layout::TEMP_SCALE + layout::TEMP_OFFSET,
        2,
    )
}

fn parse_sensor(reader: &HexReader<'_>) -> PcfhSensorReadings {
    PcfhSensorReadings {
        mirror_temperature: temperature(reader, layout::MIRROR_TEMP_RANGE),
        peltier_hot_side_temperature: temperature(reader, layout::PELTIER_HOT_SIDE_TEMP_RANGE),
        air_temperature: temperature(reader, layout::AIR_TEMP_RANGE),
        anticipated_frost_temperature: temperature(reader, layout::ANTICIPATED_FROST_TEMP_RANGE),
        frost_mirror_reflectance: round_dp(
            reader.unsigned_or_nan(layout::FROST_MIRROR_REFLECTANCE_RANGE)
                / layout::REFLECTANCE_DIVISOR,
            5,
        ),
        reference_surface_reflectance: round_dp(
            reader.unsigned_or_nan(layout::REFERENCE_SURFACE_REFLECTANCE_RANGE)
                / layout::REFLECTANCE_DIVISOR,
            5,
        ),
        reference_heating_current: round_dp(
            reader.unsigned_or_nan(layout::REFERENCE_HEATING_CURRENT_RANGE)
                / layout::HEATING_CURRENT_DIVISOR,
            2,
        ),
        peltier_current: round_dp(
            reader.signed_or_nan(layout::PELTIER_CURRENT_RANGE) / layout::PELTIER_CURRENT_DIVISOR,
            3,
        ),
    }
}

fn parse_temperatures(reader: &HexReader<'_>) -> PcfhTemperatures {
    PcfhTemperatures {
        heat_sink_temperature_1: temperature(reader, layout::HEAT_SINK_TEMP_1_RANGE),
        heat_sink_temperature_2: temperature(reader, layout::HEAT_SINK_TEMP_2_RANGE),
        reference_surface_temperature_1: temperature(
            reader,
            layout::REFERENCE_SURFACE_TEMP_1_RANGE,
        ),
        reference_surface_temperature_2: temperature(
            reader,
            layout::REFERENCE_SURFACE_TEMP_2_RANGE,
        ),
        thermocouple_reference_temperature: temperature(
            reader,
            layout::THERMOCOUPLE_REFERENCE_TEMP_RANGE,
        ),
        reserved_temperature: temperature(reader, layout::RESERVED_TEMP_RANGE),
    }
}

fn parse_status(reader: &HexReader<'_>) -> PcfhStatus {
    let reflectance = |range: Range<usize>| {
        round_dp(
            reader.unsigned_or_nan(range) * layout::CLEAN_REFLECTANCE_SCALE,
            3,
        )
    };
    let voltage = |range: Range<usize>| {
        round_dp(
            reader.unsigned_or_nan(range) * layout::SUPPLY_VOLTAGE_SCALE
                + layout::SUPPLY_VOLTAGE_OFFSET,
            2,
        )
    };
    PcfhStatus {
        clean_frost_mirror_reflectance_1: reflectance(
            layout::CLEAN_FROST_MIRROR_REFLECTANCE_1_RANGE,
        ),
        clean_reference_reflectance_1: reflectance(layout::CLEAN_REFERENCE_REFLECTANCE_1_RANGE),
        clean_frost_mirror_reflectance_2: reflectance(
            layout::CLEAN_FROST_MIRROR_REFLECTANCE_2_RANGE,
        ),
        clean_reference_reflectance_2: reflectance(layout::CLEAN_REFERENCE_REFLECTANCE_2_RANGE),
        analog_supply_voltage: voltage(layout::ANALOG_SUPPLY_VOLTAGE_RANGE),
        logic_supply_voltage: voltage(layout::LOGIC_SUPPLY_VOLTAGE_RANGE),
        peltier_supply_voltage: voltage(layout::PELTIER_SUPPLY_VOLTAGE_RANGE),
    }
}

impl XdataFields for PcfhRecord {
    fn write_fields(&self, out: &mut FieldMap) {
        put(out, "pcfh_instrument_number", self.instrument_number);
        match &self.packet {
            PcfhPacket::Identification(id) => {
                put(out, "pcfh_serial_number", id.serial_number);
                let dates = [
                    ("pcfh_temperature_pcb_date", &id.temperature_pcb_date),
                    ("pcfh_main_pcb_date", &id.main_pcb_date),
                    ("pcfh_controller_fw_date", &id.controller_fw_date),
                    ("pcfh_fpga_fw_date", &id.fpga_fw_date),
                ];
                for (key, date) in dates {
                    if let Some(date) = date {
                        put(out, key, date.as_str());
                    }
                }
            }
            PcfhPacket::Sensor { sensor, readings } => {
                let suffix = format!("{sensor:02}");
                let values = [
                    ("pcfh_mirror_temperature", readings.mirror_temperature),
                    (
                        "pcfh_peltier_hot_side_temperature",
                        readings.peltier_hot_side_temperature,
                    ),
                    ("pcfh_air_temperature", readings.air_temperature),
                    (
                        "pcfh_anticipated_frost_temperature",
                        readings.anticipated_frost_temperature,
                    ),
                    (
                        "pcfh_frost_mirror_reflectance",
                        readings.frost_mirror_reflectance,
                    ),
                    (
                        "pcfh_reference_surface_reflectance",
                        readings.reference_surface_reflectance,
                    ),
                    (
                        "pcfh_reference_heating_current",
                        readings.reference_heating_current,
                    ),
                    ("pcfh_peltier_current", readings.peltier_current),
                ];
                for (key, value) in values {
                    put(out, format!("{key}_{suffix}"), value);
                }
            }
            PcfhPacket::Temperatures(t) => {
                put(out, "pcfh_heat_sink_temperature_01", t.heat_sink_temperature_1);
                put(out, "pcfh_heat_sink_temperature_02", t.heat_sink_temperature_2);
                put(
                    out,
                    "pcfh_reference_surface_temperature_01",
                    t.reference_surface_temperature_1,
                );
                put(
                    out,
                    "pcfh_reference_surface_temperature_02",
                    t.reference_surface_temperature_2,
                );
                put(
                    out,
                    "pcfh_thermocouple_reference_temperature",
                    t.thermocouple_reference_temperature,
                );
                put(out, "pcfh_reserved_temperature", t.reserved_temperature);
            }
            PcfhPacket::Status(s) => {
                put(
                    out,
                    "pcfh_clean_frost_mirror_reflectance_01",
                    s.clean_frost_mirror_reflectance_1,
                );
                put(
                    out,
                    "pcfh_clean_reference_reflectance_01",
                    s.clean_reference_reflectance_1,
                );
                put(
                    out,
                    "pcfh_clean_frost_mirror_reflectance_02",
                    s.clean_frost_mirror_reflectance_2,
                );
                put(
                    out,
                    "pcfh_clean_reference_reflectance_02",
                    s.clean_reference_reflectance_2,
                );
                put(out, "pcfh_6v_analog_supply_voltage", s.analog_supply_voltage);
                put(out, "pcfh_4v5_logic_supply_voltage", s.logic_supply_voltage);
                put(
                    out,
                    "pcfh_4v5_peltier_heater_supply_voltage",
                    s.peltier_supply_voltage,
                );
            }
            PcfhPacket::Unknown(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identification_packet() {
        let record = parse_pcfh("3C010000011B062221").unwrap();
        assert_eq!(record.instrument_number, Some(1));
        let PcfhPacket::Identification(id) = record.packet else {
            panic!("expected identification packet");
        };
        assert_eq!(id.serial_number, Some(1));
        assert_eq!(id.temperature_pcb_date.as_deref(), Some("Nov 2017"));
        assert_eq!(id.main_pcb_date.as_deref(), Some("Jun 2016"));
        assert_eq!(id.controller_fw_date.as_deref(), Some("Feb 2018"));
        assert_eq!(id.fpga_fw_date.as_deref(), Some("Jan 2018"));
    }

    #[test]
    fn date_with_out_of_range_month() {
        assert_eq!(decode_date("10").as_deref(), Some("Unknown 2017"));
        assert_eq!(decode_date("1D").as_deref(), Some("Unknown 2017"));
        assert_eq!(decode_date("1"), None);
        assert_eq!(decode_date("XZ"), None);
    }

    #[test]
    fn parse_sensor_packet() {
        let record = parse_pcfh("3C0101434A062C5CD4A5747B81486C93").unwrap();
        let PcfhPacket::Sensor { sensor, readings } = &record.packet else {
            panic!("expected sensor packet");
        };
        assert_eq!(*sensor, 1);
        assert_eq!(readings.mirror_temperature, -71.2);
        assert_eq!(readings.peltier_hot_side_temperature, 3.3);
        assert_eq!(readings.air_temperature, -89.55);
        assert_eq!(readings.anticipated_frost_temperature, 39.2);
        assert_eq!(readings.frost_mirror_reflectance, 1.2926);
        assert_eq!(readings.reference_surface_reflectance, 0.96487);
        assert_eq!(readings.reference_heating_current, 28.13);
        assert_eq!(readings.peltier_current, 434.297);

        let fields = record.to_fields();
        assert!(fields.contains_key("pcfh_mirror_temperature_01"));
        assert!(fields.contains_key("pcfh_peltier_current_01"));
        assert!(!fields.contains_key("pcfh_mirror_temperature_02"));
    }

    #[test]
    fn sensor_two_uses_its_own_suffix() {
        let record = parse_pcfh("3C0102434A062C5CD4A5747B81486C93").unwrap();
        let fields = record.to_fields();
        assert!(fields.contains_key("pcfh_air_temperature_02"));
        assert!(!fields.contains_key("pcfh_air_temperature_01"));
    }

    #[test]
    fn parse_temperature_packet() {
        let record = parse_pcfh("3C0103456076175EC5FC9DF9B1").unwrap();
        let PcfhPacket::Temperatures(t) = record.packet else {
            panic!("expected temperature packet");
        };
        assert_eq!(t.heat_sink_temperature_1, -69.5);
        assert_eq!(t.heat_sink_temperature_2, -119.1);
        assert_eq!(t.reference_surface_temperature_1, -106.35);
        assert_eq!(t.reference_surface_temperature_2, 64.05);
        assert_eq!(t.thermocouple_reference_temperature, 77.05);
        assert_eq!(t.reserved_temperature, 53.85);
    }

    #[test]
    fn parse_status_packet() {
        let record = parse_pcfh("3C0104A427104E203A9861A8AB6A65").unwrap();
        let PcfhPacket::Status(s) = record.packet else {
            panic!("expected status packet");
        };
        assert_eq!(s.clean_frost_mirror_reflectance_1, 42.023);
        assert_eq!(s.clean_reference_reflectance_1, 4.174);
        assert_eq!(s.clean_frost_mirror_reflectance_2, 8.25);
        assert_eq!(s.clean_reference_reflectance_2, 39.009);
        assert_eq!(s.analog_supply_voltage, 5.86);
        assert_eq!(s.logic_supply_voltage, 5.92);
        assert_eq!(s.peltier_supply_voltage, 4.62);
    }

    #[test]
    fn short_sensor_packet_has_nan_tail() {
        let record = parse_pcfh("3C0101434A06").unwrap();
        let PcfhPacket::Sensor { readings, .. } = record.packet else {
            panic!("expected sensor packet");
        };
        assert_eq!(readings.mirror_temperature, -71.2);
        assert!(readings.air_temperature.is_nan());
        assert!(readings.peltier_current.is_nan());
    }

    #[test]
    fn unknown_packet_keeps_instrument_number() {
        let record = parse_pcfh("3C0109FFFF").unwrap();
        assert_eq!(record.packet, PcfhPacket::Unknown("09".to_string()));
        let fields = record.to_fields();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("pcfh_instrument_number"));
    }

    #[test]
    fn reject_too_long() {
        assert!(parse_pcfh("3C0101434A062C5CD4A5747B81486C9300").is_none());
    }

    #[test]
    fn reject_wrong_prefix() {
        assert!(parse_pcfh("3D0104A427104E203A9861A8AB6A65").is_none());
    }

    #[test]
    fn reject_missing_packet_id() {
        assert!(parse_pcfh("3C").is_none());
        assert!(parse_pcfh("3C01").is_none());
        assert!(parse_pcfh("3C010").is_none());
    }
}
