use std::ops::Range;

pub const TYPE_CODE: &str = "3C";
pub const MAX_LEN: usize = 32;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;
pub const PACKET_ID_RANGE: Range<usize> = 4..6;

pub const PACKET_IDENTIFICATION: &str = "00";
pub const PACKET_SENSOR_1: &str = "01";
pub const PACKET_SENSOR_2: &str = "02";
pub const PACKET_TEMPERATURES: &str = "03";
pub const PACKET_STATUS: &str = "04";

// Identification packet.
pub const SERIAL_RANGE: Range<usize> = 6..10;
pub const TEMPERATURE_PCB_DATE_RANGE: Range<usize> = 10..12;
pub const MAIN_PCB_DATE_RANGE: Range<usize> = 12..14;
pub const CONTROLLER_FW_DATE_RANGE: Range<usize> = 14..16;
pub const FPGA_FW_DATE_RANGE: Range<usize> = 16..18;
pub const DATE_BASE_YEAR: i64 = 2016;
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Sensor packets (01 / 02).
pub const MIRROR_TEMP_RANGE: Range<usize> = 6..9;
pub const PELTIER_HOT_SIDE_TEMP_RANGE: Range<usize> = 9..12;
pub const AIR_TEMP_RANGE: Range<usize> = 12..15;
pub const ANTICIPATED_FROST_TEMP_RANGE: Range<usize> = 15..18;
pub const FROST_MIRROR_REFLECTANCE_RANGE: Range<usize> = 18..22;
pub const REFERENCE_SURFACE_REFLECTANCE_RANGE: Range<usize> = 22..26;
pub const REFERENCE_HEATING_CURRENT_RANGE: Range<usize> = 26..28;
pub const PELTIER_CURRENT_RANGE: Range<usize> = 28..32;

// Temperature packet (03).
pub const HEAT_SINK_TEMP_1_RANGE: Range<usize> = 6..9;
pub const HEAT_SINK_TEMP_2_RANGE: Range<usize> = 9..12;
pub const REFERENCE_SURFACE_TEMP_1_RANGE: Range<usize> = 12..15;
pub const REFERENCE_SURFACE_TEMP_2_RANGE: Range<usize> = 15..18;
pub const THERMOCOUPLE_REFERENCE_TEMP_RANGE: Range<usize> = 18..21;
pub const RESERVED_TEMP_RANGE: Range<usize> = 21..24;

// Status packet (04).
pub const CLEAN_FROST_MIRROR_REFLECTANCE_1_RANGE: Range<usize> = 6..10;
pub const CLEAN_REFERENCE_REFLECTANCE_1_RANGE: Range<usize> = 10..14;
pub const CLEAN_FROST_MIRROR_REFLECTANCE_2_RANGE: Range<usize> = 14..18;
pub const CLEAN_REFERENCE_REFLECTANCE_2_RANGE: Range<usize> = 18..22;
pub const ANALOG_SUPPLY_VOLTAGE_RANGE: Range<usize> = 22..24;
pub const LOGIC_SUPPLY_VOLTAGE_RANGE: Range<usize> = 24..26;
pub const PELTIER_SUPPLY_VOLTAGE_RANGE: Range<usize> = 26..28;

pub const TEMP_SCALE: f64 = 0.05;
pub const TEMP_OFFSET: f64 = -125.0;
pub const REFLECTANCE_DIVISOR: f64 = 32768.0;
pub const HEATING_CURRENT_DIVISOR: f64 = 2.56;
pub const PELTIER_CURRENT_DIVISOR: f64 = 64.0;
pub const CLEAN_REFLECTANCE_SCALE: f64 = 0.001;
pub const SUPPLY_VOLTAGE_SCALE: f64 = 0.02;
pub const SUPPLY_VOLTAGE_OFFSET: f64 = 2.5;
