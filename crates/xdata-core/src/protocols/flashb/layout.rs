use std::ops::Range;

pub const TYPE_CODE: &str = "3D";
pub const LEN: usize = 35;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;
// Offset 4 is a reserved nibble.
pub const PMT_COUNTS_RANGE: Range<usize> = 5..9;
pub const PMT_BACKGROUND_RANGE: Range<usize> = 9..13;
pub const PMT_TEMPERATURE_RANGE: Range<usize> = 13..17;
pub const BATTERY_RANGE: Range<usize> = 17..21;
pub const YUV_CURRENT_RANGE: Range<usize> = 21..25;
pub const PMT_VOLTAGE_RANGE: Range<usize> = 25..29;
pub const FIRMWARE_RANGE: Range<usize> = 29..31;
pub const PRODUCTION_YEAR_RANGE: Range<usize> = 31..33;
pub const HARDWARE_VERSION_RANGE: Range<usize> = 33..35;

// PMT thermistor curve: T = A * ln(k1 r / (v_ref - k2 r)) + B.
pub const PMT_TEMP_A: f64 = -21.103;
pub const PMT_TEMP_B: f64 = 97.106;
pub const PMT_TEMP_K1: f64 = 0.0183;
pub const PMT_TEMP_K2: f64 = 0.00061;
pub const PMT_TEMP_VREF: f64 = 2.49856;

pub const BATTERY_SCALE: f64 = 0.005185;
pub const YUV_CURRENT_SCALE: f64 = 0.0101688;
pub const PMT_VOLTAGE_SCALE: f64 = 0.36966;
pub const FIRMWARE_SCALE: f64 = 0.1;
pub const PRODUCTION_YEAR_BASE: i64 = 2000;
