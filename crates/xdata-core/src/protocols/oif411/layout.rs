use std::ops::Range;

pub const TYPE_CODE: &str = "05";
pub const MIN_LEN: usize = 20;
pub const MEASUREMENT_LEN: usize = 20;
pub const IDENTIFICATION_LEN: usize = 21;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;

// Identification record.
pub const SERIAL_RANGE: Range<usize> = 4..12;
pub const DIAGNOSTICS_RANGE: Range<usize> = 12..16;
pub const VERSION_RANGE: Range<usize> = 16..20;

// Measurement record.
pub const PUMP_TEMP_RANGE: Range<usize> = 4..8;
pub const OZONE_CURRENT_RANGE: Range<usize> = 8..13;
pub const BATTERY_RANGE: Range<usize> = 13..15;
pub const PUMP_CURRENT_RANGE: Range<usize> = 15..18;
pub const EXT_VOLTAGE_RANGE: Range<usize> = 18..20;

pub const PUMP_TEMP_SCALE: f64 = 0.01;
pub const OZONE_CURRENT_SCALE: f64 = 0.0001;
pub const VOLTAGE_SCALE: f64 = 0.1;

/// Converts µA · K · s/100 mL into mPa.
pub const O3_CONVERSION: f64 = 4.30851e-4;
/// Background current; taken as zero.
pub const BACKGROUND_CURRENT_UA: f64 = 0.0;
/// Nominal pump flow rate, seconds per 100 mL.
pub const FLOW_RATE: f64 = 28.5;
pub const KELVIN_OFFSET: f64 = 273.15;
