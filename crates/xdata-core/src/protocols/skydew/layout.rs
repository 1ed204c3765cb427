use std::ops::Range;

pub const TYPE_CODE: &str = "3F";
pub const LEN: usize = 38;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;
pub const MIRROR_TEMP_CODE_RANGE: Range<usize> = 4..8;
pub const SCATTERED_LIGHT_RANGE: Range<usize> = 8..12;
pub const REFERENCE_RESISTANCE_RANGE: Range<usize> = 12..16;
pub const OFFSET_RANGE: Range<usize> = 16..20;
pub const PELTIER_CURRENT_RANGE: Range<usize> = 20..24;
pub const HEATSINK_TEMP_RANGE: Range<usize> = 24..26;
pub const BOARD_TEMP_RANGE: Range<usize> = 26..28;
pub const BATTERY_RANGE: Range<usize> = 28..30;
pub const PID_RANGE: Range<usize> = 30..32;
pub const PARAMETER_RANGE: Range<usize> = 32..36;
pub const PARAMETER_TYPE_RANGE: Range<usize> = 36..38;

/// Volts per ADC count (2.5 V / 40000).
pub const ADC_VOLTS_PER_COUNT: f64 = 0.0000625;

pub const PELTIER_MID_CODE: f64 = 32768.0;
pub const PELTIER_ZERO_VOLTS: f64 = 2.048;
pub const PELTIER_COOLING_GAIN: f64 = 2.0;
pub const PELTIER_HEATING_GAIN: f64 = 1.0;

pub const THERMISTOR_ADC_FULL_SCALE: f64 = 256.0;
pub const THERMISTOR_SERIES_KOHM: f64 = 10.0;
pub const THERMISTOR_R25_KOHM: f64 = 10.0;
pub const THERMISTOR_BETA: f64 = 3390.0;
pub const THERMISTOR_T25_KELVIN: f64 = 298.15;
pub const KELVIN_OFFSET: f64 = 273.15;

pub const BATTERY_SCALE: f64 = 0.05;
