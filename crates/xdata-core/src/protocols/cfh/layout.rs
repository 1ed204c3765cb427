use std::ops::Range;

pub const TYPE_CODE: &str = "08";
pub const LEN: usize = 24;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;
pub const MIRROR_TEMP_RANGE: Range<usize> = 4..10;
pub const OPTICS_VOLTAGE_RANGE: Range<usize> = 10..16;
pub const OPTICS_TEMP_RANGE: Range<usize> = 16..20;
pub const BATTERY_RANGE: Range<usize> = 20..24;

pub const MIRROR_TEMP_SCALE: f64 = 0.00001;
pub const OPTICS_VOLTAGE_SCALE: f64 = 0.000001;
pub const OPTICS_TEMP_SCALE: f64 = 0.01;
pub const BATTERY_SCALE: f64 = 0.01;
