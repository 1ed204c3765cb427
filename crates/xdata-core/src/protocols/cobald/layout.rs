use std::ops::Range;

pub const TYPE_CODE: &str = "19";
pub const LEN: usize = 30;

pub const INSTRUMENT_NUMBER_RANGE: Range<usize> = 2..4;
pub const SONDE_NUMBER_RANGE: Range<usize> = 4..7;
pub const INTERNAL_TEMP_RANGE: Range<usize> = 7..10;
pub const BLUE_BACKSCATTER_RANGE: Range<usize> = 10..16;
pub const RED_BACKSCATTER_RANGE: Range<usize> = 16..22;
pub const BLUE_MONITOR_RANGE: Range<usize> = 22..26;
pub const RED_MONITOR_RANGE: Range<usize> = 26..30;

pub const INTERNAL_TEMP_DIVISOR: f64 = 8.0;
