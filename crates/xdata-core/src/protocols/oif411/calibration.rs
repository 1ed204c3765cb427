//! Pump efficiency correction for a nominal ECC-6A sensor.

/// Pressure breakpoints in hPa, strictly increasing.
pub const CORRECTION_PRESSURE_HPA: [f64; 14] = [
    0.0, 2.0, 3.0, 5.0, 10.0, 20.0, 30.0, 50.0, 100.0, 200.0, 300.0, 500.0, 1000.0, 1100.0,
];

/// Correction factor at each breakpoint.
pub const CORRECTION_FACTORS: [f64; 14] = [
    1.171, 1.171, 1.131, 1.092, 1.055, 1.032, 1.022, 1.015, 1.011, 1.008, 1.006, 1.004, 1.0, 1.0,
];

/// Piecewise-linear lookup over two parallel tables.
///
/// Values outside the breakpoint range clamp to the end values. When no
/// bracket is found (for example a `NaN` input) the factor is `1.0`.
///
/// # Examples
/// ```
/// use xdata_core::protocols::oif411::calibration::{
///     CORRECTION_FACTORS, CORRECTION_PRESSURE_HPA, interpolate,
/// };
///
/// let factor = interpolate(&CORRECTION_PRESSURE_HPA, &CORRECTION_FACTORS, 7.0);
/// assert!(factor < 1.092 && factor > 1.055);
/// ```
pub fn interpolate(breakpoints: &[f64], values: &[f64], x: f64) -> f64 {
    let (Some(first_x), Some(last_x)) = (breakpoints.first(), breakpoints.last()) else {
        return 1.0;
    };
    let (Some(first_v), Some(last_v)) = (values.first(), values.last()) else {
        return 1.0;
    };
    if x <= *first_x {
        return *first_v;
    }
    if x >= *last_x {
        return *last_v;
    }

    for (xs, vs) in breakpoints.windows(2).zip(values.windows(2)) {
        if x < xs[1] {
            return lerp(vs[0], vs[1], (x - xs[0]) / (xs[1] - xs[0]));
        }
    }
    1.0
}

/// Pump efficiency correction factor (Cef) at `pressure` hPa.
///
/// # Examples
/// ```
/// use xdata_core::protocols::oif411::correction_factor;
///
/// assert_eq!(correction_factor(0.0), 1.171);
/// assert_eq!(correction_factor(1100.0), 1.0);
/// ```
pub fn correction_factor(pressure: f64) -> f64 {
    interpolate(&CORRECTION_PRESSURE_HPA, &CORRECTION_FACTORS, pressure)
}

fn lerp(low: f64, high: f64, t: f64) -> f64 {
    low * (1.0 - t) + high * t
}
