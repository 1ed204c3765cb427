use std::thread;

use serde_json::json;
use xdata_core::{DEFAULT_PRESSURE_HPA, Instrument, correction_factor, decode};

#[test]
fn measurement_payload() {
    let result = decode("0501034F02C978A06300", DEFAULT_PRESSURE_HPA, 20.0);
    assert_eq!(result.instruments, vec![Instrument::Oif411]);
    for key in [
        "oif411_ozone_pump_temp",
        "oif411_ozone_current_uA",
        "oif411_ozone_battery_v",
        "oif411_ozone_pump_curr_mA",
        "oif411_ext_voltage",
        "oif411_O3_partial_pressure",
    ] {
        assert!(result.fields.contains_key(key), "missing {key}");
    }
    assert!(!result.fields.contains_key("oif411_serial"));
}

#[test]
fn identification_payload() {
    let result = decode("0501R20234850000006EI", DEFAULT_PRESSURE_HPA, 20.0);
    assert_eq!(result.instruments, vec![Instrument::Oif411]);
    assert_eq!(
        result.fields["oif411_serial"].as_str(),
        Some("R2023485")
    );
    assert_eq!(
        result.fields["oif411_diagnostics"].as_str(),
        Some("All OK")
    );
    assert!(!result.fields.contains_key("oif411_ozone_pump_temp"));
}

#[test]
fn segment_80_is_ignored() {
    let result = decode(
        "0501034F02CA08B06700#800261FCA6F80012F6F40A75",
        DEFAULT_PRESSURE_HPA,
        20.0,
    );
    assert_eq!(result.instruments, vec![Instrument::Oif411]);
    assert!(result.fields.keys().all(|key| key.starts_with("oif411_")));
}

#[test]
fn empty_and_unknown_payloads() {
    for payload in ["", "FFdeadbeef"] {
        let result = decode(payload, DEFAULT_PRESSURE_HPA, 20.0);
        let value = serde_json::to_value(&result).expect("json");
        assert_eq!(value, json!({"xdata_instrument": []}), "payload {payload:?}");
    }
}

#[test]
fn rejected_cobald_still_listed() {
    let result = decode("190213FFFE005FCF00359943912CD", DEFAULT_PRESSURE_HPA, 20.0);
    assert!(result.fields.is_empty());
    assert_eq!(result.instruments, vec![Instrument::Cobald]);
}

#[test]
fn non_ascii_segment_contributes_no_fields() {
    let result = decode("05\u{e9}1034F02C978A0630", DEFAULT_PRESSURE_HPA, 0.0);
    assert_eq!(result.instruments, vec![Instrument::Oif411]);
    assert!(result.fields.is_empty());

    let mixed = decode(
        "0501034F02C978A06300#19\u{e9}213FFFE005FCF00359943912CD",
        DEFAULT_PRESSURE_HPA,
        0.0,
    );
    assert_eq!(mixed.instruments, vec![Instrument::Oif411, Instrument::Cobald]);
    assert!(mixed.fields.keys().all(|key| key.starts_with("oif411_")));
}

#[test]
fn decoding_is_deterministic() {
    let payload = "0501034F02C978A06300#3C0104A427104E203A9861A8AB6A65";
    let first = decode(payload, 350.0, -30.0);
    let second = decode(payload, 350.0, -30.0);
    assert_eq!(first, second);
}

#[test]
fn decoding_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let pressure = 10.0 + i as f64 * 100.0;
                decode("0501034F02C978A06300", pressure, 0.0)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("thread");
        let pressure = 10.0 + i as f64 * 100.0;
        assert_eq!(result, decode("0501034F02C978A06300", pressure, 0.0));
    }
}

#[test]
fn correction_factor_properties() {
    assert_eq!(correction_factor(0.0), 1.171);
    assert_eq!(correction_factor(1100.0), 1.0);
    assert_eq!(correction_factor(1e6), 1.0);
    let mid = correction_factor(7.0);
    assert!(mid < 1.092 && mid > 1.055);
}
