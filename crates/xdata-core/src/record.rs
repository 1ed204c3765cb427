//! Merge decoded XDATA into a JSON telemetry record.
//!
//! Telemetry records are JSON objects that may carry `xdata` (the raw
//! payload), `pressure` (hPa) and `temp` (°C). Decoded fields are written
//! into the record's `data` object alongside a copy of `xdata`, and the
//! instrument list is stored as a display string (`"OIF411, CFH"`).

use serde_json::{Map, Value};
use thiserror::Error;

use crate::DEFAULT_PRESSURE_HPA;
use crate::dispatch::{DecodeOptions, DecodeResult, decode_with};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("telemetry record is not a JSON object")]
    NotAnObject,
    #[error("telemetry record `data` is not a JSON object")]
    DataNotAnObject,
}

/// Decoder inputs taken from one telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct XdataInputs<'a> {
    pub xdata: &'a str,
    /// Measured pressure, or [`DEFAULT_PRESSURE_HPA`] when the record has none.
    pub pressure: f64,
    pub temperature: Option<f64>,
}

impl<'a> XdataInputs<'a> {
    /// Returns `Ok(None)` when the record has no non-empty `xdata` string.
    pub fn from_record(record: &'a Value) -> Result<Option<Self>, RecordError> {
        let object = record.as_object().ok_or(RecordError::NotAnObject)?;
        let Some(xdata) = object
            .get("xdata")
            .and_then(Value::as_str)
            .filter(|xdata| !xdata.is_empty())
        else {
            return Ok(None);
        };
        let pressure = object
            .get("pressure")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_PRESSURE_HPA);
        let temperature = object.get("temp").and_then(Value::as_f64);
        Ok(Some(Self {
            xdata,
            pressure,
            temperature,
        }))
    }

    pub fn decode(&self, options: &DecodeOptions) -> DecodeResult {
        decode_with(
            self.xdata,
            self.pressure,
            self.temperature.unwrap_or(f64::NAN),
            options,
        )
    }
}

/// Decode the record's `xdata` and merge the result into `record.data`.
///
/// Returns the decode result, or `None` when the record carries no XDATA
/// (the record is then left untouched).
///
/// # Examples
/// ```
/// use serde_json::json;
/// use xdata_core::DecodeOptions;
/// use xdata_core::record::apply_xdata;
///
/// let mut record = json!({"serial": "S1234567", "xdata": "0501034F02C978A06300"});
/// apply_xdata(&mut record, &DecodeOptions::default())?;
/// assert_eq!(record["data"]["xdata_instrument"], "OIF411");
/// assert_eq!(record["data"]["oif411_ozone_pump_temp"], 8.47);
/// # Ok::<(), xdata_core::record::RecordError>(())
/// ```
pub fn apply_xdata(
    record: &mut Value,
    options: &DecodeOptions,
) -> Result<Option<DecodeResult>, RecordError> {
    let Some(inputs) = XdataInputs::from_record(record)? else {
        return Ok(None);
    };
    let xdata = inputs.xdata.to_string();
    let result = inputs.decode(options);

    let object = record.as_object_mut().ok_or(RecordError::NotAnObject)?;
    let data = object
        .entry("data")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or(RecordError::DataNotAnObject)?;

    data.insert("xdata".to_string(), Value::String(xdata));
    for (key, value) in &result.fields {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        data.insert(key.clone(), value);
    }
    data.insert(
        "xdata_instrument".to_string(),
        Value::String(result.instrument_label()),
    );
    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn inputs_default_pressure() {
        let record = json!({"xdata": "0501034F02C978A06300"});
        let inputs = XdataInputs::from_record(&record).unwrap().unwrap();
        assert_eq!(inputs.pressure, DEFAULT_PRESSURE_HPA);
        assert_eq!(inputs.temperature, None);
    }

    #[test]
    fn inputs_use_measured_pressure_and_temp() {
        let record = json!({"xdata": "05", "pressure": 12.5, "temp": -40.0});
        let inputs = XdataInputs::from_record(&record).unwrap().unwrap();
        assert_eq!(inputs.pressure, 12.5);
        assert_eq!(inputs.temperature, Some(-40.0));
    }

    #[test]
    fn record_without_xdata_is_untouched() {
        let mut record = json!({"serial": "S1", "xdata": ""});
        let before = record.clone();
        let applied = apply_xdata(&mut record, &DecodeOptions::default()).unwrap();
        assert!(applied.is_none());
        assert_eq!(record, before);
    }

    #[test]
    fn non_object_record_is_an_error() {
        let mut record = json!(["xdata"]);
        let err = apply_xdata(&mut record, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject));
    }

    #[test]
    fn merges_into_existing_data() {
        let mut record = json!({
            "xdata": "0501034F02CA08B06700#800261FCA6F80012F6F40A75",
            "pressure": 1100.0,
            "data": {"type": "RS41-SGP"}
        });
        apply_xdata(&mut record, &DecodeOptions::default()).unwrap();
        let data = &record["data"];
        assert_eq!(data["type"], "RS41-SGP");
        assert_eq!(data["xdata"], "0501034F02CA08B06700#800261FCA6F80012F6F40A75");
        assert_eq!(data["xdata_instrument"], "OIF411");
        assert!(data["oif411_O3_partial_pressure"].is_number());
    }

    #[test]
    fn unrecognized_xdata_leaves_empty_label() {
        let mut record = json!({"xdata": "FFdeadbeef"});
        apply_xdata(&mut record, &DecodeOptions::default()).unwrap();
        assert_eq!(record["data"]["xdata_instrument"], "");
    }

    #[test]
    fn non_object_data_is_an_error() {
        let mut record = json!({"xdata": "0100", "data": 3});
        let err = apply_xdata(&mut record, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, RecordError::DataNotAnObject));
    }
}
