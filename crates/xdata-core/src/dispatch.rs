use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::fields::{FieldMap, XdataFields};
use crate::protocols::cfh::parse_cfh;
use crate::protocols::cobald::parse_cobald;
use crate::protocols::flashb::parse_flashb;
use crate::protocols::oif411::parse_oif411;
use crate::protocols::pcfh::parse_pcfh;
use crate::protocols::skydew::{SkydewSlotMode, parse_skydew};

/// Separator between concatenated XDATA segments.
pub const SEGMENT_DELIMITER: char = '#';
/// Type code that is recognized and deliberately ignored.
pub const IGNORED_TYPE_CODE: &str = "80";

/// Auxiliary instruments recognized by their 2-char type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    V7,
    Oif411,
    Cfh,
    Fph,
    Cobald,
    Slw,
    Pops,
    Opc,
    Pcfh,
    FlashB,
    Traps,
    Skydew,
    Cicanum,
}

impl Instrument {
    /// Map an uppercase type code to its instrument. `80` and unknown codes
    /// yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::V7),
            "05" => Some(Self::Oif411),
            "08" => Some(Self::Cfh),
            "10" => Some(Self::Fph),
            "19" => Some(Self::Cobald),
            "28" => Some(Self::Slw),
            "38" | "45" => Some(Self::Pops),
            "39" => Some(Self::Opc),
            "3C" => Some(Self::Pcfh),
            "3D" => Some(Self::FlashB),
            "3E" => Some(Self::Traps),
            "3F" => Some(Self::Skydew),
            "41" => Some(Self::Cicanum),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::V7 => "V7",
            Self::Oif411 => "OIF411",
            Self::Cfh => "CFH",
            Self::Fph => "FPH",
            Self::Cobald => "COBALD",
            Self::Slw => "SLW",
            Self::Pops => "POPS",
            Self::Opc => "OPC",
            Self::Pcfh => "PCFH",
            Self::FlashB => "FLASH-B",
            Self::Traps => "TRAPS",
            Self::Skydew => "SKYDEW",
            Self::Cicanum => "CICANUM",
        }
    }

    /// Whether this crate decodes fields for the instrument, as opposed to
    /// only recognizing it.
    pub fn has_decoder(self) -> bool {
        matches!(
            self,
            Self::Oif411 | Self::Cfh | Self::Cobald | Self::Pcfh | Self::FlashB | Self::Skydew
        )
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Instrument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Decoder behavior switches.
///
/// # Examples
/// ```
/// use xdata_core::{DecodeOptions, SkydewSlotMode};
///
/// let options: DecodeOptions = serde_json::from_str(r#"{"skydew_slots":"strict"}"#)?;
/// assert_eq!(options.skydew_slots, SkydewSlotMode::Strict);
/// assert_eq!(DecodeOptions::default().skydew_slots, SkydewSlotMode::Fallthrough);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub skydew_slots: SkydewSlotMode,
}

/// Merged output of one payload.
///
/// Serializes flat: every decoded field at the top level plus
/// `xdata_instrument`, the recognized instrument names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeResult {
    #[serde(flatten)]
    pub fields: FieldMap,
    #[serde(rename = "xdata_instrument")]
    pub instruments: Vec<Instrument>,
}

impl DecodeResult {
    /// Instrument names joined for display, e.g. `"OIF411, CFH"`.
    pub fn instrument_label(&self) -> String {
        self.instruments
            .iter()
            .map(|instrument| instrument.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn push_instrument(&mut self, instrument: Instrument) {
        if !self.instruments.contains(&instrument) {
            self.instruments.push(instrument);
        }
    }
}

/// Decode an XDATA payload with default options.
///
/// `pressure` is the ambient pressure in hPa (pass
/// [`crate::DEFAULT_PRESSURE_HPA`] when unknown) and `temperature` the
/// ambient temperature in °C. Never fails: malformed segments contribute
/// nothing.
///
/// # Examples
/// ```
/// use xdata_core::{DEFAULT_PRESSURE_HPA, Instrument, decode};
///
/// let result = decode(
///     "0501034F02CA08B06700#800261FCA6F80012F6F40A75",
///     DEFAULT_PRESSURE_HPA,
///     20.0,
/// );
/// assert_eq!(result.instruments, vec![Instrument::Oif411]);
/// assert!(result.fields.contains_key("oif411_O3_partial_pressure"));
/// ```
pub fn decode(payload: &str, pressure: f64, temperature: f64) -> DecodeResult {
    decode_with(payload, pressure, temperature, &DecodeOptions::default())
}

/// Decode an XDATA payload.
///
/// Segments are decoded independently and merged in order; on an exact key
/// collision the later segment wins.
pub fn decode_with(
    payload: &str,
    pressure: f64,
    temperature: f64,
    options: &DecodeOptions,
) -> DecodeResult {
    let mut result = DecodeResult::default();
    for raw in payload.split(SEGMENT_DELIMITER) {
        let segment = raw.to_ascii_uppercase();
        let Some(code) = segment.get(0..2) else {
            debug!(segment = raw, "XDATA segment too short for a type code");
            continue;
        };
        let Some(instrument) = Instrument::from_code(code) else {
            if code == IGNORED_TYPE_CODE {
                debug!("ignoring XDATA type code 80");
            } else {
                debug!(code, "unrecognized XDATA type code");
            }
            continue;
        };

        result.push_instrument(instrument);
        if let Some(fields) = decode_segment(instrument, &segment, pressure, temperature, options)
        {
            result.fields.extend(fields);
        }
    }
    result
}

fn decode_segment(
    instrument: Instrument,
    segment: &str,
    pressure: f64,
    temperature: f64,
    options: &DecodeOptions,
) -> Option<FieldMap> {
    match instrument {
        Instrument::Oif411 => parse_oif411(segment, pressure).map(|r| r.to_fields()),
        Instrument::Cfh => parse_cfh(segment).map(|r| r.to_fields()),
        Instrument::Cobald => parse_cobald(segment).map(|r| r.to_fields()),
        Instrument::Pcfh => parse_pcfh(segment).map(|r| r.to_fields()),
        Instrument::FlashB => {
            parse_flashb(segment, pressure, temperature).map(|r| r.to_fields())
        }
        Instrument::Skydew => parse_skydew(segment, options.skydew_slots).map(|r| r.to_fields()),
        Instrument::V7
        | Instrument::Fph
        | Instrument::Slw
        | Instrument::Pops
        | Instrument::Opc
        | Instrument::Traps
        | Instrument::Cicanum => None,
    }
}
