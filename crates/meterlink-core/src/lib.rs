//! meterlink core library for decoding energy-meter uplinks.
//!
//! The meter gateway packs its readings into LoRaWAN uplinks as
//! little-endian binary32 values (the "PLAIN" encoding). This crate turns
//! those payloads back into named values: uplink sources feed the batch
//! layer, which drives the payload codec (layout/reader/parser) and
//! aggregates results into a deterministic report. Decoding is
//! byte-oriented and side-effect free; all I/O is isolated in `source`.
//!
//! Invariants:
//! - Decoding never fails. Short payloads drop trailing fields and unknown
//!   ports decode to nothing.
//! - binary32 values are rebuilt bit by bit; exponent 255 is not treated as
//!   NaN or infinity.
//! - Report uplinks keep source order.
//!
//! # Examples
//! ```
//! use meterlink_core::{bytes_to_float, decode};
//!
//! let decoded = decode(&[0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0x40], 1);
//! assert_eq!(decoded.energy_in, Some(1.0));
//! assert_eq!(decoded.energy_out, Some(2.0));
//! assert_eq!(bytes_to_float([0x00, 0x00, 0x00, 0x3f]), 0.5);
//! ```

use serde::{Deserialize, Serialize};

mod batch;
pub mod codec;
mod decoded;
mod decoder;
mod source;

pub use batch::{
    BatchError, decode_single, decode_source, decode_source_with, decode_uplink_file, now_rfc3339,
};
pub use codec::float::bytes_to_float;
pub use codec::plain::layout::METER_PORT;
pub use decoded::{DecodedPayload, Field};
pub use decoder::{PayloadDecoder, PlainDecoder, decode};
pub use source::{
    HexLinesSource, SourceError, Uplink, UplinkSource, format_hex, parse_hex_payload,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no generation time is set.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoding report with uplinks in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    pub input: InputInfo,
    pub summary: Summary,
    pub uplinks: Vec<UplinkReport>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Where the uplinks came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// File path, or `argument` for a payload given on the command line.
    pub source: String,
    pub uplinks: u64,
}

/// Outcome counts over all uplinks.
///
/// `uplinks_decoded` counts uplinks with at least one field,
/// `uplinks_ignored_port` those on a port other than [`METER_PORT`], and
/// `uplinks_empty` meter-port uplinks too short for any field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub uplinks_total: u64,
    pub uplinks_decoded: u64,
    pub uplinks_ignored_port: u64,
    pub uplinks_empty: u64,
}

/// One decoded uplink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkReport {
    /// 1-based line in the source.
    pub line: u64,
    pub port: u32,
    /// Payload length in bytes.
    pub bytes: u64,
    pub payload_hex: String,
    pub fields: DecodedPayload,
}

/// Build a report with base fields filled and no uplinks.
///
/// # Examples
/// ```
/// use meterlink_core::make_empty_report;
///
/// let report = make_empty_report("uplinks.txt");
/// assert_eq!(report.report_version, meterlink_core::REPORT_VERSION);
/// assert!(report.uplinks.is_empty());
/// ```
pub fn make_empty_report(input: &str) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "meterlink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            source: input.to_string(),
            uplinks: 0,
        },
        summary: Summary::default(),
        uplinks: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_absent_fields() {
        let report = decode_single(&[0x00, 0x00, 0x80, 0x3f, 0x00], 1, "argument");

        let value = serde_json::to_value(&report).expect("report json");
        let fields = &value["uplinks"][0]["fields"];
        assert_eq!(fields["energy_in"], 1.0);
        assert_eq!(fields["energy_out"], 0.0);
        assert!(fields.get("power").is_none());
        assert_eq!(value["uplinks"][0]["payload_hex"], "0000803f00");
        assert_eq!(value["tool"]["name"], "meterlink");
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = decode_single(&[0x00, 0x80, 0x66, 0x43], 1, "argument");
        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: Report = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.uplinks[0].fields, report.uplinks[0].fields);
        assert_eq!(parsed.uplinks[0].fields.energy_in, Some(230.5));
    }
}
