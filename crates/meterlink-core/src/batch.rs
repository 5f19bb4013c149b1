use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::codec::plain::layout::METER_PORT;
use crate::decoder::{PayloadDecoder, PlainDecoder};
use crate::source::{HexLinesSource, SourceError, Uplink, UplinkSource, format_hex};
use crate::{DEFAULT_GENERATED_AT, Report, UplinkReport, make_empty_report};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Decode every uplink of a text file (see [`HexLinesSource`]).
pub fn decode_uplink_file(path: &Path) -> Result<Report, BatchError> {
    let mut source = HexLinesSource::open(path)?;
    decode_source(&mut source, &path.display().to_string())
}

/// Drain `source` through the PLAIN decoder, keeping source order.
pub fn decode_source<S: UplinkSource>(source: &mut S, input: &str) -> Result<Report, BatchError> {
    decode_source_with(source, &PlainDecoder, input)
}

pub fn decode_source_with<S: UplinkSource>(
    source: &mut S,
    decoder: &dyn PayloadDecoder,
    input: &str,
) -> Result<Report, BatchError> {
    let mut report = make_empty_report(input);
    while let Some(uplink) = source.next_uplink()? {
        push_uplink(&mut report, decoder, uplink);
    }
    Ok(report)
}

/// Report for a single payload given on the command line.
///
/// # Examples
/// ```
/// use meterlink_core::decode_single;
///
/// let report = decode_single(&[0x00, 0x00, 0x80, 0x3f], 1, "argument");
/// assert_eq!(report.summary.uplinks_decoded, 1);
/// assert_eq!(report.uplinks[0].payload_hex, "0000803f");
/// ```
pub fn decode_single(payload: &[u8], port: u32, input: &str) -> Report {
    let mut report = make_empty_report(input);
    let uplink = Uplink {
        line: 1,
        port,
        payload: payload.to_vec(),
    };
    push_uplink(&mut report, &PlainDecoder, uplink);
    report
}

/// Current UTC time as RFC3339, falling back to the epoch placeholder.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}

fn push_uplink(report: &mut Report, decoder: &dyn PayloadDecoder, uplink: Uplink) {
    let fields = decoder.decode(&uplink.payload, uplink.port);

    let summary = &mut report.summary;
    summary.uplinks_total += 1;
    if uplink.port != METER_PORT {
        summary.uplinks_ignored_port += 1;
    } else if fields.is_empty() {
        summary.uplinks_empty += 1;
    }
    if !fields.is_empty() {
        summary.uplinks_decoded += 1;
    }
    report.input.uplinks += 1;

    report.uplinks.push(UplinkReport {
        line: uplink.line,
        port: uplink.port,
        bytes: uplink.payload.len() as u64,
        payload_hex: format_hex(&uplink.payload),
        fields,
    });
}

#[cfg(test)]
mod tests {
    use super::{decode_single, decode_source, now_rfc3339};
    use crate::source::HexLinesSource;

    #[test]
    fn summary_counts_each_outcome() {
        let text = "1 0000803f\n2 0000803f\n1 0000\n0000803f00000040\n";
        let mut source = HexLinesSource::from_reader(text.as_bytes());
        let report = decode_source(&mut source, "inline").unwrap();

        assert_eq!(report.input.source, "inline");
        assert_eq!(report.input.uplinks, 4);
        assert_eq!(report.summary.uplinks_total, 4);
        assert_eq!(report.summary.uplinks_decoded, 2);
        assert_eq!(report.summary.uplinks_ignored_port, 1);
        assert_eq!(report.summary.uplinks_empty, 1);

        let lines: Vec<u64> = report.uplinks.iter().map(|u| u.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert_eq!(report.uplinks[3].fields.energy_out, Some(2.0));
    }

    #[test]
    fn source_errors_abort_the_batch() {
        let mut source = HexLinesSource::from_reader("1 00\n1 0\n".as_bytes());
        let err = decode_source(&mut source, "inline").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn single_payload_on_other_port_is_ignored() {
        let report = decode_single(&[0x00, 0x00, 0x80, 0x3f], 2, "argument");
        assert_eq!(report.summary.uplinks_ignored_port, 1);
        assert_eq!(report.summary.uplinks_decoded, 0);
        assert!(report.uplinks[0].fields.is_empty());
        assert_eq!(report.uplinks[0].bytes, 4);
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = now_rfc3339();
        assert!(ts.contains('T'), "{ts}");
        assert!(ts.ends_with('Z'), "{ts}");
    }
}
