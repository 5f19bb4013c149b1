use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::hex::parse_hex_payload;
use super::{SourceError, Uplink, UplinkSource};
use crate::codec::plain::layout::METER_PORT;

/// Uplinks stored as text, one per line.
///
/// Each line is either `<port> <hex payload>` or a bare hex payload, which
/// is taken to arrive on the meter port. The payload must not contain
/// whitespace (use `:` or `-` to separate bytes). Blank lines and lines
/// starting with `#` are skipped.
///
/// # Examples
/// ```
/// use meterlink_core::{HexLinesSource, UplinkSource};
///
/// let text = "# meter\n1 0000803f\n0000803f00000040\n";
/// let mut source = HexLinesSource::from_reader(text.as_bytes());
/// let first = source.next_uplink()?.expect("uplink");
/// assert_eq!((first.line, first.port), (2, 1));
/// let second = source.next_uplink()?.expect("uplink");
/// assert_eq!(second.payload.len(), 8);
/// assert!(source.next_uplink()?.is_none());
/// # Ok::<(), meterlink_core::SourceError>(())
/// ```
pub struct HexLinesSource<R> {
    reader: R,
    line: u64,
    buf: String,
}

impl HexLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> HexLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> UplinkSource for HexLinesSource<R> {
    fn next_uplink(&mut self) -> Result<Option<Uplink>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return parse_line(self.line, text).map(Some);
        }
    }
}

fn parse_line(line: u64, text: &str) -> Result<Uplink, SourceError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (port, hex) = match tokens.as_slice() {
        [hex] => (METER_PORT, *hex),
        [port, hex] => (parse_port(port).map_err(|err| at_line(line, err))?, *hex),
        _ => return Err(SourceError::MalformedLine { line }),
    };
    let payload = parse_hex_payload(hex).map_err(|err| at_line(line, err))?;
    Ok(Uplink {
        line,
        port,
        payload,
    })
}

fn parse_port(token: &str) -> Result<u32, SourceError> {
    token.parse().map_err(|_| SourceError::InvalidPort {
        value: token.to_string(),
    })
}

fn at_line(line: u64, err: SourceError) -> SourceError {
    SourceError::Line {
        line,
        source: Box::new(err),
    }
}

#[cfg(test)]
mod tests {
    use super::HexLinesSource;
    use crate::source::{SourceError, UplinkSource};

    fn collect(text: &str) -> Result<Vec<(u64, u32, Vec<u8>)>, SourceError> {
        let mut source = HexLinesSource::from_reader(text.as_bytes());
        let mut out = Vec::new();
        while let Some(uplink) = source.next_uplink()? {
            out.push((uplink.line, uplink.port, uplink.payload));
        }
        Ok(out)
    }

    #[test]
    fn reads_port_and_bare_lines() {
        let uplinks = collect("2 0102\n0304\n").unwrap();
        assert_eq!(
            uplinks,
            vec![(1, 2, vec![0x01, 0x02]), (2, 1, vec![0x03, 0x04])]
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let uplinks = collect("# header\n\n   \n1 00:00:80:3f\n").unwrap();
        assert_eq!(uplinks, vec![(4, 1, vec![0x00, 0x00, 0x80, 0x3f])]);
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let uplinks = collect("1 0a0b\r\n1 0c0d").unwrap();
        assert_eq!(uplinks.len(), 2);
        assert_eq!(uplinks[1].2, vec![0x0c, 0x0d]);
    }

    #[test]
    fn reports_bad_port_with_line_number() {
        let err = collect("1 00\nx 00\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("line 2:"), "{msg}");
        assert!(msg.contains("invalid port 'x'"), "{msg}");
    }

    #[test]
    fn reports_bad_hex_with_line_number() {
        let err = collect("1 0g\n").unwrap_err();
        assert!(matches!(err, SourceError::Line { line: 1, .. }));
        assert!(err.to_string().contains("invalid hex digit 'g'"));
    }

    #[test]
    fn rejects_lines_with_extra_tokens() {
        let err = collect("1 00 00\n").unwrap_err();
        assert!(matches!(err, SourceError::MalformedLine { line: 1 }));
    }

    #[test]
    fn empty_input_has_no_uplinks() {
        assert!(collect("").unwrap().is_empty());
    }
}
