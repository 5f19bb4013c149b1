mod hex;
mod lines;

pub use hex::{format_hex, parse_hex_payload};
pub use lines::HexLinesSource;

use thiserror::Error;

/// One device-to-application message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uplink {
    /// 1-based position in the source (line number for text sources).
    pub line: u64,
    pub port: u32,
    pub payload: Vec<u8>,
}

pub trait UplinkSource {
    fn next_uplink(&mut self) -> Result<Option<Uplink>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex digit '{ch}' at offset {offset}")]
    InvalidHexDigit { ch: char, offset: usize },
    #[error("odd number of hex digits: {digits}")]
    OddHexLength { digits: usize },
    #[error("invalid port '{value}'")]
    InvalidPort { value: String },
    #[error("line {line}: {source}")]
    Line {
        line: u64,
        #[source]
        source: Box<SourceError>,
    },
    #[error("line {line}: expected '<port> <hex payload>' or '<hex payload>'")]
    MalformedLine { line: u64 },
}
