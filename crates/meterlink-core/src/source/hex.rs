use super::SourceError;

/// Parse a hex payload as pasted from a network server console.
///
/// Accepts an optional `0x` prefix, either digit case, and ignores
/// whitespace as well as `:` and `-` separators. Offsets in errors are byte
/// offsets into `text`.
///
/// # Examples
/// ```
/// use meterlink_core::parse_hex_payload;
///
/// assert_eq!(parse_hex_payload("0000803F")?, vec![0x00, 0x00, 0x80, 0x3f]);
/// assert_eq!(parse_hex_payload("0x00:00:80:3f")?, vec![0x00, 0x00, 0x80, 0x3f]);
/// assert!(parse_hex_payload("0000803").is_err());
/// # Ok::<(), meterlink_core::SourceError>(())
/// ```
pub fn parse_hex_payload(text: &str) -> Result<Vec<u8>, SourceError> {
    let trimmed = text.trim_start();
    let skipped = text.len() - trimmed.len();
    let (body, base) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(rest) => (rest, skipped + 2),
        None => (trimmed, skipped),
    };

    let mut nibbles = Vec::with_capacity(body.len());
    for (index, ch) in body.char_indices() {
        if ch.is_whitespace() || ch == ':' || ch == '-' {
            continue;
        }
        let nibble = ch.to_digit(16).ok_or(SourceError::InvalidHexDigit {
            ch,
            offset: base + index,
        })?;
        nibbles.push(nibble as u8);
    }

    if nibbles.len() % 2 != 0 {
        return Err(SourceError::OddHexLength {
            digits: nibbles.len(),
        });
    }

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Lowercase hex without separators.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::{format_hex, parse_hex_payload};
    use crate::source::SourceError;

    #[test]
    fn parses_plain_digits() {
        assert_eq!(
            parse_hex_payload("0000803f00000040").unwrap(),
            vec![0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0x40]
        );
    }

    #[test]
    fn accepts_prefix_case_and_separators() {
        let expected = vec![0xde, 0xad, 0xbe, 0xef];
        assert_eq!(parse_hex_payload("0xDEADBEEF").unwrap(), expected);
        assert_eq!(parse_hex_payload("  de ad-be:ef \n").unwrap(), expected);
        assert_eq!(parse_hex_payload("0XdeAD beEF").unwrap(), expected);
    }

    #[test]
    fn empty_text_is_empty_payload() {
        assert!(parse_hex_payload("").unwrap().is_empty());
        assert!(parse_hex_payload("   ").unwrap().is_empty());
        assert!(parse_hex_payload("0x").unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_digit_with_offset() {
        let err = parse_hex_payload("0x00zz").unwrap_err();
        assert!(matches!(
            err,
            SourceError::InvalidHexDigit { ch: 'z', offset: 4 }
        ));
        assert!(err.to_string().contains("invalid hex digit"));
    }

    #[test]
    fn rejects_odd_digit_count() {
        let err = parse_hex_payload("abc").unwrap_err();
        assert!(matches!(err, SourceError::OddHexLength { digits: 3 }));
    }

    #[test]
    fn formats_lowercase_without_separators() {
        assert_eq!(format_hex(&[0x00, 0x0a, 0xff]), "000aff");
        assert_eq!(format_hex(&[]), "");
    }
}
