//! Quoted-string decoding for PO directives
//!
//! Every PO payload is a double-quoted token using C-style escapes.
//! `\xHH` and `\NNN` produce raw bytes, so multi-byte UTF-8 sequences written
//! byte by byte decode to the intended character.

use std::str::Chars;

use thiserror::Error;

/// Why a quoted token could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The token is shorter than a pair of quotes.
    #[error("token too short")]
    TooShort,

    /// The token does not start and end with `"`.
    #[error("token is not enclosed in double quotes")]
    MissingQuotes,

    /// A bare `"` appears inside the token.
    #[error("unescaped quote inside token")]
    UnescapedQuote,

    /// A raw newline appears inside the token.
    #[error("raw newline inside token")]
    Newline,

    /// The token ends in the middle of an escape sequence.
    #[error("unterminated escape sequence")]
    TrailingBackslash,

    /// `\` followed by a character that starts no escape.
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),

    /// A numeric escape has too few or invalid digits.
    #[error("malformed numeric escape")]
    InvalidDigits,

    /// An octal escape above `\377`.
    #[error("octal escape out of range: {0:#o}")]
    OctalOutOfRange(u32),

    /// A `\u`/`\U` escape that is not a Unicode scalar value.
    #[error("invalid code point U+{0:04X}")]
    InvalidCodePoint(u32),
}

/// Decode a double-quoted PO token into its literal value.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the delimiters are missing or misplaced or
/// an escape sequence is malformed.
///
/// # Example
///
/// ```
/// use pocatalog::formats::po::unquote;
///
/// assert_eq!(unquote(r#""Line 1\nLine 2""#).unwrap(), "Line 1\nLine 2");
/// assert!(unquote(r#""dangling\""#).is_err());
/// ```
pub fn unquote(token: &str) -> Result<String, DecodeError> {
    if token.len() < 2 {
        return Err(DecodeError::TooShort);
    }
    let inner = token
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(DecodeError::MissingQuotes)?;

    // Fast path: nothing to unescape
    if !inner.contains(['\\', '"', '\n']) {
        return Ok(inner.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(DecodeError::UnescapedQuote),
            '\n' => return Err(DecodeError::Newline),
            '\\' => decode_escape(&mut chars, &mut out)?,
            _ => push_char(&mut out, c),
        }
    }

    Ok(String::from_utf8(out)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// Check that a payload is delimited by quotes on both ends.
///
/// This does not validate the escapes; use [`unquote`] for that.
#[must_use]
pub fn is_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

fn decode_escape(chars: &mut Chars<'_>, out: &mut Vec<u8>) -> Result<(), DecodeError> {
    let esc = chars.next().ok_or(DecodeError::TrailingBackslash)?;
    match esc {
        'a' => out.push(0x07),
        'b' => out.push(0x08),
        'f' => out.push(0x0C),
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        'v' => out.push(0x0B),
        '\\' | '"' | '\'' | '?' => push_char(out, esc),
        '0'..='7' => {
            let high = esc.to_digit(8).unwrap_or_default();
            let value = (high << 6) | take_digits(chars, 2, 8)?;
            let byte = u8::try_from(value).map_err(|_| DecodeError::OctalOutOfRange(value))?;
            out.push(byte);
        }
        'x' => {
            let value = take_digits(chars, 2, 16)?;
            out.push(u8::try_from(value).map_err(|_| DecodeError::InvalidDigits)?);
        }
        'u' | 'U' => {
            let width = if esc == 'u' { 4 } else { 8 };
            let value = take_digits(chars, width, 16)?;
            let ch = char::from_u32(value).ok_or(DecodeError::InvalidCodePoint(value))?;
            push_char(out, ch);
        }
        other => return Err(DecodeError::UnknownEscape(other)),
    }
    Ok(())
}

fn take_digits(chars: &mut Chars<'_>, count: usize, radix: u32) -> Result<u32, DecodeError> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or(DecodeError::InvalidDigits)?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token() {
        assert_eq!(unquote(r#""valid 1""#).unwrap(), "valid 1");
        assert_eq!(unquote(r#""""#).unwrap(), "");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unquote(r#""a\nb""#).unwrap(), "a\nb");
        assert_eq!(unquote(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
        assert_eq!(unquote(r#""tab\there""#).unwrap(), "tab\there");
        assert_eq!(unquote(r#""it\'s\?""#).unwrap(), "it's?");
    }

    #[test]
    fn test_backslash_then_n_is_literal() {
        // "\\n" means backslash followed by n, not a newline
        assert_eq!(unquote(r#""line\\nend""#).unwrap(), "line\\nend");
        assert_eq!(unquote(r#""path\\to\\file""#).unwrap(), "path\\to\\file");
    }

    #[test]
    fn test_numeric_escapes() {
        assert_eq!(unquote(r#""\101\x42""#).unwrap(), "AB");
        assert_eq!(unquote(r#""caf\xc3\xa9""#).unwrap(), "café");
        assert_eq!(unquote(r#""é\U0001F600""#).unwrap(), "é😀");
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(unquote(r#""Olá, %s!""#).unwrap(), "Olá, %s!");
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(unquote("\""), Err(DecodeError::TooShort));
        assert_eq!(unquote("abc"), Err(DecodeError::MissingQuotes));
        assert_eq!(unquote(r#""abc"#), Err(DecodeError::MissingQuotes));
        assert_eq!(unquote(r#"""""#), Err(DecodeError::UnescapedQuote));
        assert_eq!(unquote(r#""abc\""#), Err(DecodeError::TrailingBackslash));
        assert_eq!(unquote(r#""\q""#), Err(DecodeError::UnknownEscape('q')));
        assert_eq!(unquote(r#""\x4""#), Err(DecodeError::InvalidDigits));
        assert_eq!(unquote(r#""\777""#), Err(DecodeError::OctalOutOfRange(0o777)));
        assert_eq!(
            unquote(r#""\ud800""#),
            Err(DecodeError::InvalidCodePoint(0xD800))
        );
    }

    #[test]
    fn test_is_quoted() {
        assert!(is_quoted(r#""valid 1""#));
        assert!(is_quoted(r#""""#));
        assert!(!is_quoted("\""));
        assert!(!is_quoted("+"));
        assert!(!is_quoted(r#""open"#));
    }
}
