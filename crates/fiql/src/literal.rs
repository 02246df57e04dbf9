//! Right-hand side literal handling: decoding, ranges and alternations.

use std::borrow::Cow;

use crate::error::{FiqlError, Result};

/// Percent-decodes a literal the way a URL query value is decoded.
///
/// `+` becomes a space and `%XX` becomes the byte `XX`; the resulting bytes
/// are read as UTF-8, replacing invalid sequences. A `%` that is not followed
/// by two hex digits is an error. With `unescape_control_sequences`, the
/// two-character sequences `\n`, `\t` and `\r` are turned into the control
/// characters they name.
pub fn decode(raw: &str, unescape_control_sequences: bool) -> Result<String> {
    check_percent_escapes(raw)?;

    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    let decoded = String::from_utf8_lossy(&bytes).into_owned();

    if unescape_control_sequences {
        Ok(unescape_control(&decoded).into_owned())
    } else {
        Ok(decoded)
    }
}

fn check_percent_escapes(raw: &str) -> Result<()> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(FiqlError::Decode {
                    literal: raw.to_string(),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn unescape_control(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("\\n", "\n")
            .replace("\\t", "\t")
            .replace("\\r", "\r"),
    )
}

/// Splits a `low~high` range.
///
/// Returns `Ok(None)` when the literal has no `~`. Both bounds must be
/// present and non-empty.
pub fn range<'a>(selector: &str, literal: &'a str) -> Result<Option<(&'a str, &'a str)>> {
    if !literal.contains('~') {
        return Ok(None);
    }

    let mut parts = literal.split('~');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(low), Some(high), None) if !low.is_empty() && !high.is_empty() => {
            Ok(Some((low, high)))
        }
        _ => Err(FiqlError::MalformedRange {
            selector: selector.to_string(),
            literal: literal.to_string(),
        }),
    }
}

/// Returns the text between a literal's enclosing `[` and `]`, if any.
pub fn bracketed(literal: &str) -> Option<&str> {
    if literal.len() < 2 {
        return None;
    }
    literal.strip_prefix('[')?.strip_suffix(']')
}

/// A `|`-separated list of alternatives taken from the undecoded literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation<'a> {
    /// Whole alternation was wrapped in `[...]`: match by substring.
    pub contains: bool,
    /// Raw (still percent-encoded) alternatives.
    pub options: Vec<&'a str>,
}

/// Splits a raw literal on `|`.
///
/// Escaped bars arrive here as `%7C` and do not split.
pub fn alternation(raw: &str) -> Option<Alternation<'_>> {
    if !raw.contains('|') {
        return None;
    }

    let (contains, body) = match bracketed(raw) {
        Some(inner) => (true, inner),
        None => (false, raw),
    };

    Some(Alternation {
        contains,
        options: body.split('|').collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_like_a_query_value() {
        assert_eq!(decode("a%2Cb", false).unwrap(), "a,b");
        assert_eq!(decode("hello+world", false).unwrap(), "hello world");
        assert_eq!(decode("M%C3%BCller", false).unwrap(), "Müller");
        assert_eq!(decode("plain", false).unwrap(), "plain");
    }

    #[test]
    fn malformed_percent_is_an_error() {
        assert!(matches!(decode("50%", false), Err(FiqlError::Decode { .. })));
        assert!(matches!(decode("%G1", false), Err(FiqlError::Decode { .. })));
        assert!(matches!(decode("%4", false), Err(FiqlError::Decode { .. })));
    }

    #[test]
    fn control_sequences_only_when_enabled() {
        assert_eq!(decode(r"a\nb", false).unwrap(), r"a\nb");
        assert_eq!(decode(r"a\nb\tc\rd", true).unwrap(), "a\nb\tc\rd");
    }

    #[test]
    fn ranges() {
        assert_eq!(range("n", "5").unwrap(), None);
        assert_eq!(range("n", "5~10").unwrap(), Some(("5", "10")));
        assert!(matches!(
            range("n", "~10"),
            Err(FiqlError::MalformedRange { .. })
        ));
        assert!(range("n", "5~").is_err());
        assert!(range("n", "1~2~3").is_err());
    }

    #[test]
    fn brackets() {
        assert_eq!(bracketed("[abc]"), Some("abc"));
        assert_eq!(bracketed("[]"), Some(""));
        assert_eq!(bracketed("["), None);
        assert_eq!(bracketed("]"), None);
        assert_eq!(bracketed("abc]"), None);
    }

    #[test]
    fn alternations() {
        assert_eq!(alternation("abc"), None);
        assert_eq!(
            alternation("a|b*"),
            Some(Alternation {
                contains: false,
                options: vec!["a", "b*"],
            })
        );
        assert_eq!(
            alternation("[a|b]"),
            Some(Alternation {
                contains: true,
                options: vec!["a", "b"],
            })
        );
        assert_eq!(alternation("a%7Cb"), None);
    }
}
