//! Wildcard-to-regex translation for string comparisons.
//!
//! `*` matches one or more characters, `?` exactly one. A backslash makes the
//! next character literal, so `\*`, `\?` and `\\` match themselves. Everything
//! else is quoted, so regex metacharacters in a literal never act as syntax.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Translates a glob literal into an unanchored regex pattern.
pub fn to_pattern(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() * 2);
    let mut chars = glob.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // A trailing lone backslash escapes nothing and is dropped.
                if let Some(next) = chars.next() {
                    push_literal(&mut pattern, next);
                }
            }
            '*' => pattern.push_str(".+"),
            '?' => pattern.push('.'),
            other => push_literal(&mut pattern, other),
        }
    }

    pattern
}

fn push_literal(pattern: &mut String, c: char) {
    match c {
        '\n' => pattern.push_str(r"\n"),
        '\t' => pattern.push_str(r"\t"),
        '\r' => pattern.push_str(r"\r"),
        '\u{8}' => pattern.push_str(r"\x08"),
        '\u{c}' => pattern.push_str(r"\f"),
        '\0' => pattern.push_str(r"\x00"),
        other => {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(other.encode_utf8(&mut buf)));
        }
    }
}

fn compile(pattern: &str, ignore_case: bool) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()?)
}

/// Returns `true` if the whole of `value` matches `glob`.
pub fn string_equals(glob: &str, value: &str, ignore_case: bool) -> Result<bool> {
    let regex = compile(&format!(r"\A(?:{})\z", to_pattern(glob)), ignore_case)?;
    Ok(regex.is_match(value))
}

/// Returns `true` if some substring of `value` matches `glob`.
pub fn string_contains(glob: &str, value: &str, ignore_case: bool) -> Result<bool> {
    let regex = compile(&to_pattern(glob), ignore_case)?;
    Ok(regex.is_match(value))
}
