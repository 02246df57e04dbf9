//! Rewrites backslash-escaped reserved characters before structural scanning.

/// Escape sequences and their percent-encoded replacement, applied in order.
const RESERVED: &[(&str, &str)] = &[
    ("\\(", "%28"),
    ("\\)", "%29"),
    ("\\;", "%3B"),
    ("\\,", "%2C"),
    ("\\==", "%3D%3D"),
    ("\\!=", "%21%3D"),
    ("\\<=", "%3C%3D"),
    ("\\>=", "%3E%3D"),
    ("\\<", "%3C"),
    ("\\>", "%3E"),
    ("\\=#=", "%3D%23%3D"),
    ("\\!#=", "%21%23%3D"),
    ("\\~", "%7E"),
    ("\\|", "%7C"),
    ("\\[", "%5B"),
    ("\\]", "%5D"),
];

/// Replaces every escaped reserved character with its percent-encoded form.
///
/// The placeholders are decoded again when a literal is percent-decoded, so
/// `name==a\,b` compares `name` against `a,b` without splitting on the comma.
pub fn escape(query: &str) -> String {
    RESERVED
        .iter()
        .fold(query.to_string(), |acc, (from, to)| acc.replace(from, to))
}
