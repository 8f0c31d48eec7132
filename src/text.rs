//! Text helpers shared by the exporter and the reports

use std::fmt::Display;

/// The whitespace set of a browser's `\s`: Unicode space separators, the
/// ASCII controls, line and paragraph separators, and U+FEFF. U+0085 is not
/// in it and survives normalization.
fn is_collapsible(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Collapse every whitespace run to one space and trim both ends.
///
/// Idempotent: normalizing an already normalized string returns it unchanged.
pub fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split(is_collapsible).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Insert `,` thousands separators into the leading integer digits.
///
/// An optional sign is kept, fraction and suffix are copied untouched, and
/// values without a leading digit run are returned as-is.
pub fn format_number(value: impl Display) -> String {
    let s = value.to_string();
    let (sign, rest) = match s.strip_prefix(|c: char| c == '-' || c == '+') {
        Some(rest) => (&s[..1], rest),
        None => ("", s.as_str()),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, tail) = rest.split_at(digits_end);
    if digits.is_empty() {
        return s;
    }

    let mut out = String::with_capacity(s.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(tail);
    out
}
