//! Minimal XML text escaping for feed output.
//!
//! Every externally supplied value is entity-escaped - the same strategy
//! for free text and URLs, since unescaped ampersands in query strings are
//! the most common corruption source in practice. CDATA is deliberately
//! not used anywhere so one strategy covers the whole document.

use std::borrow::Cow;

/// Escape the five reserved XML characters.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
#[must_use]
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
