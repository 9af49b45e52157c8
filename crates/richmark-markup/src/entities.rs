//! Entity decoding and escaping for tagged text.
//!
//! Only the five XML entities are recognized. [`escape`] is the inverse of
//! the parser's decoding, so escaped text always parses back to itself.

use std::borrow::Cow;

/// Map an entity name (without `&` and `;`) to the scalar it stands for.
///
/// Names are case-sensitive. Unknown names return `None`.
#[must_use]
pub fn decode_entity(name: &str) -> Option<char> {
    Some(match name {
        "quot" => '"',
        "amp" => '&',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        _ => return None,
    })
}

/// Escape the markup-significant scalars of `text`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Example
///
/// ```
/// use richmark_markup::{escape, parse};
///
/// let raw = "1 < 2 & \"quotes\"";
/// assert_eq!(escape(raw), "1 &lt; 2 &amp; &quot;quotes&quot;");
/// assert_eq!(parse(&escape(raw)).text, raw);
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
