//! Tag occurrences parsed from `<name ...>` tokens.

use std::ops::Range;

use crate::charset::Alphanumeric;
use crate::scanner::Scanner;

/// Name of the self-closing line break tag.
pub const LINE_BREAK_TAG: &str = "br";

/// One parsed tag occurrence.
///
/// While a tag is open only the lower bound of its range is meaningful; the
/// parser sets the upper bound when the matching close tag is found. Tags
/// returned in [`Markup::tags`](crate::Markup::tags) are always closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    is_open: bool,
    range: Option<Range<usize>>,
    attributes: TagAttributes,
}

impl Tag {
    /// Parse the body of a tag token (the text between `<` and `>`).
    ///
    /// A leading `/` marks a close tag. The name is the leading run of
    /// alphanumeric scalars; whatever follows is kept as [`TagAttributes`].
    /// Returns `None` when no name can be read.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_markup::Tag;
    ///
    /// let tag = Tag::parse(r#"a href="https://example.com""#).unwrap();
    /// assert_eq!(tag.name(), "a");
    /// assert!(tag.is_open());
    /// assert_eq!(tag.attributes().get("href"), Some("https://example.com"));
    ///
    /// assert!(!Tag::parse("/a").unwrap().is_open());
    /// assert!(Tag::parse(" ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut scanner = Scanner::new(raw);
        let is_open = !scanner.match_char('/');
        let name = scanner.scan_until_in(Alphanumeric).ok()?;
        Some(Self {
            name: name.to_owned(),
            is_open,
            range: None,
            attributes: TagAttributes::parse(scanner.remainder()),
        })
    }

    /// The tag name. Matching between open and close tags is case-sensitive.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` for `<name>`, `false` for `</name>`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// `true` for the `br` line break tag, open or close.
    #[must_use]
    pub fn is_line_break(&self) -> bool {
        self.name == LINE_BREAK_TAG
    }

    /// Byte range covered in the plain text, once known.
    #[must_use]
    pub fn range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    /// Attributes written after the tag name.
    #[must_use]
    pub fn attributes(&self) -> &TagAttributes {
        &self.attributes
    }

    pub(crate) fn open_at(&mut self, start: usize) {
        self.range = Some(start..start);
    }

    pub(crate) fn close_at(&mut self, end: usize) {
        let start = self.range.as_ref().map_or(end, |r| r.start);
        self.range = Some(start..end);
    }
}

/// Ordered `key=value` pairs written after a tag name.
///
/// Supports `key="value"`, `key='value'`, `key=value` and bare `key` (empty
/// value). The markup core never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAttributes {
    items: Vec<(String, String)>,
}

impl TagAttributes {
    /// Parse an attribute string such as ` href="x" bold`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let mut items = Vec::new();
        let mut remaining = s.trim();

        while !remaining.is_empty() {
            if let Some((key, value, rest)) = parse_key_value(remaining) {
                items.push((key.to_owned(), value.to_owned()));
                remaining = rest.trim_start();
            } else {
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                let key = remaining[..end].trim_end_matches('/');
                if !key.is_empty() {
                    items.push((key.to_owned(), String::new()));
                }
                remaining = remaining[end..].trim_start();
            }
        }

        Self { items }
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if no attributes were written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Split `key=value` off the front of `s`.
///
/// Returns `(key, value, rest)`; `None` when the first token has no `=`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let token_end = s.find(char::is_whitespace).unwrap_or(s.len());
    let eq_pos = s[..token_end].find('=')?;
    let key = s[..eq_pos].trim();
    if key.is_empty() {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"').unwrap_or(stripped.len());
        let rest = stripped.get(end_quote + 1..).unwrap_or("");
        Some((key, &stripped[..end_quote], rest))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'').unwrap_or(stripped.len());
        let rest = stripped.get(end_quote + 1..).unwrap_or("");
        Some((key, &stripped[..end_quote], rest))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        let value = after_eq[..end].trim_end_matches('/');
        Some((key, value, &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_tag() {
        let tag = Tag::parse("bold").unwrap();
        assert_eq!(tag.name(), "bold");
        assert!(tag.is_open());
        assert!(tag.range().is_none());
        assert!(tag.attributes().is_empty());
    }

    #[test]
    fn test_parse_close_tag() {
        let tag = Tag::parse("/bold").unwrap();
        assert_eq!(tag.name(), "bold");
        assert!(!tag.is_open());
    }

    #[test]
    fn test_name_stops_at_non_alphanumeric() {
        let tag = Tag::parse("h1-title").unwrap();
        assert_eq!(tag.name(), "h1");
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(Tag::parse("").is_none());
        assert!(Tag::parse("/").is_none());
        assert!(Tag::parse(" b").is_none());
        assert!(Tag::parse("!--").is_none());
    }

    #[test]
    fn test_line_break() {
        assert!(Tag::parse("br").unwrap().is_line_break());
        assert!(Tag::parse("br/").unwrap().is_line_break());
        assert!(Tag::parse("/br").unwrap().is_line_break());
        assert!(!Tag::parse("bra").unwrap().is_line_break());
    }

    #[test]
    fn test_open_and_close_range() {
        let mut tag = Tag::parse("i").unwrap();
        tag.open_at(3);
        assert_eq!(tag.range(), Some(3..3));
        tag.close_at(7);
        assert_eq!(tag.range(), Some(3..7));
    }

    #[test]
    fn test_attribute_forms() {
        let attrs = TagAttributes::parse(r#" href="a b" color='#f00' size=12 hidden"#);
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get("href"), Some("a b"));
        assert_eq!(attrs.get("color"), Some("#f00"));
        assert_eq!(attrs.get("size"), Some("12"));
        assert_eq!(attrs.get("hidden"), Some(""));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let attrs = TagAttributes::parse("b=2 a=1");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_self_closing_slash_ignored() {
        let tag = Tag::parse(r#"img src=pic.png /"#).unwrap();
        assert_eq!(tag.attributes().get("src"), Some("pic.png"));
        assert_eq!(tag.attributes().len(), 1);
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        let attrs = TagAttributes::parse(r#"title="never closed"#);
        assert_eq!(attrs.get("title"), Some("never closed"));
    }
}
