//! Markup parser: tagged text in, plain text plus closed tags out.
//!
//! The parser walks the input once with a [`Scanner`], accumulating plain
//! text up to each `<` or `&`. Tags are kept on an explicit open-stack; a
//! close tag is matched against the nearest open tag with the same name, so
//! the output tag list is in *completion order*, not open order.
//!
//! Malformed input never fails the parse. Every recovery is recorded as a
//! [`ParseDiagnostic`] on the returned [`Markup`].

use crate::entities::decode_entity;
use crate::scanner::Scanner;
use crate::tag::Tag;

/// Scalars that end a run of plain text.
const SPECIAL: [char; 2] = ['<', '&'];

/// Result of parsing tagged text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Input with tags removed and entities decoded.
    pub text: String,
    /// Closed tags in the order their close tag was matched.
    ///
    /// Every tag carries a byte range into [`text`](Self::text).
    pub tags: Vec<Tag>,
    /// Recoveries performed while parsing, in input order.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Markup {
    /// Returns `true` if the input parsed without any recovery.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Closed tags named `name`, in completion order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.name() == name)
    }
}

/// A recovery made while parsing degraded input.
///
/// Offsets are byte offsets into the *input*, pointing at the `<` or `&`
/// that started the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDiagnostic {
    /// A `<...>` body with no readable tag name; the token was dropped.
    #[error("malformed tag <{body}> at offset {offset}")]
    MalformedTag { offset: usize, body: String },

    /// A close tag with no matching open tag; it was ignored.
    #[error("close tag </{name}> at offset {offset} has no matching open tag")]
    UnmatchedCloseTag { offset: usize, name: String },

    /// A tag still open at end of input; it was dropped.
    #[error("tag <{name}> opened at offset {offset} is never closed")]
    UnterminatedOpenTag { offset: usize, name: String },

    /// An `&name;` entity outside the supported set; it was dropped.
    #[error("unknown entity &{name}; at offset {offset}")]
    UnknownEntity { offset: usize, name: String },

    /// An `&` with no `;` after it; the `&` was kept as text.
    #[error("unterminated entity at offset {offset}")]
    UnterminatedEntity { offset: usize },

    /// A `<` with no `>` after it; the `<` was kept as text.
    #[error("unterminated tag at offset {offset}")]
    UnterminatedTag { offset: usize },
}

impl ParseDiagnostic {
    /// Byte offset into the input where the problem starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::MalformedTag { offset, .. }
            | Self::UnmatchedCloseTag { offset, .. }
            | Self::UnterminatedOpenTag { offset, .. }
            | Self::UnknownEntity { offset, .. }
            | Self::UnterminatedEntity { offset }
            | Self::UnterminatedTag { offset } => *offset,
        }
    }
}

/// Parse tagged text into plain text and closed tags.
///
/// Supports `<name>...</name>` tags, the line break `<br>` (also `<br/>` and
/// `</br>`), and the entities `&quot; &amp; &apos; &lt; &gt;`.
///
/// # Example
///
/// ```
/// use richmark_markup::parse;
///
/// let markup = parse("<b>x<i>y</i>z</b>");
/// assert_eq!(markup.text, "xyz");
///
/// let names: Vec<_> = markup.tags.iter().map(|t| (t.name(), t.range())).collect();
/// assert_eq!(names, vec![("i", Some(1..2)), ("b", Some(0..3))]);
/// ```
#[must_use]
pub fn parse(input: &str) -> Markup {
    Parser::new(input).run()
}

/// An open tag waiting for its close tag.
struct OpenTag {
    tag: Tag,
    offset: usize,
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    text: String,
    open: Vec<OpenTag>,
    tags: Vec<Tag>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
            text: String::with_capacity(input.len()),
            open: Vec::new(),
            tags: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> Markup {
        loop {
            if let Ok(run) = self.scanner.scan_up_to(SPECIAL) {
                self.text.push_str(run);
            }
            match self.scanner.peek_char() {
                None => break,
                Some('&') => self.entity(),
                Some('<') => self.tag(),
                Some(c) => {
                    // scan_up_to only stops on SPECIAL or at the end
                    self.text.push(c);
                    let _ = self.scanner.scan_char();
                }
            }
        }

        for OpenTag { tag, offset } in self.open.drain(..) {
            tracing::debug!(tag = tag.name(), offset, "dropping unterminated open tag");
            self.diagnostics.push(ParseDiagnostic::UnterminatedOpenTag {
                offset,
                name: tag.name().to_owned(),
            });
        }
        self.diagnostics.sort_by_key(ParseDiagnostic::offset);

        Markup {
            text: self.text,
            tags: self.tags,
            diagnostics: self.diagnostics,
        }
    }

    /// Handle an `&` at the cursor.
    fn entity(&mut self) {
        let offset = self.scanner.position();
        self.scanner.match_char('&');

        let Ok(name) = self.scanner.scan_until_char(';') else {
            tracing::debug!(offset, "unterminated entity kept as text");
            self.diagnostics
                .push(ParseDiagnostic::UnterminatedEntity { offset });
            self.text.push('&');
            return;
        };
        self.scanner.match_char(';');

        if let Some(c) = decode_entity(name) {
            self.text.push(c);
        } else {
            tracing::debug!(entity = name, offset, "dropping unknown entity");
            self.diagnostics.push(ParseDiagnostic::UnknownEntity {
                offset,
                name: name.to_owned(),
            });
        }
    }

    /// Handle a `<` at the cursor.
    fn tag(&mut self) {
        let offset = self.scanner.position();
        self.scanner.match_char('<');

        let Ok(body) = self.scanner.scan_until_char('>') else {
            tracing::debug!(offset, "unterminated tag kept as text");
            self.diagnostics.push(ParseDiagnostic::UnterminatedTag { offset });
            self.text.push('<');
            return;
        };
        self.scanner.match_char('>');

        let Some(mut tag) = Tag::parse(body) else {
            tracing::debug!(body, offset, "dropping malformed tag");
            self.diagnostics.push(ParseDiagnostic::MalformedTag {
                offset,
                body: body.to_owned(),
            });
            return;
        };

        if tag.is_line_break() {
            self.text.push('\n');
            return;
        }

        if tag.is_open() {
            tag.open_at(self.text.len());
            self.open.push(OpenTag { tag, offset });
            return;
        }

        let matched = self
            .open
            .iter()
            .rposition(|open| open.tag.name() == tag.name());
        if let Some(index) = matched {
            let OpenTag { mut tag, .. } = self.open.remove(index);
            tag.close_at(self.text.len());
            self.tags.push(tag);
        } else {
            tracing::debug!(tag = tag.name(), offset, "ignoring unmatched close tag");
            self.diagnostics.push(ParseDiagnostic::UnmatchedCloseTag {
                offset,
                name: tag.name().to_owned(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn spans(markup: &Markup) -> Vec<(&str, std::ops::Range<usize>)> {
        markup
            .tags
            .iter()
            .map(|t| (t.name(), t.range().unwrap()))
            .collect()
    }

    #[test]
    fn test_plain_text_round_trips() {
        for input in ["", "hello", "multi\nline text", "ünïcödé ✓ 日本"] {
            let markup = parse(input);
            assert_eq!(markup.text, input);
            assert!(markup.tags.is_empty());
            assert!(markup.is_clean());
        }
    }

    #[test]
    fn test_balanced_nesting() {
        let markup = parse("<b>x<i>y</i>z</b>");
        assert_eq!(markup.text, "xyz");
        assert_eq!(spans(&markup), vec![("i", 1..2), ("b", 0..3)]);
    }

    #[test]
    fn test_unmatched_close_ignored() {
        let markup = parse("a</b>b");
        assert_eq!(markup.text, "ab");
        assert!(markup.tags.is_empty());
        assert_eq!(
            markup.diagnostics,
            vec![ParseDiagnostic::UnmatchedCloseTag {
                offset: 1,
                name: "b".to_owned()
            }]
        );
    }

    #[test]
    fn test_unterminated_open_dropped() {
        let markup = parse("<b>abc");
        assert_eq!(markup.text, "abc");
        assert!(markup.tags.is_empty());
        assert_eq!(
            markup.diagnostics,
            vec![ParseDiagnostic::UnterminatedOpenTag {
                offset: 0,
                name: "b".to_owned()
            }]
        );
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(parse("a &amp; b").text, "a & b");
        assert_eq!(
            parse("&lt;tag&gt; &quot;q&quot; &apos;s&apos;").text,
            "<tag> \"q\" 's'"
        );
    }

    #[test]
    fn test_unknown_entity_dropped() {
        let markup = parse("a&nbsp;b");
        assert_eq!(markup.text, "ab");
        assert_eq!(
            markup.diagnostics,
            vec![ParseDiagnostic::UnknownEntity {
                offset: 1,
                name: "nbsp".to_owned()
            }]
        );
    }

    #[test]
    fn test_unterminated_entity_kept() {
        let markup = parse("fish & <b>chips</b>");
        assert_eq!(markup.text, "fish & chips");
        assert_eq!(spans(&markup), vec![("b", 7..12)]);
        assert_eq!(
            markup.diagnostics,
            vec![ParseDiagnostic::UnterminatedEntity { offset: 5 }]
        );
    }

    #[test]
    fn test_line_break_substitution() {
        for input in ["a<br>b", "a<br/>b", "a</br>b", "a<br />b"] {
            let markup = parse(input);
            assert_eq!(markup.text, "a\nb", "input: {input}");
            assert!(markup.tags.is_empty());
            assert!(markup.is_clean());
        }
    }

    #[test]
    fn test_line_break_inside_tag_extends_range() {
        let markup = parse("<p>a<br>b</p>");
        assert_eq!(spans(&markup), vec![("p", 0..3)]);
    }

    #[test]
    fn test_same_name_nesting_matches_nearest() {
        let markup = parse("<b>a<b>b</b>c</b>");
        assert_eq!(markup.text, "abc");
        assert_eq!(spans(&markup), vec![("b", 1..2), ("b", 0..3)]);
    }

    #[test]
    fn test_crossed_tags_use_completion_order() {
        let markup = parse("<a>1<b>2</a>3</b>");
        assert_eq!(markup.text, "123");
        assert_eq!(spans(&markup), vec![("a", 0..2), ("b", 1..3)]);
    }

    #[test]
    fn test_empty_element_has_empty_range() {
        let markup = parse("x<e></e>y");
        assert_eq!(spans(&markup), vec![("e", 1..1)]);
    }

    #[test]
    fn test_malformed_tag_dropped() {
        let markup = parse("a< b>c");
        assert_eq!(markup.text, "ac");
        assert!(markup.tags.is_empty());
        assert!(matches!(
            markup.diagnostics.as_slice(),
            [ParseDiagnostic::MalformedTag { offset: 1, .. }]
        ));
    }

    #[test]
    fn test_unterminated_tag_kept() {
        let markup = parse("1 <b>x</b> < 2");
        assert_eq!(markup.text, "1 x < 2");
        assert_eq!(spans(&markup), vec![("b", 2..3)]);
        assert_eq!(
            markup.diagnostics,
            vec![ParseDiagnostic::UnterminatedTag { offset: 11 }]
        );
    }

    #[test]
    fn test_case_sensitive_matching() {
        let markup = parse("<B>x</b>");
        assert_eq!(markup.text, "x");
        assert!(markup.tags.is_empty());
        assert_eq!(markup.diagnostics.len(), 2);
    }

    #[test]
    fn test_ranges_are_byte_offsets() {
        let markup = parse("é<b>ü</b>");
        assert_eq!(markup.text, "éü");
        assert_eq!(spans(&markup), vec![("b", 2..4)]);
    }

    #[test]
    fn test_attributes_kept_on_tags() {
        let markup = parse(r#"<a href="https://example.com">link</a>"#);
        let tag = &markup.tags[0];
        assert_eq!(tag.attributes().get("href"), Some("https://example.com"));
        assert_eq!(tag.range(), Some(0..4));
    }

    #[test]
    fn test_diagnostics_sorted_by_offset() {
        let markup = parse("<u>a</x>&zz;");
        let offsets: Vec<_> = markup.diagnostics.iter().map(ParseDiagnostic::offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
    }

    #[test]
    fn test_tags_named() {
        let markup = parse("<b>1</b><i>2</i><b>3</b>");
        assert_eq!(markup.tags_named("b").count(), 2);
        assert_eq!(markup.tags_named("u").count(), 0);
    }

    #[test]
    fn test_escape_round_trip() {
        let raw = "if a < b && c > d { \"x\" } 'y'";
        assert_eq!(parse(&crate::escape(raw)).text, raw);
    }
}
