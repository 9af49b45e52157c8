//! Binds parsed tags to styles.
//!
//! Resolution produces an ordered list of [`ResolvedSpan`]s. Applying them in
//! order with add-semantics gives the final formatting: the default style
//! covers the whole text first, then each tag's style is layered over its
//! range in *completion order*. Where two tagged ranges overlap, the tag whose
//! close tag was matched later wins on conflicting keys, even if it is the
//! outer one.

use std::ops::Range;

use richmark_markup::Tag;

use crate::{Attributes, RenderTarget, Style, StyleTable, TagAttributesResolver};

/// A byte range of plain text and the attributes to layer over it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedSpan {
    pub range: Range<usize>,
    pub attributes: Attributes,
}

/// Optional inputs to [`resolve_with`].
#[derive(Default, Clone, Copy)]
pub struct ResolveOptions<'a> {
    /// Applied to the whole text before the table's default style.
    pub base: Option<&'a Style>,
    /// Consulted for tag attributes and for tags with no style.
    pub dynamic: Option<&'a dyn TagAttributesResolver>,
}

impl<'a> ResolveOptions<'a> {
    #[must_use]
    pub fn with_base(mut self, base: &'a Style) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_dynamic(mut self, dynamic: &'a dyn TagAttributesResolver) -> Self {
        self.dynamic = Some(dynamic);
        self
    }
}

/// Resolve `tags` over `text` against `table`.
///
/// Tags with no style in the table produce no span.
///
/// # Example
///
/// ```
/// use richmark_markup::parse;
/// use richmark_style::{resolve, Style, StyleTable};
///
/// let markup = parse("a <b>bold</b> <x>move</x>");
/// let table = StyleTable::from_styles([
///     Style::default_style().with_size(12.0),
///     Style::named("b").with_weight(700),
/// ]);
///
/// let spans = resolve(&markup.text, &markup.tags, &table);
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].range, 0..11);
/// assert_eq!(spans[1].range, 2..6);
/// ```
#[must_use]
pub fn resolve(text: &str, tags: &[Tag], table: &StyleTable) -> Vec<ResolvedSpan> {
    resolve_with(text, tags, table, ResolveOptions::default())
}

/// [`resolve`] with an optional base style and dynamic attribute resolver.
#[must_use]
pub fn resolve_with(
    text: &str,
    tags: &[Tag],
    table: &StyleTable,
    options: ResolveOptions<'_>,
) -> Vec<ResolvedSpan> {
    let whole = 0..text.len();
    let mut spans = Vec::with_capacity(tags.len() + 2);

    if let Some(base) = options.base {
        spans.push(ResolvedSpan {
            range: whole.clone(),
            attributes: base.attributes().clone(),
        });
    }
    if let Some(default) = table.default_style() {
        spans.push(ResolvedSpan {
            range: whole,
            attributes: default.attributes().clone(),
        });
    }

    for tag in tags {
        let Some(range) = tag.range() else {
            continue;
        };
        match table.get(tag.name()) {
            Some(style) => {
                let mut attributes = style.attributes().clone();
                if let Some(extra) = options
                    .dynamic
                    .and_then(|d| d.attributes_for_tag(tag, style))
                {
                    attributes.extend_from(&extra);
                }
                spans.push(ResolvedSpan { range, attributes });
            }
            None => {
                if let Some(attributes) = options
                    .dynamic
                    .and_then(|d| d.attributes_for_unknown_tag(tag))
                {
                    spans.push(ResolvedSpan { range, attributes });
                } else {
                    tracing::trace!(tag = tag.name(), "no style for tag");
                }
            }
        }
    }

    spans
}

/// Layer `spans` onto `target` in order.
pub fn apply_spans<T: RenderTarget + ?Sized>(target: &mut T, spans: &[ResolvedSpan]) {
    for span in spans {
        target.add_attributes(span.range.clone(), &span.attributes);
    }
}
