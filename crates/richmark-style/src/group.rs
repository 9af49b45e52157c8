//! Markup mode: parse tagged text and style each tag by name.

use std::fmt;
use std::sync::Arc;

use richmark_markup::{Markup, parse};

use crate::{
    AttributedString, ResolveOptions, ResolvedSpan, StandardResolver, Style, StyleTable,
    TagAttributesResolver, apply_spans, resolve_with,
};

/// A style table plus optional base style and dynamic attribute resolver.
///
/// # Example
///
/// ```
/// use richmark_style::{AttributeKey, Style, TagGroup};
///
/// let group = TagGroup::new([
///     Style::default_style().with_size(12.0),
///     Style::named("em").with_italic(true),
/// ]);
/// let rendered = group.render("plain <em>stressed</em>");
///
/// assert_eq!(rendered.as_str(), "plain stressed");
/// assert!(rendered.attributes_at(6).unwrap().contains(&AttributeKey::Italic));
/// assert!(!rendered.attributes_at(0).unwrap().contains(&AttributeKey::Italic));
/// ```
#[derive(Clone, Default)]
pub struct TagGroup {
    table: StyleTable,
    base: Option<Style>,
    dynamic: Option<Arc<dyn TagAttributesResolver>>,
}

impl TagGroup {
    pub fn new(styles: impl IntoIterator<Item = Style>) -> Self {
        Self::from_table(StyleTable::from_styles(styles))
    }

    #[must_use]
    pub fn from_table(table: StyleTable) -> Self {
        Self {
            table,
            base: None,
            dynamic: None,
        }
    }

    /// Style applied to the whole text before the table's default style.
    #[must_use]
    pub fn with_base(mut self, base: Style) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_dynamic(mut self, resolver: impl TagAttributesResolver + 'static) -> Self {
        self.dynamic = Some(Arc::new(resolver));
        self
    }

    /// Use [`StandardResolver`] for tag attributes.
    #[must_use]
    pub fn with_standard_resolver(self) -> Self {
        self.with_dynamic(StandardResolver)
    }

    #[must_use]
    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut StyleTable {
        &mut self.table
    }

    #[must_use]
    pub fn base(&self) -> Option<&Style> {
        self.base.as_ref()
    }

    fn options(&self) -> ResolveOptions<'_> {
        ResolveOptions {
            base: self.base.as_ref(),
            dynamic: self.dynamic.as_deref(),
        }
    }

    /// Resolved spans for already parsed markup.
    #[must_use]
    pub fn spans(&self, markup: &Markup) -> Vec<ResolvedSpan> {
        resolve_with(&markup.text, &markup.tags, &self.table, self.options())
    }

    /// Spans that apply to text without tags: the base and default styles.
    #[must_use]
    pub fn untagged_spans(&self, text: &str) -> Vec<ResolvedSpan> {
        resolve_with(text, &[], &self.table, self.options())
    }

    /// Style parsed markup, then apply any text transforms.
    #[must_use]
    pub fn render_markup(&self, markup: &Markup) -> AttributedString {
        let mut rendered = AttributedString::new(markup.text.as_str());
        apply_spans(&mut rendered, &self.spans(markup));
        rendered.apply_text_transforms();
        rendered
    }

    /// Parse `input` and style it.
    #[must_use]
    pub fn render(&self, input: &str) -> AttributedString {
        self.render_markup(&parse(input))
    }
}

impl fmt::Debug for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagGroup")
            .field("table", &self.table)
            .field("base", &self.base)
            .field("dynamic", &self.dynamic.is_some())
            .finish()
    }
}
