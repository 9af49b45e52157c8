//! Named sparse styles and the name-keyed style table.

use std::collections::HashMap;
use std::fmt;

use crate::{
    AttributeKey, AttributeValue, Attributes, Color, LineBreakMode, TextAlignment, TextTransform,
    UnderlineStyle, WritingDirection,
};

/// Font used by [`Style::system`].
pub const SYSTEM_FONT_NAME: &str = "system-ui";

/// Point size used by [`Style::system`].
pub const SYSTEM_FONT_SIZE: f64 = 13.0;

/// How a style is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleName {
    /// Applied to the whole text before any tag-scoped style.
    Default,
    /// Matched against tag names.
    Named(String),
    /// Not addressable by tags; used for whole-string and regex styling.
    Anonymous,
}

impl StyleName {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// The user-chosen name, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Default | Self::Anonymous => None,
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("<default>"),
            Self::Named(name) => f.write_str(name),
            Self::Anonymous => f.write_str("<anonymous>"),
        }
    }
}

/// A named, sparse set of formatting attributes.
///
/// Unset attributes never override anything when styles are merged.
///
/// # Example
///
/// ```
/// use richmark_style::{Color, Style};
///
/// let heading = Style::named("h1")
///     .with_font("Georgia")
///     .with_size(24.0)
///     .with_color(Color::rgb(0x33, 0x33, 0x33));
/// assert_eq!(heading.attributes().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    name: StyleName,
    attributes: Attributes,
}

impl Default for Style {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Style {
    #[must_use]
    pub fn new(name: StyleName) -> Self {
        Self {
            name,
            attributes: Attributes::new(),
        }
    }

    /// Style addressed by tags called `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(StyleName::named(name))
    }

    /// Style applied to the whole text first.
    #[must_use]
    pub fn default_style() -> Self {
        Self::new(StyleName::Default)
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(StyleName::Anonymous)
    }

    /// Anonymous fallback style with the system font and size.
    ///
    /// Pass it explicitly as a base style where text must never be left
    /// without a font.
    #[must_use]
    pub fn system() -> Self {
        Self::anonymous()
            .with_font(SYSTEM_FONT_NAME)
            .with_size(SYSTEM_FONT_SIZE)
    }

    /// Style wrapping an existing attribute map.
    #[must_use]
    pub fn from_attributes(name: StyleName, attributes: Attributes) -> Self {
        Self { name, attributes }
    }

    #[must_use]
    pub fn name(&self) -> &StyleName {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Rename, keeping the attributes.
    #[must_use]
    pub fn renamed(mut self, name: StyleName) -> Self {
        self.name = name;
        self
    }

    /// Set `key`, or remove it when `value` is `None`.
    pub fn set(&mut self, key: AttributeKey, value: Option<AttributeValue>) {
        self.attributes.set(key, value);
    }

    #[must_use]
    pub fn get(&self, key: &AttributeKey) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn with_attribute(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_font(self, name: impl Into<String>) -> Self {
        self.with_attribute(AttributeKey::FontName, AttributeValue::Text(name.into()))
    }

    #[must_use]
    pub fn with_size(self, size: f64) -> Self {
        self.with_attribute(AttributeKey::FontSize, size)
    }

    /// Font weight on the CSS scale (400 regular, 700 bold).
    #[must_use]
    pub fn with_weight(self, weight: u16) -> Self {
        self.with_attribute(AttributeKey::FontWeight, i64::from(weight))
    }

    #[must_use]
    pub fn with_italic(self, italic: bool) -> Self {
        self.with_attribute(AttributeKey::Italic, italic)
    }

    #[must_use]
    pub fn with_color(self, color: Color) -> Self {
        self.with_attribute(AttributeKey::ForegroundColor, color)
    }

    #[must_use]
    pub fn with_background(self, color: Color) -> Self {
        self.with_attribute(AttributeKey::BackgroundColor, color)
    }

    #[must_use]
    pub fn with_underline(self, style: UnderlineStyle, color: Option<Color>) -> Self {
        let style = self.with_attribute(AttributeKey::UnderlineStyle, style);
        match color {
            Some(color) => style.with_attribute(AttributeKey::UnderlineColor, color),
            None => style,
        }
    }

    #[must_use]
    pub fn with_strikethrough(self, style: UnderlineStyle, color: Option<Color>) -> Self {
        let style = self.with_attribute(AttributeKey::StrikethroughStyle, style);
        match color {
            Some(color) => style.with_attribute(AttributeKey::StrikethroughColor, color),
            None => style,
        }
    }

    #[must_use]
    pub fn with_baseline_offset(self, offset: f64) -> Self {
        self.with_attribute(AttributeKey::BaselineOffset, offset)
    }

    #[must_use]
    pub fn with_kerning(self, kerning: f64) -> Self {
        self.with_attribute(AttributeKey::Kerning, kerning)
    }

    #[must_use]
    pub fn with_ligatures(self, enabled: bool) -> Self {
        self.with_attribute(AttributeKey::Ligatures, enabled)
    }

    #[must_use]
    pub fn with_link(self, url: impl Into<String>) -> Self {
        self.with_attribute(AttributeKey::Link, AttributeValue::Text(url.into()))
    }

    #[must_use]
    pub fn with_text_transform(self, transform: TextTransform) -> Self {
        self.with_attribute(AttributeKey::TextTransform, transform)
    }

    #[must_use]
    pub fn with_alignment(self, alignment: TextAlignment) -> Self {
        self.with_attribute(AttributeKey::Alignment, alignment)
    }

    #[must_use]
    pub fn with_line_spacing(self, spacing: f64) -> Self {
        self.with_attribute(AttributeKey::LineSpacing, spacing)
    }

    #[must_use]
    pub fn with_paragraph_spacing(self, before: f64, after: f64) -> Self {
        self.with_attribute(AttributeKey::ParagraphSpacingBefore, before)
            .with_attribute(AttributeKey::ParagraphSpacingAfter, after)
    }

    #[must_use]
    pub fn with_indents(self, first_line_head: f64, head: f64, tail: f64) -> Self {
        self.with_attribute(AttributeKey::FirstLineHeadIndent, first_line_head)
            .with_attribute(AttributeKey::HeadIndent, head)
            .with_attribute(AttributeKey::TailIndent, tail)
    }

    #[must_use]
    pub fn with_line_break_mode(self, mode: LineBreakMode) -> Self {
        self.with_attribute(AttributeKey::LineBreakMode, mode)
    }

    #[must_use]
    pub fn with_line_height(self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        let mut style = self;
        style.set(AttributeKey::MinimumLineHeight, minimum.map(Into::into));
        style.set(AttributeKey::MaximumLineHeight, maximum.map(Into::into));
        style
    }

    #[must_use]
    pub fn with_line_height_multiple(self, multiple: f64) -> Self {
        self.with_attribute(AttributeKey::LineHeightMultiple, multiple)
    }

    #[must_use]
    pub fn with_hyphenation_factor(self, factor: f64) -> Self {
        self.with_attribute(AttributeKey::HyphenationFactor, factor)
    }

    #[must_use]
    pub fn with_writing_direction(self, direction: WritingDirection) -> Self {
        self.with_attribute(AttributeKey::BaseWritingDirection, direction)
    }

    /// Right-biased union: `other` wins where both define a key.
    ///
    /// The result keeps `self`'s name.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.merge(&other.attributes),
        }
    }

    /// Fold `styles` with [`merge`](Self::merge), `Default`-named styles first.
    ///
    /// Default styles keep the lowest precedence wherever they appear in the
    /// list; the remaining styles fold left to right. The result is anonymous.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::{AttributeKey, Style};
    ///
    /// let merged = Style::merge_all(&[
    ///     Style::named("x").with_size(10.0),
    ///     Style::default_style().with_size(5.0).with_font("Menlo"),
    /// ]);
    /// assert_eq!(merged.get(&AttributeKey::FontSize).and_then(|v| v.as_f64()), Some(10.0));
    /// assert!(merged.get(&AttributeKey::FontName).is_some());
    /// ```
    #[must_use]
    pub fn merge_all(styles: &[Self]) -> Self {
        let defaults = styles.iter().filter(|s| s.name.is_default());
        let others = styles.iter().filter(|s| !s.name.is_default());

        let mut attributes = Attributes::new();
        for style in defaults.chain(others) {
            attributes.extend_from(&style.attributes);
        }
        Self::from_attributes(StyleName::Anonymous, attributes)
    }
}

/// Styles keyed by name for one resolution.
///
/// Built from an ordered list; a later style with the same name replaces an
/// earlier one. Anonymous styles cannot be looked up and are skipped.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    default: Option<Style>,
    named: HashMap<String, Style>,
}

impl StyleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, last write winning on duplicate names.
    pub fn from_styles(styles: impl IntoIterator<Item = Style>) -> Self {
        let mut table = Self::new();
        for style in styles {
            table.insert(style);
        }
        table
    }

    /// Add or replace a style. Returns the style it replaced.
    pub fn insert(&mut self, style: Style) -> Option<Style> {
        match &style.name {
            StyleName::Default => self.default.replace(style),
            StyleName::Named(name) => self.named.insert(name.clone(), style),
            StyleName::Anonymous => {
                tracing::debug!("skipping anonymous style in style table");
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Style> {
        self.named.remove(name)
    }

    /// Style for tags called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.named.get(name)
    }

    /// The `Default`-named style, if one was supplied.
    #[must_use]
    pub fn default_style(&self) -> Option<&Style> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Names of the tag-addressable styles, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of styles, counting the default style.
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + usize::from(self.default.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Style> for StyleTable {
    fn from_iter<I: IntoIterator<Item = Style>>(iter: I) -> Self {
        Self::from_styles(iter)
    }
}

impl Extend<Style> for StyleTable {
    fn extend<I: IntoIterator<Item = Style>>(&mut self, iter: I) {
        for style in iter {
            self.insert(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn size(style: &Style) -> Option<f64> {
        style.get(&AttributeKey::FontSize).and_then(AttributeValue::as_f64)
    }

    #[test]
    fn test_merge_right_bias() {
        let red = Color::rgb(0xff, 0, 0);
        let blue = Color::rgb(0, 0, 0xff);
        let a = Style::named("a").with_color(red).with_size(10.0);
        let b = Style::named("b").with_color(blue);

        let ab = a.merge(&b);
        assert_eq!(ab.get(&AttributeKey::ForegroundColor), Some(&AttributeValue::Color(blue)));
        assert_eq!(size(&ab), Some(10.0));
        assert_eq!(ab.name(), &StyleName::named("a"));

        let ba = b.merge(&a);
        assert_eq!(ba.get(&AttributeKey::ForegroundColor), Some(&AttributeValue::Color(red)));
        assert_eq!(size(&ba), Some(10.0));
    }

    #[test]
    fn test_merge_all_default_first() {
        let named = Style::named("x").with_size(10.0);
        let default = Style::default_style()
            .with_size(5.0)
            .with_color(Color::BLACK);

        let merged = Style::merge_all(&[named.clone(), default.clone()]);
        assert_eq!(merged, Style::merge_all(&[default, named]));
        assert_eq!(size(&merged), Some(10.0));
        assert_eq!(
            merged.get(&AttributeKey::ForegroundColor),
            Some(&AttributeValue::Color(Color::BLACK))
        );
        assert_eq!(merged.name(), &StyleName::Anonymous);
    }

    #[test]
    fn test_merge_all_folds_left_to_right() {
        let merged = Style::merge_all(&[
            Style::named("a").with_size(1.0),
            Style::named("b").with_size(2.0),
            Style::named("c").with_italic(true),
        ]);
        assert_eq!(size(&merged), Some(2.0));
        assert!(merged.get(&AttributeKey::Italic).is_some());
    }

    #[test]
    fn test_merge_all_single_style_keeps_attributes() {
        let style = Style::named("s").with_weight(700).with_kerning(0.5);
        assert_eq!(Style::merge_all(&[style.clone()]).attributes(), style.attributes());
        assert!(Style::merge_all(&[]).attributes().is_empty());
    }

    #[test]
    fn test_set_none_removes_attribute() {
        let mut style = Style::anonymous().with_link("https://example.com");
        style.set(AttributeKey::Link, None);
        assert!(style.attributes().is_empty());
    }

    #[test]
    fn test_line_height_none_leaves_unset() {
        let style = Style::anonymous().with_line_height(Some(10.0), None);
        assert!(style.get(&AttributeKey::MinimumLineHeight).is_some());
        assert!(style.get(&AttributeKey::MaximumLineHeight).is_none());
    }

    #[test]
    fn test_system_style() {
        let system = Style::system();
        assert_eq!(size(&system), Some(SYSTEM_FONT_SIZE));
        assert_eq!(
            system.get(&AttributeKey::FontName).and_then(AttributeValue::as_str),
            Some(SYSTEM_FONT_NAME)
        );
    }

    #[test]
    fn test_table_last_write_wins() {
        let table = StyleTable::from_styles([
            Style::named("b").with_size(1.0),
            Style::named("b").with_size(2.0),
            Style::default_style().with_size(3.0),
            Style::anonymous().with_size(4.0),
        ]);
        assert_eq!(table.get("b").and_then(size), Some(2.0));
        assert_eq!(table.default_style().and_then(size), Some(3.0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.names(), vec!["b"]);
    }

    #[test]
    fn test_table_lookup_is_case_sensitive() {
        let table: StyleTable = [Style::named("em")].into_iter().collect();
        assert!(table.contains("em"));
        assert!(!table.contains("EM"));
    }
}
