//! Sparse attribute maps.
//!
//! An [`Attributes`] value holds only the keys that were explicitly set.
//! Font and paragraph settings are individual keys rather than nested
//! records, so merging two maps combines them field by field.

use std::collections::BTreeMap;
use std::fmt;

use crate::{Color, TextTransform};

/// Identifies one formatting attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    FontName,
    FontSize,
    FontWeight,
    Italic,
    ForegroundColor,
    BackgroundColor,
    UnderlineStyle,
    UnderlineColor,
    StrikethroughStyle,
    StrikethroughColor,
    BaselineOffset,
    Kerning,
    Ligatures,
    Link,
    TextTransform,
    LineSpacing,
    ParagraphSpacingBefore,
    ParagraphSpacingAfter,
    Alignment,
    FirstLineHeadIndent,
    HeadIndent,
    TailIndent,
    LineBreakMode,
    MinimumLineHeight,
    MaximumLineHeight,
    LineHeightMultiple,
    HyphenationFactor,
    BaseWritingDirection,
    /// Attribute understood only by a specific render target.
    Custom(String),
}

impl AttributeKey {
    /// Snake-case name, or the custom name as given.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::FontName => "font_name",
            Self::FontSize => "font_size",
            Self::FontWeight => "font_weight",
            Self::Italic => "italic",
            Self::ForegroundColor => "foreground_color",
            Self::BackgroundColor => "background_color",
            Self::UnderlineStyle => "underline_style",
            Self::UnderlineColor => "underline_color",
            Self::StrikethroughStyle => "strikethrough_style",
            Self::StrikethroughColor => "strikethrough_color",
            Self::BaselineOffset => "baseline_offset",
            Self::Kerning => "kerning",
            Self::Ligatures => "ligatures",
            Self::Link => "link",
            Self::TextTransform => "text_transform",
            Self::LineSpacing => "line_spacing",
            Self::ParagraphSpacingBefore => "paragraph_spacing_before",
            Self::ParagraphSpacingAfter => "paragraph_spacing_after",
            Self::Alignment => "alignment",
            Self::FirstLineHeadIndent => "first_line_head_indent",
            Self::HeadIndent => "head_indent",
            Self::TailIndent => "tail_indent",
            Self::LineBreakMode => "line_break_mode",
            Self::MinimumLineHeight => "minimum_line_height",
            Self::MaximumLineHeight => "maximum_line_height",
            Self::LineHeightMultiple => "line_height_multiple",
            Self::HyphenationFactor => "hyphenation_factor",
            Self::BaseWritingDirection => "base_writing_direction",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for keys that describe paragraph layout.
    #[must_use]
    pub fn is_paragraph(&self) -> bool {
        matches!(
            self,
            Self::LineSpacing
                | Self::ParagraphSpacingBefore
                | Self::ParagraphSpacingAfter
                | Self::Alignment
                | Self::FirstLineHeadIndent
                | Self::HeadIndent
                | Self::TailIndent
                | Self::LineBreakMode
                | Self::MinimumLineHeight
                | Self::MaximumLineHeight
                | Self::LineHeightMultiple
                | Self::HyphenationFactor
                | Self::BaseWritingDirection
        )
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

keyword_enum! {
    /// Line style for underline and strikethrough.
    pub enum UnderlineStyle("underline style") {
        Single => "single",
        Double => "double",
        Thick => "thick",
        Dotted => "dotted",
        Dashed => "dashed",
    }
}

keyword_enum! {
    /// Horizontal paragraph alignment.
    pub enum TextAlignment("alignment") {
        Left => "left",
        Center => "center",
        Right => "right",
        Justified => "justified",
        Natural => "natural",
    }
}

keyword_enum! {
    pub enum LineBreakMode("line break mode") {
        WordWrap => "word_wrap",
        CharWrap => "char_wrap",
        Clip => "clip",
        TruncateHead => "truncate_head",
        TruncateTail => "truncate_tail",
        TruncateMiddle => "truncate_middle",
    }
}

keyword_enum! {
    pub enum WritingDirection("writing direction") {
        Natural => "natural",
        LeftToRight => "left_to_right",
        RightToLeft => "right_to_left",
    }
}

/// Value stored under an [`AttributeKey`].
///
/// The map does not check that a value's type suits its key; the
/// [`Style`](crate::Style) builder methods keep them consistent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Color(Color),
    Underline(UnderlineStyle),
    Alignment(TextAlignment),
    LineBreak(LineBreakMode),
    Direction(WritingDirection),
    Transform(TextTransform),
}

impl AttributeValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_transform(&self) -> Option<TextTransform> {
        match self {
            Self::Transform(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::Underline(v) => write!(f, "{v}"),
            Self::Alignment(v) => write!(f, "{v}"),
            Self::LineBreak(v) => write!(f, "{v}"),
            Self::Direction(v) => write!(f, "{v}"),
            Self::Transform(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_value! {
    String => Text,
    f64 => Number,
    i64 => Integer,
    bool => Bool,
    Color => Color,
    UnderlineStyle => Underline,
    TextAlignment => Alignment,
    LineBreakMode => LineBreak,
    WritingDirection => Direction,
    TextTransform => Transform,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// A sparse, ordered map of formatting attributes.
///
/// # Example
///
/// ```
/// use richmark_style::{AttributeKey, Attributes, Color};
///
/// let a = Attributes::new()
///     .with(AttributeKey::ForegroundColor, Color::rgb(255, 0, 0))
///     .with(AttributeKey::FontSize, 10.0);
/// let b = Attributes::new().with(AttributeKey::ForegroundColor, Color::rgb(0, 0, 255));
///
/// let merged = a.merge(&b);
/// assert_eq!(merged.get(&AttributeKey::ForegroundColor).and_then(|v| v.as_color()), Some(Color::rgb(0, 0, 255)));
/// assert_eq!(merged.get(&AttributeKey::FontSize).and_then(|v| v.as_f64()), Some(10.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    map: BTreeMap<AttributeKey, AttributeValue>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` and return `self`, for chained construction.
    #[must_use]
    pub fn with(mut self, key: AttributeKey, value: impl Into<AttributeValue>) -> Self {
        self.map.insert(key, value.into());
        self
    }

    /// Set `key` to `value`, or remove it when `value` is `None`.
    pub fn set(&mut self, key: AttributeKey, value: Option<AttributeValue>) {
        match value {
            Some(value) => {
                self.map.insert(key, value);
            }
            None => {
                self.map.remove(&key);
            }
        }
    }

    pub fn insert(&mut self, key: AttributeKey, value: impl Into<AttributeValue>) {
        self.map.insert(key, value.into());
    }

    pub fn remove(&mut self, key: &AttributeKey) -> Option<AttributeValue> {
        self.map.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &AttributeKey) -> Option<&AttributeValue> {
        self.map.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &AttributeKey) -> bool {
        self.map.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AttributeKey> {
        self.map.keys()
    }

    /// Union of both maps; `other` wins where both define a key.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    /// In-place [`merge`](Self::merge).
    pub fn extend_from(&mut self, other: &Self) {
        for (key, value) in &other.map {
            self.map.insert(key.clone(), value.clone());
        }
    }

    /// Remove every key listed in `keys`.
    pub fn remove_all<'k>(&mut self, keys: impl IntoIterator<Item = &'k AttributeKey>) {
        for key in keys {
            self.map.remove(key);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<AttributeKey>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a AttributeKey, &'a AttributeValue);
    type IntoIter = std::collections::btree_map::Iter<'a, AttributeKey, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (key, value) in &self.map {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}
