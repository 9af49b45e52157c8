//! The three ways a style can be applied.

use crate::{
    AttributeKey, AttributedString, RegexStyler, RenderTarget, ResolvedSpan, Style, TagGroup,
    apply_spans,
};

/// A style in one of its application modes.
#[derive(Debug, Clone)]
pub enum StyleKind {
    /// Whole-string mode: one style over the full text.
    Plain(Style),
    /// Regex mode: styles over every match of each rule.
    RegexRule(RegexStyler),
    /// Markup mode: tagged input styled by tag name.
    TagGroup(TagGroup),
}

impl StyleKind {
    /// Produce a styled string from `source`.
    ///
    /// For [`StyleKind::TagGroup`] `source` is parsed as markup; the other
    /// kinds treat it as plain text.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::{AttributeKey, Style, StyleKind};
    ///
    /// let kind = StyleKind::Plain(Style::anonymous().with_italic(true));
    /// let styled = kind.set_to("<i>not markup</i>");
    /// assert_eq!(styled.as_str(), "<i>not markup</i>");
    /// assert!(styled.attributes_at(0).unwrap().contains(&AttributeKey::Italic));
    /// ```
    #[must_use]
    pub fn set_to(&self, source: &str) -> AttributedString {
        match self {
            Self::Plain(style) => {
                let mut target =
                    AttributedString::with_attributes(source, style.attributes().clone());
                target.apply_text_transforms();
                target
            }
            Self::RegexRule(styler) => {
                let mut target = AttributedString::new(source);
                apply_spans(&mut target, &styler.spans(source));
                target.apply_text_transforms();
                target
            }
            Self::TagGroup(group) => group.render(source),
        }
    }

    /// Spans this kind would layer over plain `text`.
    ///
    /// Plain text has no tags, so a tag group contributes only its base and
    /// default styles.
    #[must_use]
    pub fn spans(&self, text: &str) -> Vec<ResolvedSpan> {
        match self {
            Self::Plain(style) => vec![ResolvedSpan {
                range: 0..text.len(),
                attributes: style.attributes().clone(),
            }],
            Self::RegexRule(styler) => styler.spans(text),
            Self::TagGroup(group) => group.untagged_spans(text),
        }
    }

    /// Layer this style over `target`, keeping attributes it does not set.
    pub fn add_to<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        let spans = self.spans(target.text());
        apply_spans(target, &spans);
    }

    /// Replace the attributes of `target` with this style.
    ///
    /// The whole text is reset to the first span's attributes (or nothing),
    /// then remaining spans are layered on top.
    pub fn set_on<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        let spans = self.spans(target.text());
        let whole = 0..target.len();
        match spans.split_first() {
            Some((first, rest)) if first.range == whole => {
                target.set_attributes(whole, &first.attributes);
                apply_spans(target, rest);
            }
            _ => {
                target.set_attributes(whole, &crate::Attributes::new());
                apply_spans(target, &spans);
            }
        }
    }

    /// Remove the keys this style would set, over the ranges it would set them.
    pub fn remove_from<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        let spans = self.spans(target.text());
        for span in spans {
            let keys: Vec<AttributeKey> = span.attributes.keys().cloned().collect();
            target.remove_attributes(&keys, span.range);
        }
    }
}

impl From<Style> for StyleKind {
    fn from(style: Style) -> Self {
        Self::Plain(style)
    }
}

impl From<RegexStyler> for StyleKind {
    fn from(styler: RegexStyler) -> Self {
        Self::RegexRule(styler)
    }
}

impl From<TagGroup> for StyleKind {
    fn from(group: TagGroup) -> Self {
        Self::TagGroup(group)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{AttributeValue, Attributes, Color, RegexRule};

    fn size_at(target: &AttributedString, i: usize) -> Option<f64> {
        target
            .attributes_at(i)
            .and_then(|a| a.get(&AttributeKey::FontSize))
            .and_then(AttributeValue::as_f64)
    }

    #[test]
    fn test_whole_string_single_style_matches_merge_all() {
        let style = Style::named("s").with_size(11.0).with_color(Color::WHITE);
        let direct = StyleKind::Plain(style.clone()).set_to("text");
        let merged = StyleKind::Plain(Style::merge_all(&[style])).set_to("text");
        assert_eq!(direct, merged);
    }

    #[test]
    fn test_set_on_replaces_existing() {
        let mut target = AttributedString::with_attributes(
            "abc",
            Attributes::new().with(AttributeKey::Italic, true),
        );
        StyleKind::Plain(Style::anonymous().with_size(4.0)).set_on(&mut target);
        let attrs = target.attributes_at(0).unwrap();
        assert!(!attrs.contains(&AttributeKey::Italic));
        assert_eq!(size_at(&target, 0), Some(4.0));
    }

    #[test]
    fn test_add_to_keeps_existing() {
        let mut target = AttributedString::with_attributes(
            "abc",
            Attributes::new().with(AttributeKey::Italic, true),
        );
        StyleKind::Plain(Style::anonymous().with_size(4.0)).add_to(&mut target);
        let attrs = target.attributes_at(2).unwrap();
        assert!(attrs.contains(&AttributeKey::Italic));
        assert_eq!(size_at(&target, 2), Some(4.0));
    }

    #[test]
    fn test_regex_set_on_clears_unmatched() {
        let styler = RegexStyler::new()
            .with_rule(RegexRule::new("b", Style::anonymous().with_size(9.0)).unwrap());
        let mut target = AttributedString::with_attributes(
            "abc",
            Attributes::new().with(AttributeKey::Italic, true),
        );
        StyleKind::RegexRule(styler).set_on(&mut target);
        assert!(target.attributes_at(0).unwrap().is_empty());
        assert_eq!(size_at(&target, 1), Some(9.0));
    }

    #[test]
    fn test_remove_from() {
        let style = Style::anonymous().with_size(4.0);
        let mut target = AttributedString::with_attributes(
            "abc",
            style.attributes().clone().with(AttributeKey::Italic, true),
        );
        StyleKind::Plain(style).remove_from(&mut target);
        let attrs = target.attributes_at(1).unwrap();
        assert_eq!(attrs, &Attributes::new().with(AttributeKey::Italic, true));
    }

    #[test]
    fn test_plain_set_to_applies_transform() {
        let style = Style::anonymous().with_text_transform(crate::TextTransform::Capitalized);
        let styled = StyleKind::Plain(style).set_to("hello world");
        assert_eq!(styled.as_str(), "Hello World");
    }

    #[test]
    fn test_tag_group_set_to_parses() {
        let group = TagGroup::new([Style::named("big").with_size(30.0)]);
        let styled = StyleKind::from(group).set_to("a<big>b</big>");
        assert_eq!(styled.as_str(), "ab");
        assert_eq!(size_at(&styled, 1), Some(30.0));
        assert_eq!(size_at(&styled, 0), None);
    }
}
