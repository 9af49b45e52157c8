//! Attributes derived from tag attributes such as `<a href="...">`.

use richmark_markup::Tag;

use crate::{AttributeKey, Attributes, Color, Style};

/// Turns the attributes written on a tag into formatting.
///
/// Only consulted by [`TagGroup`](crate::TagGroup) when one is configured.
pub trait TagAttributesResolver: Send + Sync {
    /// Extra attributes for a tag whose name has a style.
    ///
    /// Layered on top of `style` over the tag's range.
    fn attributes_for_tag(&self, tag: &Tag, style: &Style) -> Option<Attributes>;

    /// Attributes for a tag whose name has no style.
    fn attributes_for_unknown_tag(&self, tag: &Tag) -> Option<Attributes>;
}

/// Handles `color="#hex"` on any tag and `<a href="...">` links.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolver;

impl StandardResolver {
    fn color(tag: &Tag) -> Option<Attributes> {
        let value = tag.attributes().get("color")?;
        match Color::from_hex(value) {
            Ok(color) => Some(Attributes::new().with(AttributeKey::ForegroundColor, color)),
            Err(e) => {
                tracing::debug!(tag = tag.name(), error = %e, "ignoring tag color");
                None
            }
        }
    }
}

impl TagAttributesResolver for StandardResolver {
    fn attributes_for_tag(&self, tag: &Tag, _style: &Style) -> Option<Attributes> {
        Self::color(tag)
    }

    fn attributes_for_unknown_tag(&self, tag: &Tag) -> Option<Attributes> {
        let mut attributes = Self::color(tag).unwrap_or_default();
        if tag.name() == "a"
            && let Some(href) = tag.attributes().get("href")
            && !href.is_empty()
        {
            attributes.insert(AttributeKey::Link, href);
        }
        (!attributes.is_empty()).then_some(attributes)
    }
}
