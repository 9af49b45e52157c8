//! Sparse, mergeable text styles and their resolution against parsed markup.
//!
//! A [`Style`] is a named, sparse [`Attributes`] map. Styles merge with
//! right-biased precedence, and [`Style::merge_all`] always folds
//! `Default`-named styles in first. [`resolve`] binds the tags produced by
//! [`richmark_markup::parse`] to a [`StyleTable`], and the resulting spans are
//! written to any [`RenderTarget`], such as the in-memory [`AttributedString`].
//!
//! Besides markup mode ([`TagGroup`]) there are whole-string ([`Style`]) and
//! regex ([`RegexStyler`]) modes, unified by [`StyleKind`].
//!
//! # Example
//!
//! ```
//! use richmark_style::{AttributeKey, Style, TagGroup};
//!
//! let group = TagGroup::new([
//!     Style::default_style().with_font("Helvetica").with_size(12.0),
//!     Style::named("b").with_weight(700),
//! ]);
//! let text = group.render("Hello <b>world</b>");
//!
//! assert_eq!(text.as_str(), "Hello world");
//! assert!(text.attributes_at(6).unwrap().contains(&AttributeKey::FontWeight));
//! ```

/// Declares a keyword enum with `as_str`, `FromStr`, `Display` and, with
/// the `serde` feature, string serialization.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Keyword as written in style sheets.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(crate::StyleError::UnknownValue {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

mod attributes;
mod color;
mod dynamic;
mod error;
mod group;
mod kind;
mod range;
mod registry;
mod resolver;
mod rule;
mod style;
mod target;
mod transform;

pub use attributes::{
    AttributeKey, AttributeValue, Attributes, LineBreakMode, TextAlignment, UnderlineStyle,
    WritingDirection,
};
pub use color::Color;
pub use dynamic::{StandardResolver, TagAttributesResolver};
pub use error::StyleError;
pub use group::TagGroup;
pub use kind::StyleKind;
pub use range::TextRange;
pub use registry::{StyleProvider, StyleRegistry};
pub use resolver::{ResolveOptions, ResolvedSpan, apply_spans, resolve, resolve_with};
pub use rule::{RegexRule, RegexStyler, RuleOptions};
pub use style::{SYSTEM_FONT_NAME, SYSTEM_FONT_SIZE, Style, StyleName, StyleTable};
pub use target::{AttributedString, RenderTarget, Run};
pub use transform::TextTransform;
