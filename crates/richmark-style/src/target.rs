//! Render targets and the in-memory attributed string.

use std::fmt;
use std::ops::Range;

use crate::{AttributeKey, Attributes, StyleError, TextRange};

/// Something styled attributes can be written to.
///
/// Ranges are byte ranges into [`text`](Self::text). Implementations clamp
/// ranges that fall outside the text instead of failing, so resolution is
/// always best-effort.
pub trait RenderTarget {
    /// The plain text being styled.
    fn text(&self) -> &str;

    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Replace all attributes over `range` with `attributes`.
    fn set_attributes(&mut self, range: Range<usize>, attributes: &Attributes);

    /// Layer `attributes` over `range`, overwriting keys already present.
    fn add_attributes(&mut self, range: Range<usize>, attributes: &Attributes);

    /// Delete `keys` over `range`.
    fn remove_attributes(&mut self, keys: &[AttributeKey], range: Range<usize>);
}

/// A maximal stretch of text sharing one attribute map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Run {
    pub range: Range<usize>,
    pub attributes: Attributes,
}

/// Plain text plus attribute runs.
///
/// Runs partition `0..len()` with no gaps, and adjacent runs always carry
/// different attributes. Empty text has no runs.
///
/// # Example
///
/// ```
/// use richmark_style::{AttributeKey, AttributedString, Attributes};
///
/// let mut text = AttributedString::new("Hello world");
/// let bold = Attributes::new().with(AttributeKey::FontWeight, 700_i64);
/// text.add(6..11, &bold).unwrap();
///
/// assert_eq!(text.runs().len(), 2);
/// assert!(text.attributes_at(7).unwrap().contains(&AttributeKey::FontWeight));
/// assert!(text.attributes_at(0).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributedString {
    text: String,
    runs: Vec<Run>,
}

impl AttributedString {
    /// Unstyled text.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_attributes(text, Attributes::new())
    }

    /// Text carrying `attributes` throughout.
    pub fn with_attributes(text: impl Into<String>, attributes: Attributes) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![Run {
                range: 0..text.len(),
                attributes,
            }]
        };
        Self { text, runs }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Text of each run paired with its attributes.
    pub fn segments(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.runs
            .iter()
            .map(|run| (&self.text[run.range.clone()], &run.attributes))
    }

    /// Attributes of the scalar starting at byte `index`.
    #[must_use]
    pub fn attributes_at(&self, index: usize) -> Option<&Attributes> {
        let i = self.runs.partition_point(|run| run.range.end <= index);
        self.runs
            .get(i)
            .filter(|run| run.range.contains(&index))
            .map(|run| &run.attributes)
    }

    /// Validated [`RenderTarget::set_attributes`].
    pub fn set(&mut self, range: Range<usize>, attributes: &Attributes) -> Result<(), StyleError> {
        let range = TextRange::new(&self.text, range)?;
        self.update(range, |attrs| attrs.clone_from(attributes));
        Ok(())
    }

    /// Validated [`RenderTarget::add_attributes`].
    pub fn add(&mut self, range: Range<usize>, attributes: &Attributes) -> Result<(), StyleError> {
        let range = TextRange::new(&self.text, range)?;
        self.update(range, |attrs| attrs.extend_from(attributes));
        Ok(())
    }

    /// Validated [`RenderTarget::remove_attributes`].
    pub fn remove(&mut self, keys: &[AttributeKey], range: Range<usize>) -> Result<(), StyleError> {
        let range = TextRange::new(&self.text, range)?;
        self.update(range, |attrs| attrs.remove_all(keys));
        Ok(())
    }

    /// Append `other`, shifting its runs past the current end.
    pub fn append(&mut self, other: &Self) {
        let offset = self.text.len();
        self.text.push_str(&other.text);
        self.runs.extend(other.runs.iter().map(|run| Run {
            range: run.range.start + offset..run.range.end + offset,
            attributes: run.attributes.clone(),
        }));
        self.normalize();
    }

    /// Rewrite the text of runs carrying a text transform.
    ///
    /// Transforms can change byte lengths, so run ranges are recomputed. The
    /// transform attribute stays on the run.
    pub fn apply_text_transforms(&mut self) {
        let mut text = String::with_capacity(self.text.len());
        for run in &mut self.runs {
            let segment = &self.text[run.range.clone()];
            let start = text.len();
            match run
                .attributes
                .get(&AttributeKey::TextTransform)
                .and_then(crate::AttributeValue::as_transform)
            {
                Some(transform) => text.push_str(&transform.apply(segment)),
                None => text.push_str(segment),
            }
            run.range = start..text.len();
        }
        self.text = text;
        self.runs.retain(|run| !run.range.is_empty());
        self.normalize();
    }

    /// Apply `f` to the attributes over `range`, splitting runs at its ends.
    fn update(&mut self, range: TextRange, mut f: impl FnMut(&mut Attributes)) {
        if range.is_empty() {
            return;
        }
        self.split_at(range.start());
        self.split_at(range.end());
        for run in &mut self.runs {
            if run.range.start >= range.start() && run.range.end <= range.end() {
                f(&mut run.attributes);
            }
        }
        self.normalize();
    }

    fn split_at(&mut self, offset: usize) {
        let i = self.runs.partition_point(|run| run.range.end <= offset);
        let Some(run) = self.runs.get_mut(i) else {
            return;
        };
        if run.range.start == offset {
            return;
        }
        let tail = Run {
            range: offset..run.range.end,
            attributes: run.attributes.clone(),
        };
        run.range.end = offset;
        self.runs.insert(i + 1, tail);
    }

    /// Coalesce adjacent runs with equal attributes.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(last) if last.attributes == run.attributes => {
                    last.range.end = run.range.end;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

impl RenderTarget for AttributedString {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_attributes(&mut self, range: Range<usize>, attributes: &Attributes) {
        let range = TextRange::clamped(&self.text, range);
        self.update(range, |attrs| attrs.clone_from(attributes));
    }

    fn add_attributes(&mut self, range: Range<usize>, attributes: &Attributes) {
        let range = TextRange::clamped(&self.text, range);
        self.update(range, |attrs| attrs.extend_from(attributes));
    }

    fn remove_attributes(&mut self, keys: &[AttributeKey], range: Range<usize>) {
        let range = TextRange::clamped(&self.text, range);
        self.update(range, |attrs| attrs.remove_all(keys));
    }
}

impl From<&str> for AttributedString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for AttributedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
