//! Regex mode: style every match of a pattern.

use regex::{Regex, RegexBuilder};

use crate::{ResolvedSpan, Style, StyleError};

/// Compile flags for a [`RegexRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOptions {
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Whitespace and `#` comments in the pattern are ignored.
    pub ignore_whitespace: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
        }
    }
}

/// A compiled pattern and the style applied to each of its matches.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    style: Style,
}

impl RegexRule {
    /// Case-insensitive rule.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::{RegexRule, Style};
    ///
    /// let rule = RegexRule::new("todo", Style::anonymous().with_weight(700)).unwrap();
    /// let ranges: Vec<_> = rule.spans("TODO: fix todo").map(|s| s.range).collect();
    /// assert_eq!(ranges, vec![0..4, 10..14]);
    ///
    /// assert!(RegexRule::new("(", Style::anonymous()).is_err());
    /// ```
    pub fn new(pattern: &str, style: Style) -> Result<Self, StyleError> {
        Self::with_options(pattern, style, RuleOptions::default())
    }

    pub fn with_options(
        pattern: &str,
        style: Style,
        options: RuleOptions,
    ) -> Result<Self, StyleError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(options.case_insensitive)
            .multi_line(options.multi_line)
            .dot_matches_new_line(options.dot_matches_new_line)
            .ignore_whitespace(options.ignore_whitespace)
            .build()
            .map_err(|source| StyleError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self { regex, style })
    }

    /// Rule from an already compiled regex, flags unchanged.
    #[must_use]
    pub fn from_regex(regex: Regex, style: Style) -> Self {
        Self { regex, style }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// One span per non-empty match, in match order.
    pub fn spans<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ResolvedSpan> + 'a {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| ResolvedSpan {
                range: m.range(),
                attributes: self.style.attributes().clone(),
            })
    }
}

/// Ordered regex rules over an optional base style.
///
/// The base style covers the whole text first; rules then apply in order,
/// so later rules win where matches overlap.
#[derive(Debug, Clone, Default)]
pub struct RegexStyler {
    base: Option<Style>,
    rules: Vec<RegexRule>,
}

impl RegexStyler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base(mut self, base: Style) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: RegexRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: RegexRule) {
        self.rules.push(rule);
    }

    /// Build rules from `(pattern, styles)` pairs, each rule styled with
    /// [`Style::merge_all`] of its styles.
    ///
    /// Patterns that fail to compile are skipped and returned with their
    /// index; the other rules are kept.
    pub fn from_patterns<'p, I>(base: Option<Style>, patterns: I) -> (Self, Vec<(usize, StyleError)>)
    where
        I: IntoIterator<Item = (&'p str, RuleOptions, Vec<Style>)>,
    {
        let mut styler = Self {
            base,
            rules: Vec::new(),
        };
        let mut errors = Vec::new();
        for (index, (pattern, options, styles)) in patterns.into_iter().enumerate() {
            match RegexRule::with_options(pattern, Style::merge_all(&styles), options) {
                Ok(rule) => styler.rules.push(rule),
                Err(e) => {
                    tracing::warn!(rule = index, error = %e, "skipping regex rule");
                    errors.push((index, e));
                }
            }
        }
        (styler, errors)
    }

    #[must_use]
    pub fn base(&self) -> Option<&Style> {
        self.base.as_ref()
    }

    #[must_use]
    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.rules.is_empty()
    }

    /// Spans for `text`: base first, then each rule's matches.
    #[must_use]
    pub fn spans(&self, text: &str) -> Vec<ResolvedSpan> {
        let base = self.base.iter().map(|style| ResolvedSpan {
            range: 0..text.len(),
            attributes: style.attributes().clone(),
        });
        base.chain(self.rules.iter().flat_map(|rule| rule.spans(text)))
            .collect()
    }
}
