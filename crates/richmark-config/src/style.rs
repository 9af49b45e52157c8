//! `[default]` and `[styles.NAME]` tables and their conversion to styles.

use std::str::FromStr;

use richmark_style::{Color, Style, StyleError, StyleName};
use serde::Deserialize;

use crate::ConfigError;

/// One style table as written in the style sheet.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub font: Option<String>,
    pub size: Option<f64>,
    /// CSS-scale weight, 1 to 1000.
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    pub color: Option<String>,
    pub background: Option<String>,
    /// `single`, `double`, `thick`, `dotted` or `dashed`.
    pub underline: Option<String>,
    pub underline_color: Option<String>,
    pub strikethrough: Option<String>,
    pub strikethrough_color: Option<String>,
    pub baseline_offset: Option<f64>,
    pub kerning: Option<f64>,
    pub ligatures: Option<bool>,
    pub link: Option<String>,
    /// `lowercase`, `uppercase` or `capitalized`.
    pub transform: Option<String>,
    pub paragraph: Option<ParagraphConfig>,
}

/// `[styles.NAME.paragraph]`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParagraphConfig {
    pub alignment: Option<String>,
    pub line_spacing: Option<f64>,
    pub spacing_before: Option<f64>,
    pub spacing_after: Option<f64>,
    pub first_line_head_indent: Option<f64>,
    pub head_indent: Option<f64>,
    pub tail_indent: Option<f64>,
    pub line_break_mode: Option<String>,
    pub minimum_line_height: Option<f64>,
    pub maximum_line_height: Option<f64>,
    pub line_height_multiple: Option<f64>,
    pub hyphenation_factor: Option<f64>,
    pub writing_direction: Option<String>,
}

impl StyleConfig {
    /// Build a style named `name`. `field` prefixes error messages.
    pub fn to_style(&self, name: StyleName, field: &str) -> Result<Style, ConfigError> {
        let mut style = Style::new(name);

        if let Some(font) = &self.font {
            require_non_empty(font, &format!("{field}.font"))?;
            style = style.with_font(font.as_str());
        }
        if let Some(size) = self.size {
            require_positive(size, &format!("{field}.size"))?;
            style = style.with_size(size);
        }
        if let Some(weight) = self.weight {
            if !(1..=1000).contains(&weight) {
                return Err(ConfigError::Validation(format!(
                    "{field}.weight must be between 1 and 1000"
                )));
            }
            style = style.with_weight(weight);
        }
        if let Some(italic) = self.italic {
            style = style.with_italic(italic);
        }
        if let Some(color) = color(self.color.as_deref(), field, "color")? {
            style = style.with_color(color);
        }
        if let Some(color) = color(self.background.as_deref(), field, "background")? {
            style = style.with_background(color);
        }
        if let Some(line) = keyword(self.underline.as_deref(), field, "underline")? {
            let line_color = color(self.underline_color.as_deref(), field, "underline_color")?;
            style = style.with_underline(line, line_color);
        }
        if let Some(line) = keyword(self.strikethrough.as_deref(), field, "strikethrough")? {
            let line_color = color(
                self.strikethrough_color.as_deref(),
                field,
                "strikethrough_color",
            )?;
            style = style.with_strikethrough(line, line_color);
        }
        if let Some(offset) = self.baseline_offset {
            style = style.with_baseline_offset(offset);
        }
        if let Some(kerning) = self.kerning {
            style = style.with_kerning(kerning);
        }
        if let Some(ligatures) = self.ligatures {
            style = style.with_ligatures(ligatures);
        }
        if let Some(link) = &self.link {
            style = style.with_link(link.as_str());
        }
        if let Some(transform) = keyword(self.transform.as_deref(), field, "transform")? {
            style = style.with_text_transform(transform);
        }
        if let Some(paragraph) = &self.paragraph {
            style = paragraph.apply(style, &format!("{field}.paragraph"))?;
        }

        Ok(style)
    }
}

impl ParagraphConfig {
    fn apply(&self, mut style: Style, field: &str) -> Result<Style, ConfigError> {
        if let Some(alignment) = keyword(self.alignment.as_deref(), field, "alignment")? {
            style = style.with_alignment(alignment);
        }
        if let Some(spacing) = self.line_spacing {
            style = style.with_line_spacing(spacing);
        }
        if self.spacing_before.is_some() || self.spacing_after.is_some() {
            style = style.with_paragraph_spacing(
                self.spacing_before.unwrap_or_default(),
                self.spacing_after.unwrap_or_default(),
            );
        }
        if self.first_line_head_indent.is_some()
            || self.head_indent.is_some()
            || self.tail_indent.is_some()
        {
            style = style.with_indents(
                self.first_line_head_indent.unwrap_or_default(),
                self.head_indent.unwrap_or_default(),
                self.tail_indent.unwrap_or_default(),
            );
        }
        if let Some(mode) = keyword(self.line_break_mode.as_deref(), field, "line_break_mode")? {
            style = style.with_line_break_mode(mode);
        }
        if let (Some(min), Some(max)) = (self.minimum_line_height, self.maximum_line_height)
            && min > max
        {
            return Err(ConfigError::Validation(format!(
                "{field}.minimum_line_height cannot exceed maximum_line_height"
            )));
        }
        if self.minimum_line_height.is_some() || self.maximum_line_height.is_some() {
            style = style.with_line_height(self.minimum_line_height, self.maximum_line_height);
        }
        if let Some(multiple) = self.line_height_multiple {
            require_positive(multiple, &format!("{field}.line_height_multiple"))?;
            style = style.with_line_height_multiple(multiple);
        }
        if let Some(factor) = self.hyphenation_factor {
            if !(0.0..=1.0).contains(&factor) {
                return Err(ConfigError::Validation(format!(
                    "{field}.hyphenation_factor must be between 0 and 1"
                )));
            }
            style = style.with_hyphenation_factor(factor);
        }
        if let Some(direction) =
            keyword(self.writing_direction.as_deref(), field, "writing_direction")?
        {
            style = style.with_writing_direction(direction);
        }
        Ok(style)
    }
}

fn color(value: Option<&str>, field: &str, key: &str) -> Result<Option<Color>, ConfigError> {
    value.map(Color::from_hex).transpose().map_err(|source| ConfigError::Style {
        field: format!("{field}.{key}"),
        source,
    })
}

fn keyword<T>(value: Option<&str>, field: &str, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = StyleError>,
{
    value.map(str::parse).transpose().map_err(|source| ConfigError::Style {
        field: format!("{field}.{key}"),
        source,
    })
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_positive(value: f64, field: &str) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}
