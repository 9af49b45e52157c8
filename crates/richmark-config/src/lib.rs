//! Style sheet configuration for richmark.
//!
//! Parses `richmark.toml` style sheets with serde and provides
//! auto-discovery of the file in parent directories.
//!
//! ```toml
//! [default]
//! font = "Helvetica"
//! size = 12.0
//!
//! [styles.b]
//! weight = 700
//!
//! [[rules]]
//! pattern = "@[a-z]+"
//! styles = ["b"]
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

mod style;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use richmark_style::{
    RegexStyler, RuleOptions, Style, StyleError, StyleName, StyleTable, TagGroup,
};
use serde::Deserialize;

pub use style::{ParagraphConfig, StyleConfig};

/// Style sheet filename to search for.
pub const CONFIG_FILENAME: &str = "richmark.toml";

/// CLI settings that override style sheet values.
///
/// All fields are optional. Only non-None values override the loaded sheet.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default style's font size.
    pub default_size: Option<f64>,
    /// Override the default style's font name.
    pub default_font: Option<String>,
}

/// A parsed style sheet.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSheet {
    /// The `Default`-named style applied to the whole text.
    pub default: Option<StyleConfig>,
    /// Tag-addressable styles, keyed by tag name.
    pub styles: BTreeMap<String, StyleConfig>,
    /// Regex rules, applied in order.
    pub rules: Vec<RuleConfig>,
    /// Interpret `color` and `<a href>` tag attributes.
    pub tag_attributes: bool,

    /// Path to the style sheet file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// One `[[rules]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub pattern: String,
    /// Names of styles merged in order to style each match.
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
    #[serde(default)]
    pub multi_line: bool,
}

fn default_case_insensitive() -> bool {
    true
}

impl RuleConfig {
    fn options(&self) -> RuleOptions {
        RuleOptions {
            case_insensitive: self.case_insensitive,
            multi_line: self.multi_line,
            ..RuleOptions::default()
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Style sheet not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A style value could not be converted.
    #[error("Invalid style value {field}: {source}")]
    Style {
        /// Style sheet field path (e.g., "`styles.em.color`").
        field: String,
        #[source]
        source: StyleError,
    },
}

impl StyleSheet {
    /// Load a style sheet with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `richmark.toml` in the current directory and
    /// parents, falling back to an empty sheet.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut sheet = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("no style sheet found, using empty sheet");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            sheet.apply_cli_settings(settings);
            sheet.validate()?;
        }

        Ok(sheet)
    }

    /// Parse and validate a style sheet from TOML text.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_config::StyleSheet;
    ///
    /// let sheet = StyleSheet::from_toml(r#"
    /// [styles.b]
    /// weight = 700
    /// "#).unwrap();
    /// assert!(sheet.style_table().unwrap().contains("b"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let sheet: Self = toml::from_str(content)?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Search for the style sheet in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load a style sheet from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading style sheet");
        let content = std::fs::read_to_string(path)?;
        let mut sheet = Self::from_toml(&content)?;
        sheet.config_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Apply CLI settings to the default style, creating it if needed.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if settings.default_size.is_none() && settings.default_font.is_none() {
            return;
        }
        let default = self.default.get_or_insert_with(StyleConfig::default);
        if let Some(size) = settings.default_size {
            default.size = Some(size);
        }
        if let Some(font) = &settings.default_font {
            default.font = Some(font.clone());
        }
    }

    /// Validate style values and rule references.
    ///
    /// Rule patterns are not compiled here; [`regex_styler`](Self::regex_styler)
    /// reports them per rule.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_style()?;
        self.named_styles()?;

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "rules[{index}].pattern cannot be empty"
                )));
            }
            if let Some(missing) = rule.styles.iter().find(|name| !self.styles.contains_key(*name)) {
                return Err(ConfigError::Validation(format!(
                    "rules[{index}].styles references undefined style `{missing}`"
                )));
            }
        }

        Ok(())
    }

    /// The `[default]` style, if present.
    pub fn default_style(&self) -> Result<Option<Style>, ConfigError> {
        self.default
            .as_ref()
            .map(|config| config.to_style(StyleName::Default, "default"))
            .transpose()
    }

    /// The `[styles.NAME]` styles, in name order.
    pub fn named_styles(&self) -> Result<Vec<Style>, ConfigError> {
        self.styles
            .iter()
            .map(|(name, config)| {
                require_tag_name(name)?;
                config.to_style(StyleName::named(name.as_str()), &format!("styles.{name}"))
            })
            .collect()
    }

    /// Default and named styles as a lookup table.
    pub fn style_table(&self) -> Result<StyleTable, ConfigError> {
        let mut table = StyleTable::from_styles(self.default_style()?);
        table.extend(self.named_styles()?);
        Ok(table)
    }

    /// Markup-mode styler over [`Style::system`].
    pub fn tag_group(&self) -> Result<TagGroup, ConfigError> {
        let group = TagGroup::from_table(self.style_table()?).with_base(Style::system());
        Ok(if self.tag_attributes {
            group.with_standard_resolver()
        } else {
            group
        })
    }

    /// Regex-mode styler over the default style.
    ///
    /// Rules whose pattern fails to compile are skipped and returned with
    /// their index.
    pub fn regex_styler(&self) -> Result<(RegexStyler, Vec<(usize, StyleError)>), ConfigError> {
        let table = self.style_table()?;
        let mut patterns = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            let styles = rule
                .styles
                .iter()
                .map(|name| {
                    table.get(name).cloned().ok_or_else(|| {
                        ConfigError::Validation(format!(
                            "rules[{index}].styles references undefined style `{name}`"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            patterns.push((rule.pattern.as_str(), rule.options(), styles));
        }
        Ok(RegexStyler::from_patterns(self.default_style()?, patterns))
    }
}

/// Style names must be usable as tag names.
fn require_tag_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
        return Err(ConfigError::Validation(format!(
            "style name `{name}` must be a non-empty alphanumeric tag name"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use richmark_style::{AttributeKey, AttributeValue, Color};

    use super::*;

    const SHEET: &str = r##"
tag_attributes = true

[default]
font = "Helvetica"
size = 12.0
color = "#000000"

[styles.bold]
weight = 700

[styles.em]
italic = true
underline = "single"
underline_color = "#ff0000"

[styles.em.paragraph]
alignment = "center"
line_spacing = 2.0

[[rules]]
pattern = "@[a-z]+"
styles = ["bold"]

[[rules]]
pattern = "TODO"
styles = ["bold", "em"]
case_insensitive = false
"##;

    #[test]
    fn test_parse_full_sheet() {
        let sheet = StyleSheet::from_toml(SHEET).unwrap();
        assert!(sheet.tag_attributes);
        assert_eq!(sheet.styles.len(), 2);
        assert_eq!(sheet.rules.len(), 2);
        assert!(sheet.rules[0].case_insensitive);
        assert!(!sheet.rules[1].case_insensitive);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = StyleSheet::from_toml("").unwrap();
        assert!(sheet.default.is_none());
        assert!(sheet.style_table().unwrap().is_empty());
        assert!(!sheet.tag_attributes);
    }

    #[test]
    fn test_style_table() {
        let table = StyleSheet::from_toml(SHEET).unwrap().style_table().unwrap();
        assert_eq!(table.names(), vec!["bold", "em"]);
        let default = table.default_style().unwrap();
        assert_eq!(
            default.get(&AttributeKey::ForegroundColor),
            Some(&AttributeValue::Color(Color::BLACK))
        );
    }

    #[test]
    fn test_rule_references_undefined_style() {
        let err = StyleSheet::from_toml(
            r#"
[[rules]]
pattern = "x"
styles = ["missing"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_invalid_style_name() {
        let err = StyleSheet::from_toml(
            r#"
[styles."two words"]
italic = true
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("two words"));
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = StyleSheet::from_toml("themes = []").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_regex_styler_reports_bad_patterns() {
        let sheet = StyleSheet::from_toml(
            r#"
[styles.b]
weight = 700

[[rules]]
pattern = "(unclosed"
styles = ["b"]

[[rules]]
pattern = "ok"
styles = ["b"]
"#,
        )
        .unwrap();
        let (styler, errors) = sheet.regex_styler().unwrap();
        assert_eq!(styler.rules().len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 0);
        assert!(matches!(errors[0].1, StyleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_regex_styler_uses_default_as_base() {
        let (styler, errors) = StyleSheet::from_toml(SHEET).unwrap().regex_styler().unwrap();
        assert!(errors.is_empty());
        assert!(styler.base().is_some());
        let spans = styler.spans("hi @bob TODO todo");
        let ranges: Vec<_> = spans.iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, vec![0..17, 3..7, 8..12]);
    }

    #[test]
    fn test_apply_cli_settings_creates_default() {
        let mut sheet = StyleSheet::from_toml("").unwrap();
        sheet.apply_cli_settings(&CliSettings {
            default_size: Some(18.0),
            ..Default::default()
        });
        let default = sheet.default_style().unwrap().unwrap();
        assert_eq!(
            default.get(&AttributeKey::FontSize).and_then(AttributeValue::as_f64),
            Some(18.0)
        );
        assert!(default.get(&AttributeKey::FontName).is_none());
    }

    #[test]
    fn test_apply_cli_settings_overrides() {
        let mut sheet = StyleSheet::from_toml(SHEET).unwrap();
        sheet.apply_cli_settings(&CliSettings {
            default_font: Some("Menlo".to_owned()),
            ..Default::default()
        });
        let default = sheet.default.as_ref().unwrap();
        assert_eq!(default.font.as_deref(), Some("Menlo"));
        assert_eq!(default.size, Some(12.0)); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = StyleSheet::load(Some(Path::new("/nonexistent/richmark.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, SHEET).unwrap();

        let sheet = StyleSheet::load(Some(&path), None).unwrap();
        assert_eq!(sheet.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(sheet.styles.len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_cli_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            default_size: Some(-1.0),
            ..Default::default()
        };
        let err = StyleSheet::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            StyleSheet::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            StyleSheet::discover_from(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }
}
