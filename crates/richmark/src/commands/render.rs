//! `richmark render` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use richmark_config::{CliSettings, StyleSheet};
use richmark_markup::{Markup, parse};
use richmark_style::{AttributedString, ResolvedSpan, apply_spans};
use serde::Serialize;

use super::line_col;
use crate::error::CliError;
use crate::output::Output;

/// Output format for rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// One line per attribute run.
    #[default]
    Text,
    /// Spans and runs as JSON.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the tagged text file.
    file: PathBuf,

    /// Path to the style sheet (default: auto-discover richmark.toml).
    #[arg(short, long)]
    styles: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Default font size (overrides style sheet).
    #[arg(long)]
    default_size: Option<f64>,

    /// Default font name (overrides style sheet).
    #[arg(long)]
    default_font: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything produced by rendering one document.
#[derive(Debug, Serialize)]
pub(crate) struct Rendered {
    /// Plain text before text transforms.
    plain_text: String,
    /// Final text after text transforms.
    text: String,
    /// Spans in application order, as byte ranges into `plain_text`.
    spans: Vec<ResolvedSpan>,
    /// Attribute runs as byte ranges into `text`.
    runs: Vec<richmark_style::Run>,
    diagnostics: Vec<String>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or style sheet cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_size: self.default_size,
            default_font: self.default_font,
        };
        let sheet = StyleSheet::load(self.styles.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &sheet.config_path {
            tracing::info!(path = %path.display(), "using style sheet");
        }

        let input = std::fs::read_to_string(&self.file)?;
        let rendered = render_document(&input, &sheet, &output)?;

        for diagnostic in &rendered.diagnostics {
            output.warning(&format!("{}:{diagnostic}", self.file.display()));
        }

        match self.format {
            Format::Json => output.result(&serde_json::to_string_pretty(&rendered)?)?,
            Format::Text => {
                for run in &rendered.runs {
                    let range = format!("{:>4}..{:<4}", run.range.start, run.range.end);
                    output.result(&format!(
                        "{} {} {}",
                        output.dimmed(&range),
                        output.highlighted(&format!("{:?}", &rendered.text[run.range.clone()])),
                        run.attributes,
                    ))?;
                }
            }
        }

        Ok(())
    }
}

/// Parse `input` and apply the sheet's tag styles, then its regex rules.
pub(crate) fn render_document(
    input: &str,
    sheet: &StyleSheet,
    output: &Output,
) -> Result<Rendered, CliError> {
    let markup = parse(input);
    let group = sheet.tag_group()?;
    let (styler, rule_errors) = sheet.regex_styler()?;
    for (index, error) in &rule_errors {
        output.warning(&format!("Skipping rules[{index}]: {error}"));
    }

    // The tag group already applied the default style; rules add matches only.
    let mut spans = group.spans(&markup);
    spans.extend(
        styler
            .rules()
            .iter()
            .flat_map(|rule| rule.spans(&markup.text)),
    );

    let mut styled = AttributedString::new(markup.text.as_str());
    apply_spans(&mut styled, &spans);
    styled.apply_text_transforms();

    Ok(Rendered {
        diagnostics: describe_diagnostics(input, &markup),
        text: styled.as_str().to_owned(),
        runs: styled.runs().to_vec(),
        plain_text: markup.text,
        spans,
    })
}

/// `line:col: message` for each parse diagnostic.
pub(crate) fn describe_diagnostics(input: &str, markup: &Markup) -> Vec<String> {
    markup
        .diagnostics
        .iter()
        .map(|d| {
            let (line, col) = line_col(input, d.offset());
            format!("{line}:{col}: {d}")
        })
        .collect()
}
