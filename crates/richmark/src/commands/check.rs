//! `richmark check` command implementation.

use std::path::PathBuf;

use clap::Args;
use richmark_config::StyleSheet;
use richmark_markup::parse;

use super::render::describe_diagnostics;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to the tagged text file.
    file: PathBuf,

    /// Also validate this style sheet and report tags it has no style for.
    #[arg(short, long)]
    styles: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or problems were found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let input = std::fs::read_to_string(&self.file)?;
        let markup = parse(&input);

        let mut problems = describe_diagnostics(&input, &markup);

        if let Some(path) = &self.styles {
            let sheet = StyleSheet::load(Some(path), None)?;
            let table = sheet.style_table()?;
            let mut unstyled: Vec<&str> = markup
                .tags
                .iter()
                .map(|tag| tag.name())
                .filter(|name| !table.contains(name))
                .collect();
            unstyled.sort_unstable();
            unstyled.dedup();
            for name in unstyled {
                output.info(&format!("note: no style for tag <{name}>"));
            }
            let (_, rule_errors) = sheet.regex_styler()?;
            problems.extend(
                rule_errors
                    .iter()
                    .map(|(index, error)| format!("rules[{index}]: {error}")),
            );
        }

        if problems.is_empty() {
            output.success(&format!("{}: no problems found", self.file.display()));
            return Ok(());
        }

        for problem in &problems {
            output.warning(&format!("{}:{problem}", self.file.display()));
        }
        Err(CliError::Validation(format!(
            "{} problem(s) found",
            problems.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str, sheet: Option<&str>) -> Result<(), CliError> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.txt");
        std::fs::write(&file, input).unwrap();
        let styles = sheet.map(|content| {
            let path = dir.path().join("styles.toml");
            std::fs::write(&path, content).unwrap();
            path
        });
        CheckArgs {
            file,
            styles,
            verbose: false,
        }
        .execute()
    }

    #[test]
    fn test_clean_file_passes() {
        assert!(check("<b>ok</b> &amp; fine", None).is_ok());
    }

    #[test]
    fn test_problems_fail() {
        let err = check("<b>open &bogus;", None).unwrap_err();
        assert_eq!(err.to_string(), "2 problem(s) found");
    }

    #[test]
    fn test_bad_rule_pattern_is_a_problem() {
        let sheet = r#"
[styles.b]
weight = 700

[[rules]]
pattern = "("
styles = ["b"]
"#;
        assert!(check("<b>x</b>", Some(sheet)).is_err());
    }

    #[test]
    fn test_unstyled_tags_are_not_problems() {
        assert!(check("<zz>x</zz>", Some("")).is_ok());
    }
}
