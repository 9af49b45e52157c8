//! Error types for style construction and application.

/// Error raised while building or applying styles.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// A regex rule pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A range is reversed, out of bounds, or splits a UTF-8 scalar.
    #[error("invalid range {start}..{end} for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// A color string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color `{0}`: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// A keyword value (alignment, underline style, ...) is not recognized.
    #[error("unknown {kind} `{value}`")]
    UnknownValue { kind: &'static str, value: String },
}
