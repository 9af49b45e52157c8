//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// 1-based line and column (in scalars) of byte `offset` in `input`.
pub(crate) fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}
