//! Comment stripping and line joining.

/// Character that starts a line comment.
pub const COMMENT_MARKER: char = '\\';

/// Strips line comments and joins all lines into a single line.
///
/// Every line is cut at the first [`COMMENT_MARKER`], trimmed, and the lines are
/// joined by a single space. The marker is recognised anywhere on a line,
/// including inside `q(...)` strings.
pub fn normalize(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.find(COMMENT_MARKER) {
            Some(pos) => &line[..pos],
            None => line,
        })
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
