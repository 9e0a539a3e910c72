//! Output text normalization.
//!
//! Every successful conversion passes through [`normalize_markdown`] before
//! it is returned: trailing whitespace is stripped per line (which also
//! normalizes CRLF line endings) and runs of blank lines are collapsed to a
//! single blank line. Titles are returned as-is.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n").expect("line break regex pattern is valid and should compile"));
static EXCESSIVE_NEWLINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("excessive newlines regex pattern is valid and should compile"));

/// Normalize converted Markdown.
///
/// Two passes: right-trim every line (joining with `\n`, so CRLF input comes
/// out with Unix line endings), then collapse three or more consecutive
/// newlines to exactly two. Leading whitespace and single blank lines are
/// preserved.
pub fn normalize_markdown(text: &str) -> String {
    let trimmed = LINE_BREAK_REGEX
        .split(text)
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    EXCESSIVE_NEWLINES_REGEX.replace_all(&trimmed, "\n\n").into_owned()
}
