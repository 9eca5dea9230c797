//! Labeled-value lookup shared by both pipelines.
//!
//! Labels look like `Title: Backend Engineer`, optionally bulleted or wrapped in
//! markdown bold (`**Title:** ...`). A line field stops at end of line; a block
//! field runs until the next `Label:` line or end of text.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Line-start prefix that tolerates a bullet and markdown bold around a label.
const LABEL_PREFIX: &str = r"^[ \t]*(?:[-*•][ \t]+)?\**";
const LABEL_SUFFIX: &str = r"\**[ \t]*:\**[ \t]*";
/// Start of the next `Label:` line. Requires whitespace after the colon so
/// bare URLs (`https://`) never end a block.
const NEXT_LABEL: &str = r"\n[ \t]*(?:[-*•][ \t]+)?\**[A-Za-z][A-Za-z /&()'-]{0,40}\**[ \t]*:\**(?:[ \t]|\n|\z)";

/// Pattern capturing the rest of the line after `label:` in group 1.
/// `label` is a regex fragment, so alternations like `Company(?: Name)?` work.
pub fn line_pattern(label: &str) -> String {
    format!(r"(?im){LABEL_PREFIX}(?:{label}){LABEL_SUFFIX}(.*)$")
}

/// Pattern capturing everything after `label:` up to the next label line or
/// end of text in group 1.
pub fn block_pattern(label: &str) -> String {
    format!(r"(?ims){LABEL_PREFIX}(?:{label}){LABEL_SUFFIX}(.*?)(?:{NEXT_LABEL}|\z)")
}

/// Compile a caller pattern case-insensitively.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Trimmed text of `group` in the first match. Blank captures count as misses.
pub fn capture(re: &Regex, text: &str, group: usize) -> Option<String> {
    let caps = re.captures(text)?;
    let value = caps.get(group)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// First non-blank capture across `patterns`, tried in order.
pub fn first_capture(patterns: &[Regex], text: &str, group: usize) -> Option<String> {
    patterns.iter().find_map(|re| capture(re, text, group))
}

/// Find a labeled value with a caller-supplied pattern.
///
/// Never fails: a pattern that does not compile, a missing match, or a group
/// index past the end all resolve to `None`.
pub fn extract_field(text: &str, pattern: &str, group: usize) -> Option<String> {
    match compile(pattern) {
        Ok(re) => capture(&re, text, group),
        Err(e) => {
            debug!(pattern, error = %e, "malformed field pattern, treating as miss");
            None
        }
    }
}

pub fn extract_field_or(text: &str, pattern: &str, group: usize, default: &str) -> String {
    extract_field(text, pattern, group).unwrap_or_else(|| default.to_string())
}

/// Try `patterns` in caller order; the first one that yields a value wins.
pub fn extract_first(text: &str, patterns: &[&str], group: usize) -> Option<String> {
    patterns.iter().find_map(|p| extract_field(text, p, group))
}

/// Compile one line pattern per built-in label, most specific label first.
pub(crate) fn line_patterns(labels: &[&str]) -> Vec<Regex> {
    labels
        .iter()
        .map(|l| Regex::new(&line_pattern(l)).unwrap())
        .collect()
}

pub(crate) fn block_patterns(labels: &[&str]) -> Vec<Regex> {
    labels
        .iter()
        .map(|l| Regex::new(&block_pattern(l)).unwrap())
        .collect()
}
