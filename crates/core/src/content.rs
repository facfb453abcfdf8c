//! Text helpers for artwork and blog content: list-field parsing, default
//! bylines, reading-time estimates and paragraph splitting.

use crate::types::Timestamp;

/// Byline used when a blog post is saved without an author.
pub const DEFAULT_AUTHOR: &str = "Arunima Jain";

/// Words per minute assumed by [`estimate_reading_minutes`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Split a multi-line form field into its non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a comma-separated tag field, trimming each tag and dropping empties.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default display date for a new blog post, e.g. `"October 2026"`.
pub fn default_blog_date(now: Timestamp) -> String {
    now.format("%B %Y").to_string()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn estimate_reading_minutes(text: &str) -> usize {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Human-readable reading time, e.g. `"3 min read"`.
pub fn reading_time_label(text: &str) -> String {
    format!("{} min read", estimate_reading_minutes(text))
}

/// Split post content into paragraphs separated by blank lines.
pub fn paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
