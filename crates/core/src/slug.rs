//! URL slug derivation and validation for artworks, blog posts and collections.

use crate::error::CoreError;

/// Maximum accepted slug length.
pub const MAX_SLUG_LEN: usize = 200;

/// Derive a URL-safe slug from a title.
///
/// Lowercases the input, turns every run of characters outside `[a-z0-9]`
/// into a single hyphen, and trims hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    result.trim_matches('-').to_string()
}

/// Validate a slug (non-empty, only lowercase alphanumeric + hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Resolve the slug to store for a record.
///
/// New records derive it from the title unless one was supplied. Existing
/// records keep the slug they were created with.
pub fn resolve_slug(title: &str, supplied: Option<&str>) -> String {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(slugify("A Moment Between Worlds!"), "a-moment-between-worlds");
    }

    #[test]
    fn slug_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("  Multi   Space--Test "), "multi-space-test");
    }

    #[test]
    fn slug_replaces_non_ascii() {
        assert_eq!(slugify("Café Pichwai"), "caf-pichwai");
    }

    #[test]
    fn slug_of_symbols_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn validate_accepts_derived_slug() {
        assert!(validate_slug(&slugify("Nandi painting")).is_ok());
    }

    #[test]
    fn validate_rejects_uppercase() {
        assert!(validate_slug("Nandi").is_err());
    }

    #[test]
    fn validate_rejects_empty() {
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn resolve_prefers_supplied_slug() {
        assert_eq!(resolve_slug("New Title", Some("old-slug")), "old-slug");
        assert_eq!(resolve_slug("New Title", Some("  ")), "new-title");
        assert_eq!(resolve_slug("New Title", None), "new-title");
    }
}
