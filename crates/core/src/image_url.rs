//! Image URL and object-path helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Host serving direct image bytes for Google Drive files.
pub const DRIVE_IMAGE_HOST: &str = "https://lh3.googleusercontent.com/d";

/// Folder for artwork images inside the bucket.
pub const FOLDER_ARTWORKS: &str = "artworks";

/// Folder for blog cover images inside the bucket.
pub const FOLDER_BLOGS: &str = "blogs";

/// All folders uploads may target.
pub const VALID_FOLDERS: &[&str] = &[FOLDER_ARTWORKS, FOLDER_BLOGS];

static DRIVE_PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

static DRIVE_QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Rewrite a Google Drive share link into a directly embeddable image URL.
///
/// Handles `/d/<id>/view` and `?id=<id>` forms. Anything else is returned
/// trimmed but otherwise untouched.
pub fn normalize_image_url(url: &str) -> String {
    let url = url.trim();
    let id = DRIVE_PATH_ID
        .captures(url)
        .or_else(|| DRIVE_QUERY_ID.captures(url))
        .and_then(|c| c.get(1));

    match id {
        Some(id) => format!("{DRIVE_IMAGE_HOST}/{}", id.as_str()),
        None => url.to_string(),
    }
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the bucket path for an upload: `{folder}/{unix_millis}_{sanitized_name}`.
pub fn object_path(folder: &str, unix_millis: i64, file_name: &str) -> String {
    format!("{folder}/{unix_millis}_{}", sanitize_file_name(file_name))
}
