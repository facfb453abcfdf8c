//! Blog post records and DTOs.

use std::cmp::Reverse;

use hearts_core::content::{default_blog_date, DEFAULT_AUTHOR};
use hearts_core::error::CoreError;
use hearts_core::image_url::normalize_image_url;
use hearts_core::slug::{resolve_slug, validate_slug};
use hearts_core::types::{DocId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{require_non_blank, trimmed, validate_input, ImageSource, Record};
use crate::store::COLLECTION_BLOGS;

/// Cache key for the full blog list.
pub const BLOGS_CACHE_KEY: &str = "blogs_all";

/// A document from the `blogs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: DocId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_source: ImageSource,
    #[serde(default)]
    pub published: bool,
    /// Display date, e.g. "October 2026".
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BlogFilter {
    #[serde(default)]
    pub published_only: bool,
}

impl BlogFilter {
    pub fn published() -> Self {
        Self {
            published_only: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBlog {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Excerpt is required"))]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_source: ImageSource,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

impl BlogPatch {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Record for Blog {
    const COLLECTION: &'static str = COLLECTION_BLOGS;
    const CACHE_KEY: &'static str = BLOGS_CACHE_KEY;
    const ENTITY: &'static str = "Blog";

    type Filter = BlogFilter;
    type New = NewBlog;
    type Patch = BlogPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn new_slug(new: &NewBlog) -> String {
        resolve_slug(&new.title, new.slug.as_deref())
    }

    /// Newest first. Posts without a creation time sort last.
    fn sort(list: &mut [Self]) {
        list.sort_by_key(|b| (b.created_at.is_none(), Reverse(b.created_at)));
    }

    fn matches(&self, filter: &BlogFilter) -> bool {
        !filter.published_only || self.published
    }

    fn check(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".into());
        }
        if self.slug.is_empty() {
            return Err("slug is empty".into());
        }
        Ok(())
    }

    fn from_new(id: DocId, new: NewBlog, now: Timestamp) -> Result<Self, CoreError> {
        validate_input(&new)?;
        require_non_blank("Title", Some(&new.title))?;
        require_non_blank("Excerpt", Some(&new.excerpt))?;

        let slug = Self::new_slug(&new);
        validate_slug(&slug)?;

        let image = match new.image_source {
            ImageSource::Url => normalize_image_url(&new.image),
            ImageSource::Upload => new.image,
        };

        Ok(Self {
            id,
            title: new.title.trim().to_string(),
            slug,
            excerpt: new.excerpt.trim().to_string(),
            content: new.content,
            image,
            image_source: new.image_source,
            published: new.published,
            date: trimmed(new.date).unwrap_or_else(|| default_blog_date(now)),
            author: trimmed(new.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tags: clean_tags(new.tags),
            category: trimmed(new.category),
            meta_description: trimmed(new.meta_description),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    fn prepare_patch(mut patch: BlogPatch) -> Result<BlogPatch, CoreError> {
        require_non_blank("Title", patch.title.as_deref())?;
        require_non_blank("Excerpt", patch.excerpt.as_deref())?;
        if let Some(slug) = &patch.slug {
            validate_slug(slug)?;
        }
        if patch.image_source == Some(ImageSource::Url) {
            patch.image = patch.image.map(|url| normalize_image_url(&url));
        }
        if let Some(author) = &patch.author {
            if author.trim().is_empty() {
                patch.author = Some(DEFAULT_AUTHOR.to_string());
            }
        }
        patch.tags = patch.tags.map(clean_tags);
        Ok(patch)
    }
}
