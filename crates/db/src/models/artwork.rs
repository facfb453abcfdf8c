//! Artwork records and DTOs.

use hearts_core::error::CoreError;
use hearts_core::image_url::normalize_image_url;
use hearts_core::slug::{resolve_slug, validate_slug};
use hearts_core::types::{DocId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{default_true, require_non_blank, trimmed, validate_input, ImageSource, Record};
use crate::store::COLLECTION_ARTWORKS;

/// Cache key for the full artwork list.
pub const ARTWORKS_CACHE_KEY: &str = "artworks_all";

/// A labelled symbolism note, e.g. "Lotus flowers" / "Purity, spiritual awakening".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbolism {
    pub label: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A document from the `artworks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: DocId,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub medium: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vastu_effect: Option<String>,
    #[serde(default)]
    pub vastu_placement: Vec<String>,
    #[serde(default)]
    pub symbolism: Vec<Symbolism>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_source: ImageSource,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Display position; ties keep their existing relative order.
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Read-side filters for artwork lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ArtworkFilter {
    #[serde(default)]
    pub published_only: bool,
    #[serde(default)]
    pub available_only: bool,
}

impl ArtworkFilter {
    /// Published artworks, optionally narrowed to ones still for sale.
    pub fn public(available_only: bool) -> Self {
        Self {
            published_only: true,
            available_only,
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Input for creating an artwork.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewArtwork {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Derived from the title when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[validate(length(min = 1, message = "Medium is required"))]
    pub medium: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub vastu_effect: Option<String>,
    #[serde(default)]
    pub vastu_placement: Vec<String>,
    #[serde(default)]
    pub symbolism: Vec<Symbolism>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_source: ImageSource,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub order: i64,
}

/// Partial artwork update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vastu_effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vastu_placement: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbolism: Option<Vec<Symbolism>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ArtworkPatch {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }

    pub fn available(is_available: bool) -> Self {
        Self {
            is_available: Some(is_available),
            ..Self::default()
        }
    }
}

/// Drop symbolism entries missing either half.
fn complete_symbolism(entries: Vec<Symbolism>) -> Vec<Symbolism> {
    entries
        .into_iter()
        .filter(|s| !s.label.trim().is_empty() && !s.text.trim().is_empty())
        .collect()
}

fn non_blank_lines(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().filter(|l| !l.trim().is_empty()).collect()
}

// ---------------------------------------------------------------------------
// Record impl
// ---------------------------------------------------------------------------

impl Record for Artwork {
    const COLLECTION: &'static str = COLLECTION_ARTWORKS;
    const CACHE_KEY: &'static str = ARTWORKS_CACHE_KEY;
    const ENTITY: &'static str = "Artwork";

    type Filter = ArtworkFilter;
    type New = NewArtwork;
    type Patch = ArtworkPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn new_slug(new: &NewArtwork) -> String {
        resolve_slug(&new.title, new.slug.as_deref())
    }

    /// Ascending `order`; the sort is stable so ties keep list order.
    fn sort(list: &mut [Self]) {
        list.sort_by_key(|a| a.order);
    }

    fn matches(&self, filter: &ArtworkFilter) -> bool {
        (!filter.published_only || self.published) && (!filter.available_only || self.is_available)
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

    fn from_new(id: DocId, new: NewArtwork, now: Timestamp) -> Result<Self, CoreError> {
        validate_input(&new)?;
        require_non_blank("Title", Some(&new.title))?;
        require_non_blank("Medium", Some(&new.medium))?;

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
            artist: trimmed(new.artist),
            size: trimmed(new.size),
            medium: new.medium.trim().to_string(),
            description: new.description,
            bullet_points: non_blank_lines(new.bullet_points),
            vastu_effect: trimmed(new.vastu_effect),
            vastu_placement: non_blank_lines(new.vastu_placement),
            symbolism: complete_symbolism(new.symbolism),
            image,
            image_source: new.image_source,
            published: new.published,
            is_available: new.is_available,
            collection: trimmed(new.collection),
            price: trimmed(new.price),
            order: new.order,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    fn prepare_patch(mut patch: ArtworkPatch) -> Result<ArtworkPatch, CoreError> {
        require_non_blank("Title", patch.title.as_deref())?;
        require_non_blank("Medium", patch.medium.as_deref())?;
        if let Some(slug) = &patch.slug {
            validate_slug(slug)?;
        }
        if patch.image_source == Some(ImageSource::Url) {
            patch.image = patch.image.map(|url| normalize_image_url(&url));
        }
        patch.bullet_points = patch.bullet_points.map(non_blank_lines);
        patch.vastu_placement = patch.vastu_placement.map(non_blank_lines);
        patch.symbolism = patch.symbolism.map(complete_symbolism);
        Ok(patch)
    }
}
