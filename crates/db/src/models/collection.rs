//! Collections derived from the `collection` field of published artworks.

use std::collections::BTreeSet;

use hearts_core::slug::slugify;
use serde::Serialize;

use super::Artwork;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub slug: String,
    pub artwork_count: usize,
    /// Distinct `medium` values across the collection.
    pub media_count: usize,
    /// Image of the first artwork in display order.
    pub cover_image: String,
}

/// A collection with its artworks in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub summary: CollectionSummary,
    pub artworks: Vec<Artwork>,
}

fn collection_name(artwork: &Artwork) -> Option<&str> {
    artwork
        .collection
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn summarize(name: &str, members: &[&Artwork]) -> CollectionSummary {
    let media: BTreeSet<&str> = members.iter().map(|a| a.medium.as_str()).collect();
    CollectionSummary {
        name: name.to_string(),
        slug: slugify(name),
        artwork_count: members.len(),
        media_count: media.len(),
        cover_image: members.first().map(|a| a.image.clone()).unwrap_or_default(),
    }
}

/// Group published artworks by collection, in order of first appearance.
pub fn summarize_collections(artworks: &[Artwork]) -> Vec<CollectionSummary> {
    let mut groups: Vec<(&str, Vec<&Artwork>)> = Vec::new();
    for artwork in artworks.iter().filter(|a| a.published) {
        let Some(name) = collection_name(artwork) else {
            continue;
        };
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, members)) => members.push(artwork),
            None => groups.push((name, vec![artwork])),
        }
    }
    groups
        .iter()
        .map(|(name, members)| summarize(name, members))
        .collect()
}

/// Find one collection by its slug.
pub fn find_collection(artworks: &[Artwork], slug: &str) -> Option<CollectionDetail> {
    let members: Vec<&Artwork> = artworks
        .iter()
        .filter(|a| a.published)
        .filter(|a| collection_name(a).is_some_and(|name| slugify(name) == slug))
        .collect();
    let name = collection_name(members.first()?)?;
    Some(CollectionDetail {
        summary: summarize(name, &members),
        artworks: members.into_iter().cloned().collect(),
    })
}
