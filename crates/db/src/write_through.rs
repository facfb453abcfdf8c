//! Write-through mutators.
//!
//! After a remote write is confirmed, the same change is applied to the
//! cached collection list and the list is re-sorted into its canonical order.
//! When the list is not cached these are no-ops; the next reader fetches
//! fresh data instead.

use crate::cache::TtlCache;
use crate::models::{merge, Record};
use crate::store::DocumentData;

/// Append (or replace, when the id already exists) a confirmed record.
pub fn cache_insert<R: Record>(cache: &TtlCache<Vec<R>>, record: &R) -> bool {
    cache.update(R::CACHE_KEY, |list| {
        match list.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => list.push(record.clone()),
        }
        R::sort(list);
    })
}

/// Insert several confirmed records at once.
pub fn cache_extend<R: Record>(cache: &TtlCache<Vec<R>>, records: &[R]) -> bool {
    cache.update(R::CACHE_KEY, |list| {
        for record in records {
            match list.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => *existing = record.clone(),
                None => list.push(record.clone()),
            }
        }
        R::sort(list);
    })
}

/// Merge a confirmed patch into the cached copy of `id`.
///
/// If the merged record no longer decodes, the entry is dropped so the next
/// read refetches.
pub fn cache_patch<R: Record>(cache: &TtlCache<Vec<R>>, id: &str, patch: &DocumentData) -> bool {
    cache_patch_many(cache, &[(id.to_string(), patch.clone())])
}

/// Merge several confirmed patches, keyed by id.
pub fn cache_patch_many<R: Record>(
    cache: &TtlCache<Vec<R>>,
    patches: &[(String, DocumentData)],
) -> bool {
    let mut poisoned = false;
    let updated = cache.update(R::CACHE_KEY, |list| {
        for (id, patch) in patches {
            let Some(existing) = list.iter_mut().find(|r| r.id() == id) else {
                continue;
            };
            match merge(existing, patch) {
                Ok(merged) => *existing = merged,
                Err(e) => {
                    tracing::warn!(collection = R::COLLECTION, id, error = %e, "Cached record no longer decodes");
                    poisoned = true;
                }
            }
        }
        R::sort(list);
    });

    if poisoned {
        cache.invalidate(Some(R::CACHE_KEY));
        return false;
    }
    updated
}

/// Drop a deleted record from the cached list.
pub fn cache_remove<R: Record>(cache: &TtlCache<Vec<R>>, id: &str) -> bool {
    cache.update(R::CACHE_KEY, |list| list.retain(|r| r.id() != id))
}

/// Empty the cached list after a delete-all.
pub fn cache_clear<R: Record>(cache: &TtlCache<Vec<R>>) {
    cache.set(R::CACHE_KEY, Vec::new());
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Artwork, ARTWORKS_CACHE_KEY};

    fn artwork(id: &str, order: i64) -> Artwork {
        serde_json::from_value(json!({
            "id": id, "title": id, "slug": id, "medium": "Acrylic", "order": order
        }))
        .unwrap()
    }

    fn ids(cache: &TtlCache<Vec<Artwork>>) -> Vec<String> {
        cache
            .get(ARTWORKS_CACHE_KEY)
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.id)
            .collect()
    }

    #[test]
    fn uncached_lists_are_left_alone() {
        let cache = TtlCache::default();
        assert!(!cache_insert(&cache, &artwork("a", 0)));
        assert!(!cache_remove::<Artwork>(&cache, "a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_keeps_order_sorted() {
        let cache = TtlCache::default();
        cache.set(ARTWORKS_CACHE_KEY, vec![artwork("a", 0), artwork("c", 2)]);

        assert!(cache_insert(&cache, &artwork("b", 1)));
        assert_eq!(ids(&cache), vec!["a", "b", "c"]);
    }

    #[test]
    fn patch_resorts_and_remove_filters() {
        let cache = TtlCache::default();
        cache.set(ARTWORKS_CACHE_KEY, vec![artwork("a", 0), artwork("b", 1)]);

        let patch = match json!({"order": 5}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(cache_patch(&cache, "a", &patch));
        assert_eq!(ids(&cache), vec!["b", "a"]);

        assert!(cache_remove::<Artwork>(&cache, "b"));
        assert_eq!(ids(&cache), vec!["a"]);
    }

    #[test]
    fn undecodable_patch_invalidates_entry() {
        let cache = TtlCache::default();
        cache.set(ARTWORKS_CACHE_KEY, vec![artwork("a", 0)]);

        let patch = match json!({"order": "not a number"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(!cache_patch(&cache, "a", &patch));
        assert_eq!(cache.get(ARTWORKS_CACHE_KEY), None);
    }
}
