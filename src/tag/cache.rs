use quick_cache::sync::Cache;
use tracing::*;

use crate::digest::Digest;

use super::Tag;

/// Resolved tags keyed by the id their reference stores.
///
/// Objects never change once written, so entries are never invalidated. The cache is bounded;
/// an evicted entry is simply resolved again on the next lookup.
pub struct TagCache {
    inner: Cache<Digest, Tag>,
}

impl TagCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Cache::new(capacity.max(1)),
        }
    }

    pub fn get(&self, id: &Digest) -> Option<Tag> {
        self.inner.get(id)
    }

    /// Store a resolved tag. Names are per lookup and are not kept.
    ///
    /// If `id` is already present the existing entry wins; racing resolvers of the same id
    /// produce identical tags, so dropping the later one changes nothing.
    pub fn set(&self, id: Digest, tag: Tag) {
        if self.inner.get(&id).is_some() {
            trace!(%id, "Already cached");
            return;
        }
        debug!(%id, annotated = tag.is_annotated(), "Caching tag");
        self.inner.insert(id, tag.with_name(""));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
