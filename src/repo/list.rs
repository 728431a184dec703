use rayon::prelude::*;
use tap::Tap;
use tracing::*;

use crate::error::{Error, Result};
use crate::store::{ObjectStore, TAG_PREFIX};
use crate::tag::{parse, Tag, TagKind};
use crate::timestamp::Timestamp;
use crate::version;

impl<S: ObjectStore> super::Repo<S> {
    /// Tag names in store order, without `refs/tags/`.
    fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_references(TAG_PREFIX)?
            .into_iter()
            .filter_map(|name| name.strip_prefix(TAG_PREFIX).map(str::to_owned))
            .collect())
    }

    /// All tag names, highest version first.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let names = self
            .tag_names()?
            .tap_mut(|names| version::sort_descending(names));
        debug!(count = names.len(), "Sorted tag names");
        Ok(names)
    }

    /// All tags, fully resolved, most recent first.
    ///
    /// Fails if any tag fails to resolve; the error is that of the first failing tag in store
    /// order.
    pub fn list_full(&self) -> Result<Vec<Tag>> {
        let names = self.tag_names()?;

        let resolved = self.pool()?.install(|| {
            names
                .par_iter()
                .map(|name| {
                    let tag = self.resolve_by_name(name)?;
                    let when = self.tag_time(&tag)?;
                    Ok((when, tag))
                })
                .collect::<Vec<Result<_>>>()
        });

        let tags = resolved
            .into_iter()
            .collect::<Result<Vec<(Timestamp, Tag)>>>()?
            .tap_mut(|tags| tags.sort_by(|(a, _), (b, _)| b.0.cmp(&a.0)));
        debug!(count = tags.len(), "Sorted tags by time");

        Ok(tags.into_iter().map(|(_, tag)| tag).collect())
    }

    /// The time a tag sorts by: when it was tagged, or for a lightweight tag when its commit
    /// was committed. Commit times are cached per commit id.
    fn tag_time(&self, tag: &Tag) -> Result<Timestamp> {
        match tag.kind() {
            TagKind::Annotated(annotation) => Ok(annotation.tagger.when.clone()),
            TagKind::Lightweight => {
                let id = tag.target_id();
                if let Some(when) = self.commit_times.get(id) {
                    return Ok(when);
                }
                trace!(%id, "Reading commit time");
                let bytes = self.store.read_object(id)?;
                let when = parse::commit_time(&bytes)
                    .map_err(|source| Error::MalformedObject { id: *id, source })?;
                self.commit_times.insert(*id, when.clone());
                Ok(when)
            }
        }
    }
}
