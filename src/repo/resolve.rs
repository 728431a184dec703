use tracing::*;

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::store::{ObjectKind, ObjectStore, TAG_PREFIX};
use crate::tag::{Annotation, Tag};

impl<S: ObjectStore> super::Repo<S> {
    /// Look up `refs/tags/{name}` and resolve what it points at.
    pub fn resolve_by_name(&self, name: &str) -> Result<Tag> {
        let refname = format!("{TAG_PREFIX}{name}");
        let id = self
            .store
            .resolve_reference(&refname)?
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;

        Ok(self.resolve_by_id(&id)?.with_name(name))
    }

    /// Resolve the object a tag reference stores. The returned tag has no name.
    ///
    /// A commit becomes a lightweight tag without reading its contents; anything else is read
    /// and parsed as a tag object. Successful results are cached, failures are not.
    pub fn resolve_by_id(&self, id: &Digest) -> Result<Tag> {
        if let Some(tag) = self.cache.get(id) {
            trace!(%id, "Hit cache");
            return Ok(tag);
        }

        let tag = match self.store.object_type(id)? {
            ObjectKind::Commit => Tag::lightweight(*id),
            kind => {
                trace!(%id, %kind, "Reading tag object");
                let bytes = self.store.read_object(id)?;
                let annotation = Annotation::parse(&bytes)
                    .map_err(|source| Error::MalformedObject { id: *id, source })?;
                Tag::annotated(*id, annotation)
            }
        };

        self.cache.set(*id, tag.clone());
        Ok(tag)
    }

    /// Returns `true` if `refs/tags/{name}` exists.
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .store
            .resolve_reference(&format!("{TAG_PREFIX}{name}"))?
            .is_some())
    }
}
