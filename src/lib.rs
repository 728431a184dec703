//! Resolution, caching and ordering of the tags in a git repository.
//!
//! A tag reference either points straight at a commit (a lightweight tag) or at a tag object
//! carrying a tagger, a time and a message (an annotated tag). [`Repo`] resolves both shapes
//! into a [`Tag`], caches the result by object id, and lists a repository's tags by version or
//! by time.

#[cfg(test)]
mod test;

pub mod digest;
pub mod error;
pub mod repo;
pub mod store;
pub mod tag;
pub mod timestamp;
pub mod version;

pub use crate::digest::Digest;
pub use crate::error::{Error, Result, StoreError};
pub use crate::repo::{Config, Repo};
pub use crate::store::{ObjectKind, ObjectStore, TAG_PREFIX};
pub use crate::tag::{Annotation, Signature, Tag, TagKind};
