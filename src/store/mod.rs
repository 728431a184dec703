//! Access to references and objects.
//!
//! Tag resolution only needs four questions answered by a repository. [`ObjectStore`] is that
//! boundary; [`loose::LooseStore`] answers them by reading `.git` directly and
//! [`command::GitCommand`] by asking the `git` binary.

pub mod command;
pub mod loose;

use std::fmt::Display;

use crate::digest::Digest;
use crate::error::StoreError;

/// Namespace all tag references live under.
pub const TAG_PREFIX: &str = "refs/tags/";

/// The declared type of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Commit,
    Tag,
    Tree,
    Blob,
    Other(String),
}

impl ObjectKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "commit" => ObjectKind::Commit,
            "tag" => ObjectKind::Tag,
            "tree" => ObjectKind::Tree,
            "blob" => ObjectKind::Blob,
            other => ObjectKind::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Other(other) => other,
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository's references and objects, as seen by the tag resolver.
///
/// Every call may block. Implementations must be shareable between threads, since a listing
/// resolves many tags in parallel.
pub trait ObjectStore: Send + Sync {
    /// The id a full reference name (`refs/tags/v1.0`) points at, or `None` if there is no such
    /// reference.
    fn resolve_reference(&self, name: &str) -> Result<Option<Digest>, StoreError>;

    /// The declared type of the object at `id`.
    fn object_type(&self, id: &Digest) -> Result<ObjectKind, StoreError>;

    /// The contents of the object at `id`, without the `"{type} {len}\0"` header.
    fn read_object(&self, id: &Digest) -> Result<Vec<u8>, StoreError>;

    /// Full names of all references starting with `prefix`, in store order.
    fn list_references(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for Box<S> {
    fn resolve_reference(&self, name: &str) -> Result<Option<Digest>, StoreError> {
        (**self).resolve_reference(name)
    }

    fn object_type(&self, id: &Digest) -> Result<ObjectKind, StoreError> {
        (**self).object_type(id)
    }

    fn read_object(&self, id: &Digest) -> Result<Vec<u8>, StoreError> {
        (**self).read_object(id)
    }

    fn list_references(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_references(prefix)
    }
}
