//! Error types for tag resolution

use thiserror::Error;

use crate::digest::Digest;
use crate::tag::parse::ParseError;

/// Everything that can go wrong while resolving or listing tags.
///
/// [`Error::NotFound`] and [`Error::MalformedObject`] are deterministic: asking again gives the
/// same answer. [`Error::StoreUnavailable`] may be transient and is left to the caller to retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tag not found: {0}")]
    NotFound(String),

    #[error("malformed object {id:x}")]
    MalformedObject {
        id: Digest,
        #[source]
        source: ParseError,
    },

    #[error("object store unavailable")]
    StoreUnavailable(#[from] StoreError),

    #[error("could not start resolver pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Returns `true` if asking again could give a different answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_) | Error::ThreadPool(_))
    }
}

/// A failed call into an [`ObjectStore`](crate::store::ObjectStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`git {args}` exited with {status}: {stderr}")]
    Command {
        args: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("object not found in database: {0:x}")]
    MissingObject(Digest),

    #[error("object {0:x} is only available in a pack file")]
    Packed(Digest),

    #[error("corrupt store: {0}")]
    Corrupt(String),
}

/// Result type using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
