mod list;
mod resolve;

use once_cell::sync::OnceCell;
use quick_cache::sync::Cache;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::*;

use crate::digest::Digest;
use crate::error::Result;
use crate::store::ObjectStore;
use crate::tag::cache::TagCache;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of resolved tags kept in memory. Commit times of lightweight tags are
    /// kept in a second cache of the same size.
    pub cache_capacity: usize,
    /// Maximum number of tags resolved at once when listing.
    pub jobs: usize,
}

impl Config {
    pub const DEFAULT_CACHE_CAPACITY: usize = 4096;
    pub const DEFAULT_JOBS: usize = 8;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            jobs: Self::DEFAULT_JOBS,
        }
    }
}

/// A handle on one repository's tags.
///
/// Each handle owns its own cache, so handles on different repositories never share entries.
/// The cache lives and dies with the handle.
pub struct Repo<S> {
    store: S,
    cache: TagCache,
    commit_times: Cache<Digest, Timestamp>,
    config: Config,
    pool: OnceCell<ThreadPool>,
}

impl<S: ObjectStore> Repo<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: S, config: Config) -> Self {
        trace!(?config, "Opened repo");
        Self {
            store,
            cache: TagCache::new(config.cache_capacity),
            commit_times: Cache::new(config.cache_capacity.max(1)),
            config,
            pool: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cached_tags(&self) -> usize {
        self.cache.len()
    }

    /// The pool listings resolve on, sized by [`Config::jobs`].
    fn pool(&self) -> Result<&ThreadPool> {
        self.pool.get_or_try_init(|| {
            let jobs = self.config.jobs.max(1);
            debug!(jobs, "Starting resolver pool");
            Ok(ThreadPoolBuilder::new()
                .num_threads(jobs)
                .thread_name(|i| format!("rit-tags-{i}"))
                .build()?)
        })
    }
}
