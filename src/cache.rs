//! Bounded decode cache keyed by source path.
//!
//! Collaborators that re-open the same files (preview panes, pickers,
//! animation restarts) own a [`DecodeCache`] instance and route their
//! reads through it. Nothing here is process-global: the caller decides
//! the capacity, holds the cache, and can drop or [`clear`] it at any
//! time. Eviction is least-recently-used.
//!
//! Entries are `Arc<Design>`, so a hit shares the one decoded aggregate
//! instead of cloning the record sequence.
//!
//! [`clear`]: DecodeCache::clear

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::design::{self, DecodeError, Design};

/// Capacity used by [`DecodeCache::default`].
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct DecodeCache {
    capacity: usize,
    entries: HashMap<PathBuf, Arc<Design>>,
    /// Paths from least to most recently used.
    recency: Vec<PathBuf>,
}

impl DecodeCache {
    /// A cache holding at most `capacity` decoded designs. A capacity of
    /// zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: Vec::new(),
        }
    }

    /// Decode `path` through the cache: return the cached aggregate on a
    /// hit, otherwise read, decode, insert, and evict the least-recently
    /// used entry if the cache is full.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Design>, DecodeError> {
        let path = path.as_ref();
        if let Some(design) = self.entries.get(path) {
            log::debug!("decode cache hit for {}", path.display());
            let design = Arc::clone(design);
            self.touch(path);
            return Ok(design);
        }

        let design = Arc::new(design::read_file(path)?);
        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(path.to_owned(), Arc::clone(&design));
        self.recency.push(path.to_owned());
        Ok(design)
    }

    /// Cached aggregate for `path`, refreshing its recency. Never decodes.
    pub fn get<P: AsRef<Path>>(&mut self, path: P) -> Option<Arc<Design>> {
        let path = path.as_ref();
        let design = Arc::clone(self.entries.get(path)?);
        self.touch(path);
        Some(design)
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every cached design.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Cached paths, least recently used first. Diagnostics only.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.recency.iter().map(PathBuf::as_path)
    }

    fn touch(&mut self, path: &Path) {
        if let Some(pos) = self.recency.iter().position(|p| p == path) {
            let p = self.recency.remove(pos);
            self.recency.push(p);
        }
    }

    fn evict_lru(&mut self) {
        if self.recency.is_empty() {
            return;
        }
        let lru = self.recency.remove(0);
        log::debug!("decode cache evicting {}", lru.display());
        self.entries.remove(&lru);
    }
}

impl Default for DecodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
