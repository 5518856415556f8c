//! Read-through cache for single-project reads.
//!
//! Only `GET /projects/{id}` reads from here. Listings prime it, and every
//! mutation invalidates the affected id after the write. Mutating handlers
//! never read from the cache; they always authorize against a row loaded
//! from the store in the same request.
//!
//! An invalidated id keeps a version floor until the TTL runs out. A read
//! that loaded the row before the write finishes after it, and its older
//! copy is refused instead of being cached.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use shootbook_core::types::DbId;
use shootbook_db::models::project::ProjectWithOwner;
use tokio::sync::RwLock;

enum Slot {
    Cached(ProjectWithOwner),
    /// Only versions at or above `min_version` may be cached again.
    Invalidated { min_version: i32 },
}

struct Entry {
    stored_at: Instant,
    slot: Slot,
}

impl Entry {
    fn min_version(&self) -> i32 {
        match &self.slot {
            Slot::Cached(value) => value.project.version,
            Slot::Invalidated { min_version } => *min_version,
        }
    }
}

/// TTL-bounded map of project id to the last loaded project-with-owner.
pub struct ProjectCache {
    ttl: Duration,
    entries: RwLock<HashMap<DbId, Entry>>,
}

impl ProjectCache {
    /// A zero `ttl` disables caching: every lookup misses.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    /// Return a fresh entry for `id`, if any. An expired entry is evicted.
    pub async fn get(&self, id: DbId) -> Option<ProjectWithOwner> {
        if !self.enabled() {
            return None;
        }
        {
            let entries = self.entries.read().await;
            match entries.get(&id) {
                None => return None,
                Some(entry) if self.is_fresh(entry) => {
                    return match &entry.slot {
                        Slot::Cached(value) => Some(value.clone()),
                        Slot::Invalidated { .. } => None,
                    };
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(&id).is_some_and(|e| !self.is_fresh(e)) {
            entries.remove(&id);
        }
        None
    }

    pub async fn insert(&self, value: ProjectWithOwner) {
        if !self.enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        self.store(&mut entries, value, Instant::now());
    }

    /// Store every row of a listing. Expired entries are swept while the
    /// write lock is held.
    pub async fn prime_many(&self, values: &[ProjectWithOwner]) {
        if !self.enabled() {
            return;
        }
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        for value in values {
            self.store(&mut entries, value.clone(), now);
        }
    }

    fn store(&self, entries: &mut HashMap<DbId, Entry>, value: ProjectWithOwner, now: Instant) {
        let id = value.project.id;
        if let Some(existing) = entries.get(&id) {
            if self.is_fresh(existing) && existing.min_version() > value.project.version {
                tracing::debug!(
                    project_id = id,
                    version = value.project.version,
                    "Refusing to cache an older project version"
                );
                return;
            }
        }
        entries.insert(
            id,
            Entry {
                stored_at: now,
                slot: Slot::Cached(value),
            },
        );
    }

    /// Drop the cached copy of `id` after a write that produced `version`.
    pub async fn invalidate(&self, id: DbId, version: i32) {
        self.mark(id, version).await;
    }

    /// Drop `id` for good; nothing read before the delete is cached again.
    pub async fn remove(&self, id: DbId) {
        self.mark(id, i32::MAX).await;
    }

    async fn mark(&self, id: DbId, min_version: i32) {
        if !self.enabled() {
            return;
        }
        self.entries.write().await.insert(
            id,
            Entry {
                stored_at: Instant::now(),
                slot: Slot::Invalidated { min_version },
            },
        );
    }

    /// Number of cached projects, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| matches!(e.slot, Slot::Cached(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of slots held, including version floors. Used by tests to
    /// observe eviction.
    #[cfg(test)]
    async fn slots(&self) -> usize {
        self.entries.read().await.len()
    }
}
