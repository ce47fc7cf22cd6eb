//! # Read Cache
//!
//! Memoizes single-record reads by id. The service consults the cache on
//! the read path and removes the entry for an id after the store
//! acknowledges an update or delete for it, before the write is
//! acknowledged to the service's own caller.
//!
//! There is no TTL and no eviction pressure; explicit invalidation is the
//! only way an entry leaves the map.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::entity::Resource;
use crate::error::ServiceError;

/// Shared map of cached records for one kind.
pub struct ReadCache<T: Resource> {
    entries: Arc<Mutex<HashMap<T::Id, T>>>,
}

impl<T: Resource> Clone for ReadCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Resource> Default for ReadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> ReadCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached record for `id`, or runs `compute`, fills the
    /// cache with the result and returns it. Failures are not cached.
    ///
    /// The lock is never held across the `compute` await.
    pub async fn get_or_compute<F, Fut>(&self, id: &T::Id, compute: F) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        if let Some(hit) = self.entries.lock().get(id).cloned() {
            debug!(kind = T::KIND, %id, "cache hit");
            return Ok(hit);
        }
        let record = compute().await?;
        self.entries.lock().insert(id.clone(), record.clone());
        debug!(kind = T::KIND, %id, "cache filled");
        Ok(record)
    }

    /// Drops the entry for `id`, if any.
    pub fn invalidate(&self, id: &T::Id) {
        if self.entries.lock().remove(id).is_some() {
            debug!(kind = T::KIND, %id, "cache invalidated");
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;

    #[derive(Clone, Debug, PartialEq)]
    struct Tag {
        id: u64,
        label: String,
    }

    impl Resource for Tag {
        const KIND: &'static str = "tag";
        type Id = u64;
        type Draft = String;

        fn from_draft(id: u64, label: String) -> Self {
            Self { id, label }
        }

        fn id(&self) -> &u64 {
            &self.id
        }

        fn validate_draft(_: &String) -> Result<(), Violation> {
            Ok(())
        }

        fn validate(&self) -> Result<(), Violation> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = ReadCache::<Tag>::new();
        let tag = Tag::from_draft(1, "alpha".into());

        let first = cache
            .get_or_compute(&1, || async { Ok(tag.clone()) })
            .await
            .unwrap();
        assert_eq!(first, tag);

        // The compute closure must not run again.
        let second = cache
            .get_or_compute(&1, || async { panic!("cache miss on a cached id") })
            .await
            .unwrap();
        assert_eq!(second, tag);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let cache = ReadCache::<Tag>::new();
        cache
            .get_or_compute(&1, || async { Ok(Tag::from_draft(1, "old".into())) })
            .await
            .unwrap();

        cache.invalidate(&1);
        assert_eq!(cache.len(), 0);

        let fresh = cache
            .get_or_compute(&1, || async { Ok(Tag::from_draft(1, "new".into())) })
            .await
            .unwrap();
        assert_eq!(fresh.label, "new");
    }

    #[tokio::test]
    async fn failed_compute_is_not_cached() {
        let cache = ReadCache::<Tag>::new();
        let miss = cache
            .get_or_compute(&1, || async { Err(ServiceError::not_found(Tag::KIND, 1u64)) })
            .await;
        assert!(miss.is_err());
        assert_eq!(cache.len(), 0);
    }
}
