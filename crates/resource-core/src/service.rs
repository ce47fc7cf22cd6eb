//! # Resource Service
//!
//! Validation and delegation layer between the endpoints and the store.
//! Both the synchronous HTTP endpoint and the streaming interaction routes
//! go through this type; neither talks to a [`Store`] directly.
//!
//! The service is stateless apart from the optional read cache. Validation
//! runs before any store call, so a draft or record that fails its field
//! checks never crosses the channel into the actor.

use tracing::{debug, instrument};

use crate::cache::ReadCache;
use crate::entity::Resource;
use crate::error::ServiceError;
use crate::store::Store;

/// Validating facade over a [`Store`].
///
/// The store is a constructor-supplied capability object: any `S: Store<T>`
/// works, which is what lets the tests swap in a scripted mock.
pub struct ResourceService<T: Resource, S> {
    store: S,
    cache: Option<ReadCache<T>>,
}

impl<T: Resource, S: Store<T>> ResourceService<T, S> {
    pub fn new(store: S) -> Self {
        Self { store, cache: None }
    }

    /// Enables the read cache for this service.
    pub fn with_read_cache(mut self) -> Self {
        self.cache = Some(ReadCache::new());
        self
    }

    /// Validates the draft and stores a new record. The store assigns the
    /// id; anything the client thinks it knows about ids is not consulted.
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn create(&self, draft: T::Draft) -> Result<T, ServiceError> {
        T::validate_draft(&draft)?;
        debug!("creating record");
        self.store.insert(draft).await
    }

    /// Fetches a record by id, through the cache when one is configured.
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn read(&self, id: T::Id) -> Result<T, ServiceError> {
        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_compute(&id, || self.store.get(id.clone()))
                    .await
            }
            None => self.store.get(id).await,
        }
    }

    /// Full-record replace of an existing id. Validation failures never
    /// reach the store; an unknown id is a `NotFound`, not an insert.
    ///
    /// The cache entry for the id is dropped after the store acknowledges
    /// the write and before this method returns, so no caller can observe
    /// a cache hit that predates an acknowledged update.
    #[instrument(skip(self, record), fields(kind = T::KIND, id = %record.id()))]
    pub async fn update(&self, record: T) -> Result<T, ServiceError> {
        record.validate()?;
        let stored = self.store.replace(record).await?;
        if let Some(cache) = &self.cache {
            cache.invalidate(stored.id());
        }
        Ok(stored)
    }

    /// Removes a record by id, with the same invalidate-before-ack
    /// discipline as [`update`](Self::update).
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn delete(&self, id: T::Id) -> Result<(), ServiceError> {
        self.store.delete(id.clone()).await?;
        if let Some(cache) = &self.cache {
            cache.invalidate(&id);
        }
        Ok(())
    }

    /// All records in storage order.
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        self.store.list().await
    }
}
