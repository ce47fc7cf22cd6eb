//! # Store Actor
//!
//! This module defines the `Store` capability trait and the `StoreActor`,
//! the component that owns the records of one kind. It is the "server"
//! half of the store: it holds the map and the id counter, and processes
//! messages sequentially, ensuring exclusive access to the stored bytes.
//!
//! **Concurrency model**: the actor processes one message at a time in its
//! own task, so no `Mutex` or `RwLock` is needed for the record map, and
//! every operation is atomic at single-record granularity. Once a write is
//! acknowledged it is visible to every subsequent `Get`/`List`, from any
//! caller.
//!
//! Records live in a `BTreeMap` keyed by their id. Ids are assigned from a
//! monotonically increasing counter, so map order is insertion order and
//! `List` returns a stable, restartable snapshot.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::StoreClient;
use crate::entity::Resource;
use crate::error::ServiceError;
use crate::message::StoreRequest;

/// Capability object for record storage of one kind.
///
/// The service receives an implementation of this trait through its
/// constructor; nothing is looked up globally. The production
/// implementation is [`StoreClient`], backed by a [`StoreActor`] task; the
/// [`mock`](crate::mock) module provides a scriptable one for tests.
#[async_trait]
pub trait Store<T: Resource>: Send + Sync {
    /// Fetch a record by id.
    async fn get(&self, id: T::Id) -> Result<T, ServiceError>;

    /// All records, in storage (insertion) order. Finite snapshot,
    /// restartable per call.
    async fn list(&self) -> Result<Vec<T>, ServiceError>;

    /// Store a new record; the store assigns the id.
    async fn insert(&self, draft: T::Draft) -> Result<T, ServiceError>;

    /// Overwrite the record with the same id. Fails with `NotFound` when
    /// the id is absent; never an upsert.
    async fn replace(&self, record: T) -> Result<T, ServiceError>;

    /// Remove a record by id. Deleting an absent id is a `NotFound`, never
    /// a silent success.
    async fn delete(&self, id: T::Id) -> Result<(), ServiceError>;
}

/// The actor that owns the records of one kind.
pub struct StoreActor<T: Resource> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<T::Id, T>,
    next_id: u64,
}

impl<T: Resource> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait
    /// when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the store loop, processing requests until every client handle
    /// has been dropped.
    pub async fn run(mut self) {
        info!(kind = T::KIND, "store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { draft, respond_to } => {
                    debug!(kind = T::KIND, ?draft, "insert");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;
                    let record = T::from_draft(id.clone(), draft);
                    self.records.insert(id.clone(), record.clone());
                    info!(kind = T::KIND, %id, size = self.records.len(), "inserted");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Get { id, respond_to } => {
                    let found = self.records.get(&id).cloned();
                    debug!(kind = T::KIND, %id, found = found.is_some(), "get");
                    let _ = respond_to
                        .send(found.ok_or_else(|| ServiceError::not_found(T::KIND, &id)));
                }
                StoreRequest::List { respond_to } => {
                    debug!(kind = T::KIND, size = self.records.len(), "list");
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
                StoreRequest::Replace { record, respond_to } => {
                    let id = record.id().clone();
                    debug!(kind = T::KIND, %id, "replace");
                    if let Some(slot) = self.records.get_mut(&id) {
                        *slot = record.clone();
                        info!(kind = T::KIND, %id, "replaced");
                        let _ = respond_to.send(Ok(record));
                    } else {
                        warn!(kind = T::KIND, %id, "not found");
                        let _ = respond_to.send(Err(ServiceError::not_found(T::KIND, &id)));
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(kind = T::KIND, %id, "delete");
                    if self.records.remove(&id).is_some() {
                        info!(kind = T::KIND, %id, size = self.records.len(), "deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(kind = T::KIND, %id, "not found");
                        let _ = respond_to.send(Err(ServiceError::not_found(T::KIND, &id)));
                    }
                }
            }
        }

        info!(kind = T::KIND, size = self.records.len(), "store shutdown");
    }
}
