//! # Store Client
//!
//! This module defines the cloneable handle for talking to a
//! [`StoreActor`](crate::store::StoreActor). It forwards requests over the
//! actor's mpsc channel and receives results on oneshot reply channels.
//! The client is cheap to clone and safe to share across tasks.
//!
//! A closed request channel or a dropped reply surfaces as
//! [`ServiceError::Transport`]; neither is ever swallowed.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::entity::Resource;
use crate::error::ServiceError;
use crate::message::StoreRequest;
use crate::store::Store;

/// A type-safe handle for a `StoreActor`.
#[derive(Clone)]
pub struct StoreClient<T: Resource> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Resource> StoreClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn roundtrip<R>(
        &self,
        request: StoreRequest<T>,
        reply: oneshot::Receiver<Result<R, ServiceError>>,
    ) -> Result<R, ServiceError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| ServiceError::Transport(format!("{} store closed", T::KIND)))?;
        reply
            .await
            .map_err(|_| ServiceError::Transport(format!("{} store dropped the reply", T::KIND)))?
    }
}

#[async_trait]
impl<T: Resource> Store<T> for StoreClient<T> {
    async fn get(&self, id: T::Id) -> Result<T, ServiceError> {
        let (respond_to, reply) = oneshot::channel();
        self.roundtrip(StoreRequest::Get { id, respond_to }, reply).await
    }

    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        let (respond_to, reply) = oneshot::channel();
        self.roundtrip(StoreRequest::List { respond_to }, reply).await
    }

    async fn insert(&self, draft: T::Draft) -> Result<T, ServiceError> {
        let (respond_to, reply) = oneshot::channel();
        self.roundtrip(StoreRequest::Insert { draft, respond_to }, reply)
            .await
    }

    async fn replace(&self, record: T) -> Result<T, ServiceError> {
        let (respond_to, reply) = oneshot::channel();
        self.roundtrip(StoreRequest::Replace { record, respond_to }, reply)
            .await
    }

    async fn delete(&self, id: T::Id) -> Result<(), ServiceError> {
        let (respond_to, reply) = oneshot::channel();
        self.roundtrip(StoreRequest::Delete { id, respond_to }, reply)
            .await
    }
}
