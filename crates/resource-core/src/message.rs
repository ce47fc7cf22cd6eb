//! # Store Messages
//!
//! This module defines the message types exchanged between a
//! [`StoreClient`](crate::client::StoreClient) and its
//! [`StoreActor`](crate::store::StoreActor).
//!
//! The variants map onto the record lifecycle: `Insert` starts it (the
//! actor assigns the id), `Get`/`List` read it, `Replace` is a full-record
//! overwrite of an existing id, and `Delete` ends it. There is no partial
//! update and no upsert: replacing an id the store has never seen is a
//! `NotFound`, not a silent insert.

use tokio::sync::oneshot;

use crate::entity::Resource;
use crate::error::ServiceError;

/// Type alias for the one-shot reply channel used by the store actor.
pub type Reply<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Internal request type sent to the store actor.
#[derive(Debug)]
pub enum StoreRequest<T: Resource> {
    Insert {
        draft: T::Draft,
        respond_to: Reply<T>,
    },
    Get {
        id: T::Id,
        respond_to: Reply<T>,
    },
    List {
        respond_to: Reply<Vec<T>>,
    },
    Replace {
        record: T,
        respond_to: Reply<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Reply<()>,
    },
}
