//! # Resource Trait
//!
//! The `Resource` trait defines the contract that every stored record kind
//! must implement to be managed by the generic [`StoreActor`](crate::store::StoreActor)
//! and [`ResourceService`](crate::service::ResourceService). It specifies the
//! id and draft types for a kind and the validation rules applied on every
//! write.
//!
//! # Architecture Note
//! By defining one contract that all record kinds satisfy, the store loop
//! and the service logic are written once and reused for any kind. The
//! associated types enforce type safety: a draft for one kind cannot be
//! inserted into another kind's store.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::Violation;

/// Contract for a record kind managed by the store and the service.
///
/// A record is the unit of storage: an id plus a fixed set of named fields.
/// The draft is the same field set without the id; the store assigns the id
/// on insert, and it never changes afterwards.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Lowercase kind name, used in log fields, error messages and the
    /// HTTP path segment (e.g. `"product"`).
    const KIND: &'static str;

    /// The unique identifier for this kind. Must be constructible from the
    /// store's `u64` counter so ids can be assigned automatically.
    type Id: Ord + Hash + Clone + Send + Sync + Display + Debug + From<u64> + 'static;

    /// The full field set of a record, minus the id (the create payload).
    type Draft: Send + Sync + Debug + 'static;

    /// Construct the record from a freshly assigned id and a draft.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;

    /// Per-kind validation of a create payload. A draft that fails here
    /// never reaches the store.
    fn validate_draft(draft: &Self::Draft) -> Result<(), Violation>;

    /// The same field checks applied to a full record (the update path).
    fn validate(&self) -> Result<(), Violation>;
}
