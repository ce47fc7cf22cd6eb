//! # Resource Core
//!
//! Building blocks for a small resource service: an actor-backed record
//! store, a validating service facade, an optional read cache, and a
//! named-route interaction endpoint with request–response, fire-and-forget
//! and credit-gated request–stream shapes.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Record contract** ([`Resource`]) - the id, field set and validation
//!    rules of one record kind.
//! 2. **Storage** ([`StoreActor`] / [`StoreClient`] / [`Store`]) - one task
//!    owns the records of a kind and processes requests sequentially, so
//!    every operation is atomic at single-record granularity without locks.
//! 3. **Service** ([`ResourceService`]) - validation plus delegation, the
//!    single path every endpoint goes through. Writes never reach the
//!    store with invalid fields; reads can be memoized by the
//!    [`ReadCache`], which is invalidated before a write is acknowledged.
//!
//! The [`interaction`] module adds the asynchronous endpoint: an explicit
//! route table dispatching the three interaction shapes, with credit-based
//! flow control and cancellation for streams.
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_core::{Resource, ResourceService, StoreActor, Violation};
//!
//! #[derive(Clone, Debug)]
//! struct Note {
//!     id: u64,
//!     text: String,
//! }
//!
//! impl Resource for Note {
//!     const KIND: &'static str = "note";
//!     type Id = u64;
//!     type Draft = String;
//!
//!     fn from_draft(id: u64, text: String) -> Self {
//!         Self { id, text }
//!     }
//!     fn id(&self) -> &u64 {
//!         &self.id
//!     }
//!     fn validate_draft(draft: &String) -> Result<(), Violation> {
//!         if draft.is_empty() {
//!             return Err(Violation::new("text", "must not be empty"));
//!         }
//!         Ok(())
//!     }
//!     fn validate(&self) -> Result<(), Violation> {
//!         Self::validate_draft(&self.text)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Create the store actor and its client handle.
//!     let (actor, store) = StoreActor::<Note>::new(8);
//!     tokio::spawn(actor.run());
//!
//!     // 2. Wrap it in the validating service.
//!     let service = ResourceService::new(store);
//!
//!     // 3. Use it.
//!     let note = service.create("hello".to_string()).await.unwrap();
//!     let read = service.read(*note.id()).await.unwrap();
//!     assert_eq!(read.text, "hello");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store actor runs in its own Tokio task and processes messages
//!   sequentially; writes to the same kind are serialized by the channel.
//! - The service and the interaction router are stateless and safely
//!   shared across concurrent calls.
//! - A request–stream is the only multi-turn operation: its emission task
//!   suspends on credit exhaustion and on the configured delay, and reacts
//!   to cancellation within one scheduling turn.
//!
//! ## Testing
//!
//! The [`mock`] module provides a scriptable [`MockStore`](mock::MockStore)
//! implementing the same [`Store`] trait as the real client, for testing
//! service-level logic without spawning an actor.

pub mod cache;
pub mod client;
pub mod entity;
pub mod error;
pub mod interaction;
pub mod message;
pub mod mock;
pub mod service;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use cache::ReadCache;
pub use client::StoreClient;
pub use entity::Resource;
pub use error::{ServiceError, Violation};
pub use interaction::{InteractionRouter, ItemSource, StreamControls, StreamEvent, Subscription};
pub use message::{Reply, StoreRequest};
pub use service::ResourceService;
pub use store::{Store, StoreActor};
pub use crate::tracing::setup_tracing;
