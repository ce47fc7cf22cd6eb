//! # Mock Store
//!
//! A scriptable [`Store`] implementation for unit tests. Instead of
//! spawning a real [`StoreActor`](crate::store::StoreActor), a test queues
//! up the responses it expects the store to give, runs the code under
//! test, and then verifies that every expectation was consumed.
//!
//! This makes failure injection trivial: returning a transport error from
//! `get` takes one line, where a real actor would have to be killed at
//! just the right moment.
//!
//! ```ignore
//! let mock = MockStore::<Product>::new();
//! mock.expect_get(ProductId(1)).return_ok(product);
//! let service = ResourceService::new(mock.clone());
//! // ... drive the service ...
//! mock.verify();
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::entity::Resource;
use crate::error::ServiceError;
use crate::store::Store;

#[derive(Debug)]
enum Expectation<T: Resource> {
    Get {
        id: T::Id,
        response: Result<T, ServiceError>,
    },
    List {
        response: Result<Vec<T>, ServiceError>,
    },
    Insert {
        response: Result<T, ServiceError>,
    },
    Replace {
        response: Result<T, ServiceError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), ServiceError>,
    },
}

impl<T: Resource> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get { .. } => "get",
            Expectation::List { .. } => "list",
            Expectation::Insert { .. } => "insert",
            Expectation::Replace { .. } => "replace",
            Expectation::Delete { .. } => "delete",
        }
    }
}

/// A `Store` whose responses are scripted ahead of time.
///
/// Cloning shares the expectation queue, so a clone can be handed to the
/// code under test while the original verifies afterwards.
pub struct MockStore<T: Resource> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: Resource> Clone for MockStore<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: Arc::clone(&self.expectations),
        }
    }
}

impl<T: Resource> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockStore<T> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    fn push(&self, expectation: Expectation<T>) {
        self.expectations.lock().push_back(expectation);
    }

    fn pop(&self, operation: &'static str) -> Expectation<T> {
        match self.expectations.lock().pop_front() {
            Some(expectation) => expectation,
            None => panic!("unexpected {operation} call: no expectations left"),
        }
    }

    /// Expects a `get` for `id`.
    pub fn expect_get(&self, id: T::Id) -> ResponseBuilder<'_, T, T> {
        ResponseBuilder {
            mock: self,
            build: Box::new(move |response| Expectation::Get { id, response }),
        }
    }

    /// Expects a `list`.
    pub fn expect_list(&self) -> ResponseBuilder<'_, T, Vec<T>> {
        ResponseBuilder {
            mock: self,
            build: Box::new(|response| Expectation::List { response }),
        }
    }

    /// Expects an `insert`.
    pub fn expect_insert(&self) -> ResponseBuilder<'_, T, T> {
        ResponseBuilder {
            mock: self,
            build: Box::new(|response| Expectation::Insert { response }),
        }
    }

    /// Expects a `replace`.
    pub fn expect_replace(&self) -> ResponseBuilder<'_, T, T> {
        ResponseBuilder {
            mock: self,
            build: Box::new(|response| Expectation::Replace { response }),
        }
    }

    /// Expects a `delete` for `id`.
    pub fn expect_delete(&self, id: T::Id) -> ResponseBuilder<'_, T, ()> {
        ResponseBuilder {
            mock: self,
            build: Box::new(move |response| Expectation::Delete { id, response }),
        }
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().len();
        if remaining > 0 {
            panic!("not all expectations were met, {remaining} remaining");
        }
    }
}

/// Finishes one expectation with its scripted response.
pub struct ResponseBuilder<'a, T: Resource, R> {
    mock: &'a MockStore<T>,
    build: Box<dyn FnOnce(Result<R, ServiceError>) -> Expectation<T> + Send>,
}

impl<T: Resource, R> ResponseBuilder<'_, T, R> {
    pub fn return_ok(self, value: R) {
        self.mock.push((self.build)(Ok(value)));
    }

    pub fn return_err(self, error: ServiceError) {
        self.mock.push((self.build)(Err(error)));
    }
}

#[async_trait]
impl<T: Resource> Store<T> for MockStore<T> {
    async fn get(&self, id: T::Id) -> Result<T, ServiceError> {
        match self.pop("get") {
            Expectation::Get {
                id: expected,
                response,
            } => {
                assert_eq!(expected, id, "get called with an unexpected id");
                response
            }
            other => panic!("expected {} call, got get", other.name()),
        }
    }

    async fn list(&self) -> Result<Vec<T>, ServiceError> {
        match self.pop("list") {
            Expectation::List { response } => response,
            other => panic!("expected {} call, got list", other.name()),
        }
    }

    async fn insert(&self, _draft: T::Draft) -> Result<T, ServiceError> {
        match self.pop("insert") {
            Expectation::Insert { response } => response,
            other => panic!("expected {} call, got insert", other.name()),
        }
    }

    async fn replace(&self, _record: T) -> Result<T, ServiceError> {
        match self.pop("replace") {
            Expectation::Replace { response } => response,
            other => panic!("expected {} call, got replace", other.name()),
        }
    }

    async fn delete(&self, id: T::Id) -> Result<(), ServiceError> {
        match self.pop("delete") {
            Expectation::Delete {
                id: expected,
                response,
            } => {
                assert_eq!(expected, id, "delete called with an unexpected id");
                response
            }
            other => panic!("expected {} call, got delete", other.name()),
        }
    }
}
