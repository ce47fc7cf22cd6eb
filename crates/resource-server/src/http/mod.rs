//! The synchronous REST endpoint.
//!
//! One router, one shared state. Handlers are generic over the storage
//! seam `S`, so the same routes serve the actor-backed store in production
//! and a scripted mock in tests.

pub mod error;
pub mod products;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use resource_core::{ResourceService, Store};

use crate::model::Product;

/// Shared state for the REST handlers: the product service.
pub struct AppState<S> {
    service: Arc<ResourceService<Product, S>>,
}

// Manual Clone: S itself does not need to be Clone behind the Arc.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: Store<Product>> AppState<S> {
    pub fn new(service: Arc<ResourceService<Product, S>>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ResourceService<Product, S> {
        &self.service
    }
}

/// Builds the product catalog routes.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: Store<Product> + 'static,
{
    Router::new()
        .route(
            "/products/",
            get(products::list::<S>)
                .post(products::create::<S>)
                .put(products::update::<S>),
        )
        .route(
            "/products/{id}",
            get(products::read::<S>).delete(products::remove::<S>),
        )
        .with_state(state)
}
