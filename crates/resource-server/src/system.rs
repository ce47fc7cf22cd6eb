//! System wiring and lifecycle.
//!
//! The conductor for the whole server: creates the store actor and its
//! client, wraps the client in the validating service (with the read cache
//! when configured), builds the interaction route table, and coordinates a
//! clean shutdown.
//!
//! Shutdown follows the channel-closure pattern: dropping every client
//! handle closes the store's request channel, the actor drains what is
//! left and exits, and `shutdown` waits for that to finish. No message
//! that was accepted is lost.

use std::sync::Arc;
use std::time::Duration;

use resource_core::{InteractionRouter, ResourceService, StoreActor, StoreClient};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::interaction::clinic_routes;
use crate::model::Product;

/// Errors detected while assembling the system, before anything serves.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unsupported store url `{0}`: only the mem: scheme is wired")]
    UnsupportedStore(String),
}

/// The assembled server: product service, interaction routes, and the
/// store actor task behind them.
pub struct System {
    pub service: Arc<ResourceService<Product, StoreClient<Product>>>,
    pub interactions: Arc<InteractionRouter>,
    store_handle: JoinHandle<()>,
}

impl System {
    /// Builds the system from configuration and spawns the store actor.
    pub fn new(config: &ServerConfig) -> Result<Self, StartupError> {
        if !config.store_url.starts_with("mem:") {
            return Err(StartupError::UnsupportedStore(config.store_url.clone()));
        }

        let (actor, store) = StoreActor::<Product>::new(32);
        let store_handle = tokio::spawn(actor.run());

        let mut service = ResourceService::new(store);
        if config.cache_enabled {
            service = service.with_read_cache();
        }

        let interactions = Arc::new(clinic_routes(Duration::from_millis(config.stream_delay_ms)));
        info!(cache = config.cache_enabled, "system assembled");

        Ok(Self {
            service: Arc::new(service),
            interactions,
            store_handle,
        })
    }

    /// Drops the client handles and waits for the store actor to drain.
    ///
    /// Callers that cloned `service` must drop their clones first, or the
    /// store's channel stays open and this never returns.
    pub async fn shutdown(self) {
        info!("shutting down");
        let Self {
            service,
            interactions,
            store_handle,
        } = self;
        drop(interactions);
        drop(service);
        let _ = store_handle.await;
    }
}
