//! # Interaction Routes
//!
//! A named-route message endpoint supporting three interaction shapes:
//!
//! - **request–response**: one inbound message, exactly one outbound
//!   message, then the interaction is over.
//! - **fire-and-forget**: one inbound message, zero outbound messages; the
//!   handler runs as a detached task and the caller gets control back
//!   immediately.
//! - **request–stream**: one inbound message, an ordered finite sequence
//!   of outbound messages, closed by exactly one terminal signal
//!   (completion or error). The receiver grants credit for a bounded
//!   number of items at a time and may cancel mid-stream; see
//!   [`stream`] for the emission state machine.
//!
//! Routes are an explicit map from name to handler, built once at startup.
//! Registering the same name twice panics immediately (the same treatment
//! axum gives conflicting routes); calling a name nobody registered is a
//! client-visible [`ServiceError::Transport`], never a crash.
//!
//! Payloads cross the route boundary as [`serde_json::Value`]; the typed
//! registration helpers do the serde conversion so handlers work with
//! their own domain types.

pub mod stream;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ServiceError, Violation};
pub use stream::{StreamControls, StreamEvent, Subscription};

type BoxFut<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type RequestFn = Arc<dyn Fn(Value) -> BoxFut<Result<Value, ServiceError>> + Send + Sync>;
type FireFn = Arc<dyn Fn(Value) -> BoxFut<()> + Send + Sync>;
type SourceFn = Arc<dyn Fn(Value) -> Result<ItemSource, ServiceError> + Send + Sync>;

/// A finite, ordered source of stream items. An `Err` item terminates the
/// stream with an error signal instead of completion.
pub type ItemSource = Box<dyn Iterator<Item = Result<Value, ServiceError>> + Send>;

enum Route {
    Request(RequestFn),
    Fire(FireFn),
    Stream(SourceFn),
}

impl Route {
    fn shape(&self) -> &'static str {
        match self {
            Route::Request(_) => "request-response",
            Route::Fire(_) => "fire-and-forget",
            Route::Stream(_) => "request-stream",
        }
    }
}

fn malformed_payload(err: serde_json::Error) -> ServiceError {
    ServiceError::Validation(Violation::new("payload", err.to_string()))
}

/// Explicit route table for one interaction endpoint.
pub struct InteractionRouter {
    routes: HashMap<&'static str, Route>,
    delay: Duration,
}

impl InteractionRouter {
    /// Creates an empty router. `delay` is the minimum spacing between
    /// consecutive stream emissions; zero disables pacing.
    pub fn new(delay: Duration) -> Self {
        Self {
            routes: HashMap::new(),
            delay,
        }
    }

    fn insert(&mut self, name: &'static str, route: Route) {
        if self.routes.insert(name, route).is_some() {
            panic!("duplicate interaction route: {name}");
        }
    }

    /// Registers a request–response handler.
    pub fn request_response<Req, Resp, F, Fut>(mut self, name: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, ServiceError>> + Send + 'static,
    {
        let wrapped: RequestFn = Arc::new(move |payload| {
            let call = serde_json::from_value::<Req>(payload).map(&handler);
            Box::pin(async move {
                let resp = call.map_err(malformed_payload)?.await?;
                serde_json::to_value(resp).map_err(ServiceError::internal)
            })
        });
        self.insert(name, Route::Request(wrapped));
        self
    }

    /// Registers a fire-and-forget handler. The handler future is spawned
    /// at call time; a malformed payload is logged and dropped, since
    /// there is no reply path to carry it.
    pub fn fire_and_forget<Req, F, Fut>(mut self, name: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let wrapped: FireFn = Arc::new(move |payload| {
            match serde_json::from_value::<Req>(payload) {
                Ok(req) => Box::pin(handler(req)),
                Err(err) => {
                    warn!(route = name, error = %err, "discarding malformed fire-and-forget payload");
                    Box::pin(async {})
                }
            }
        });
        self.insert(name, Route::Fire(wrapped));
        self
    }

    /// Registers a request–stream handler producing a fixed batch of
    /// items. The emission order is the iteration order of the batch,
    /// deterministic for a given input.
    pub fn request_stream<Req, Resp, F, I>(self, name: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(Req) -> Result<I, ServiceError> + Send + Sync + 'static,
        I: IntoIterator<Item = Resp>,
        I::IntoIter: Send + 'static,
    {
        self.stream_source(name, move |payload| {
            let req = serde_json::from_value::<Req>(payload).map_err(malformed_payload)?;
            let items = handler(req)?.into_iter();
            Ok(Box::new(items.map(|item| serde_json::to_value(item).map_err(ServiceError::internal)))
                as ItemSource)
        })
    }

    /// Registers a request–stream handler from a raw item source. Use this
    /// when items have to be produced lazily or can fail individually.
    pub fn stream_source<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: Fn(Value) -> Result<ItemSource, ServiceError> + Send + Sync + 'static,
    {
        self.insert(name, Route::Stream(Arc::new(handler)));
        self
    }

    /// Registered route names, in no particular order.
    pub fn route_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }

    fn lookup(&self, route: &str, want: &'static str) -> Result<&Route, ServiceError> {
        match self.routes.get(route) {
            None => {
                warn!(route, "unrecognized route");
                Err(ServiceError::Transport(format!("unrecognized route: {route}")))
            }
            Some(found) if found.shape() != want => Err(ServiceError::Transport(format!(
                "route {route} is {}, not {want}",
                found.shape()
            ))),
            Some(found) => Ok(found),
        }
    }

    /// One inbound message, one outbound message.
    pub async fn request(&self, route: &str, payload: Value) -> Result<Value, ServiceError> {
        debug!(route, "request");
        match self.lookup(route, "request-response")? {
            Route::Request(handler) => handler(payload).await,
            _ => unreachable!("lookup checked the shape"),
        }
    }

    /// One inbound message, zero outbound messages. Returns as soon as the
    /// handler task is dispatched; the side effect finishes on its own
    /// time and is not cancellable.
    pub fn fire(&self, route: &str, payload: Value) -> Result<(), ServiceError> {
        debug!(route, "fire-and-forget");
        match self.lookup(route, "fire-and-forget")? {
            Route::Fire(handler) => {
                tokio::spawn(handler(payload));
                Ok(())
            }
            _ => unreachable!("lookup checked the shape"),
        }
    }

    /// One inbound message, a credit-gated sequence of outbound messages.
    ///
    /// Handler failures at subscribe time still produce a subscription;
    /// they arrive as the stream's single terminal [`StreamEvent::Error`],
    /// so every consumer path sees exactly one terminal signal.
    pub fn stream(&self, route: &str, payload: Value) -> Result<Subscription, ServiceError> {
        debug!(route, "stream");
        match self.lookup(route, "request-stream")? {
            Route::Stream(handler) => Ok(stream::spawn(handler(payload), self.delay)),
            _ => unreachable!("lookup checked the shape"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "duplicate interaction route")]
    fn duplicate_route_panics_at_startup() {
        let _ = InteractionRouter::new(Duration::ZERO)
            .request_response("echo", |v: Value| async move { Ok(v) })
            .request_response("echo", |v: Value| async move { Ok(v) });
    }
}
