//! # Stream Emission
//!
//! The request–stream state machine. One spawned task owns the emission
//! loop for a subscription; credit grants and cancellation arrive as
//! messages on a control channel, so the whole interaction is ordinary
//! message passing with no shared state.
//!
//! The sender never emits more items than the receiver has granted credit
//! for, consecutive emissions are separated by the router's configured
//! minimum delay, and cancellation stops emission within one scheduling
//! turn. Every subscription ends with exactly one terminal event:
//! [`StreamEvent::Complete`] or [`StreamEvent::Error`], never both.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::ItemSource;
use crate::error::ServiceError;

/// An event observed by the receiver of a request–stream interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The next item, in handler order.
    Item(Value),
    /// Natural end of the sequence, or acknowledgement of a cancel.
    Complete,
    /// The handler failed mid-stream. Terminal, distinct from `Complete`.
    Error(String),
}

#[derive(Debug)]
enum Control {
    Request(u32),
    Cancel,
}

/// Receiver side of one request–stream interaction.
pub struct Subscription {
    events: mpsc::Receiver<StreamEvent>,
    control: mpsc::Sender<Control>,
}

impl Subscription {
    /// The next event. `None` only if the emitter vanished without a
    /// terminal event, which a consumer should treat as the end.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Grants the sender credit for `n` further items.
    pub async fn request(&self, n: u32) {
        let _ = self.control.send(Control::Request(n)).await;
    }

    /// Stops emission. Already-delivered items stay delivered; no further
    /// item will arrive, and the stream closes with a single `Complete`.
    pub async fn cancel(&self) {
        let _ = self.control.send(Control::Cancel).await;
    }

    /// A cloneable handle carrying just the control half, for callers that
    /// feed credit from a different task than the one consuming events.
    pub fn controls(&self) -> StreamControls {
        StreamControls {
            control: self.control.clone(),
        }
    }
}

/// Control half of a [`Subscription`].
#[derive(Clone)]
pub struct StreamControls {
    control: mpsc::Sender<Control>,
}

impl StreamControls {
    pub async fn request(&self, n: u32) {
        let _ = self.control.send(Control::Request(n)).await;
    }

    pub async fn cancel(&self) {
        let _ = self.control.send(Control::Cancel).await;
    }
}

/// Spawns the emission task for one subscription.
///
/// A handler failure at subscribe time is delivered as the stream's
/// terminal `Error` event rather than a call-site `Err`, keeping the
/// "zero or more items, then one terminal signal" shape on every path.
pub(crate) fn spawn(source: Result<ItemSource, ServiceError>, delay: Duration) -> Subscription {
    let (event_tx, event_rx) = mpsc::channel(8);
    let (control_tx, control_rx) = mpsc::channel(8);
    tokio::spawn(emit(source, delay, event_tx, control_rx));
    Subscription {
        events: event_rx,
        control: control_tx,
    }
}

async fn emit(
    source: Result<ItemSource, ServiceError>,
    delay: Duration,
    events: mpsc::Sender<StreamEvent>,
    mut control: mpsc::Receiver<Control>,
) {
    let mut source = match source {
        Ok(source) => source,
        Err(err) => {
            warn!(error = %err, "stream handler failed at subscribe");
            let _ = events.send(StreamEvent::Error(err.to_string())).await;
            return;
        }
    };

    let mut credit: u64 = 0;
    let mut emitted: u64 = 0;
    loop {
        // Pull the next item first: exhaustion and handler errors are
        // terminal signals and do not wait for credit.
        let item = match source.next() {
            None => {
                debug!(emitted, "stream complete");
                let _ = events.send(StreamEvent::Complete).await;
                return;
            }
            Some(Err(err)) => {
                warn!(emitted, error = %err, "stream handler failed mid-stream");
                let _ = events.send(StreamEvent::Error(err.to_string())).await;
                return;
            }
            Some(Ok(item)) => item,
        };

        // Gate on receiver credit.
        while credit == 0 {
            match control.recv().await {
                Some(Control::Request(n)) => credit += u64::from(n),
                Some(Control::Cancel) | None => {
                    debug!(emitted, "stream cancelled");
                    let _ = events.send(StreamEvent::Complete).await;
                    return;
                }
            }
        }

        // Minimum spacing between emissions. Cancellation cuts the wait
        // short; credit arriving during the wait accumulates.
        if !delay.is_zero() {
            let pause = tokio::time::sleep(delay);
            tokio::pin!(pause);
            loop {
                tokio::select! {
                    _ = &mut pause => break,
                    ctl = control.recv() => match ctl {
                        Some(Control::Request(n)) => credit += u64::from(n),
                        Some(Control::Cancel) | None => {
                            debug!(emitted, "stream cancelled");
                            let _ = events.send(StreamEvent::Complete).await;
                            return;
                        }
                    },
                }
            }
        }

        credit -= 1;
        emitted += 1;
        if events.send(StreamEvent::Item(item)).await.is_err() {
            // Receiver dropped the subscription: nothing left to notify.
            return;
        }
    }
}
