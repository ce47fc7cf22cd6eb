//! # Service Errors
//!
//! This module defines the common error types used throughout the crate.
//! By centralizing error definitions, we ensure consistent error handling
//! across the store, the service and both endpoint styles.
//!
//! The taxonomy keeps client faults (`Validation`, `NotFound`) apart from
//! infrastructure faults (`Transport`, `Internal`). Endpoints translate
//! these variants into their own wire shape; internal detail is carried in
//! the error source, not in the user-facing message.

use std::fmt;

/// A single rejected field, produced by per-kind write validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl Violation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Errors that can occur while handling a resource or interaction call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input. Raised at the service boundary,
    /// before the store is contacted; names the offending field.
    #[error("invalid field {}: {}", .0.field, .0.reason)]
    Validation(Violation),

    /// The call referenced an id that is not in the store.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Channel or connection failure, including calls to a route nobody
    /// registered. Always surfaced to the caller.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Unexpected failure inside a handler or the store. The display form
    /// is deliberately opaque; the detail lives in the source chain and
    /// belongs in the server log only.
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ServiceError::Internal(err.into())
    }
}

impl From<Violation> for ServiceError {
    fn from(violation: Violation) -> Self {
        ServiceError::Validation(violation)
    }
}
