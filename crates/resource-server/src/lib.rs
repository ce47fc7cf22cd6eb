//! # Resource Server
//!
//! A product catalog with two faces:
//!
//! - **[http]** - a synchronous REST endpoint (`/products/`) for create,
//!   read, update, delete and list, backed by the validating product
//!   service and an optional read cache.
//! - **[wire]** - a newline-delimited-JSON TCP channel carrying the
//!   clinic [interaction] routes: request–response patient data,
//!   fire-and-forget checkout, and credit-gated claim and vaccine
//!   streams.
//!
//! [system] wires both faces to one actor-backed store and manages
//! startup and shutdown; [config] collects every knob from flags or the
//! environment.

pub mod config;
pub mod http;
pub mod interaction;
pub mod model;
pub mod system;
pub mod wire;
