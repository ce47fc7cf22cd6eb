//! Domain types: the persisted catalog record and the ephemeral clinic
//! interaction payloads.

pub mod clinic;
pub mod product;

pub use clinic::{Claim, ClinicalData, Patient, Vaccine};
pub use product::{Product, ProductDraft, ProductId};
