//! Payload types for the clinic interaction routes. These are ephemeral
//! per call; nothing here is ever persisted.

use serde::{Deserialize, Serialize};

/// The subject of a clinical query or checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
}

/// Vitals returned for a patient data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalData {
    pub heart_rate: u32,
    pub blood_pressure: String,
}

/// One billable line item on the claim stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub amount: f64,
    pub name: String,
}

impl Claim {
    pub fn new(amount: f64, name: impl Into<String>) -> Self {
        Self {
            amount,
            name: name.into(),
        }
    }
}

/// A delivered vaccine on the vaccine stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccine {
    pub name: String,
    pub delivered: bool,
}

impl Vaccine {
    pub fn delivered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delivered: true,
        }
    }
}
