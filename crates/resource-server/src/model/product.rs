//! The Product record: the catalog entry managed by the store and exposed
//! over the REST endpoint.
//!
//! The id is a newtype so a product id cannot be confused with any other
//! number in the system; the store assigns it on insert.

use std::fmt;

use resource_core::{Resource, Violation};
use serde::{Deserialize, Serialize};

/// Type-safe identifier for products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

/// The field set of a product without its id; what a create carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

fn check_fields(name: &str, price: f64) -> Result<(), Violation> {
    if name.trim().is_empty() {
        return Err(Violation::new("name", "must not be empty"));
    }
    if !price.is_finite() {
        return Err(Violation::new("price", "must be a finite number"));
    }
    if price < 0.0 {
        return Err(Violation::new("price", "must not be negative"));
    }
    Ok(())
}

impl Resource for Product {
    const KIND: &'static str = "product";
    type Id = ProductId;
    type Draft = ProductDraft;

    fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
        }
    }

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn validate_draft(draft: &ProductDraft) -> Result<(), Violation> {
        check_fields(&draft.name, draft.price)
    }

    fn validate(&self) -> Result<(), Violation> {
        check_fields(&self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: String::new(),
            price,
        }
    }

    #[test]
    fn accepts_a_sane_draft() {
        assert!(Product::validate_draft(&draft("Nitro 5", 1200.0)).is_ok());
        assert!(Product::validate_draft(&draft("Free sample", 0.0)).is_ok());
    }

    #[test]
    fn rejects_blank_names() {
        let violation = Product::validate_draft(&draft("   ", 1.0)).unwrap_err();
        assert_eq!(violation.field, "name");
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        assert_eq!(
            Product::validate_draft(&draft("X", -1.0)).unwrap_err().field,
            "price"
        );
        assert_eq!(
            Product::validate_draft(&draft("X", f64::NAN)).unwrap_err().field,
            "price"
        );
    }
}
