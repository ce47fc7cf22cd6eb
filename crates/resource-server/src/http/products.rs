//! Handlers for the product catalog.
//!
//! - `GET /products/` - list
//! - `GET /products/{id}` - read, 404 when absent
//! - `POST /products/` - create; the store assigns the id, any id in the
//!   body is ignored
//! - `PUT /products/` - full-record update; 404 on an unknown id, never
//!   an insert
//! - `DELETE /products/{id}` - delete, 404 when absent

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use resource_core::{ServiceError, Store, Violation};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::AppState;
use crate::model::{Product, ProductDraft, ProductId};

/// A product as it arrives over the wire. The id is optional: ignored on
/// create, required on update.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

impl ProductBody {
    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Product>>, ApiError>
where
    S: Store<Product>,
{
    Ok(Json(state.service().list().await?))
}

pub async fn read<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, ApiError>
where
    S: Store<Product>,
{
    debug!(id, "reading product");
    Ok(Json(state.service().read(ProductId::from(id)).await?))
}

pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Product>), ApiError>
where
    S: Store<Product>,
{
    if body.id.is_some() {
        debug!("ignoring client-supplied id on create");
    }
    let created = state.service().create(body.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update<S>(
    State(state): State<AppState<S>>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>, ApiError>
where
    S: Store<Product>,
{
    let id = body.id.ok_or_else(|| {
        ServiceError::Validation(Violation::new("id", "required for an update"))
    })?;
    let record = Product {
        id,
        name: body.name,
        description: body.description,
        price: body.price,
    };
    Ok(Json(state.service().update(record).await?))
}

pub async fn remove<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError>
where
    S: Store<Product>,
{
    state.service().delete(ProductId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
