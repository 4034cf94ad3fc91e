//! Handlers for `/fundraisers`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/fundraisers` | `search`, `category`, `urgency` |
//! | `POST` | `/fundraisers` | Body: [`FundraiserForm`]; 201 or 422 |
//! | `POST` | `/fundraisers/{id}/donate` | Body: `{"amount":500}`; 409 once the goal is met |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use civic_core::{
  fundraiser::Fundraiser, store::CivicStore, validation::FundraiserForm,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, query::ListParams};

/// `GET /fundraisers`
pub async fn list<S: CivicStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Fundraiser>>, ApiError> {
  let fundraisers = store
    .list_fundraisers(params.into())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(fundraisers))
}

/// `POST /fundraisers`
pub async fn create<S: CivicStore>(
  State(store): State<Arc<S>>,
  Json(form): Json<FundraiserForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.validate()?;
  let fundraiser = store
    .create_fundraiser(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(fundraiser)))
}

#[derive(Debug, Deserialize)]
pub struct DonateBody {
  pub amount: f64,
}

/// `POST /fundraisers/{id}/donate`
pub async fn donate<S: CivicStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DonateBody>,
) -> Result<Json<Fundraiser>, ApiError> {
  let fundraiser = store
    .donate(id, body.amount)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(fundraiser))
}
