//! Handlers for `/blood-requests`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/blood-requests` | `search`, `blood_type`, `urgency` |
//! | `POST` | `/blood-requests` | Body: [`BloodRequestForm`]; 201 or 422 |
//!
//! A new request publishes `bloodRequestUpdate`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use civic_core::{
  donation::BloodRequest, event::CivicEvent, store::CivicStore,
  validation::BloodRequestForm,
};

use crate::{error::ApiError, events::EventHub, query::ListParams};

/// `GET /blood-requests`
pub async fn list<S: CivicStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<BloodRequest>>, ApiError> {
  let requests = store
    .list_blood_requests(params.into())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(requests))
}

/// `POST /blood-requests`
pub async fn create<S: CivicStore>(
  State(store): State<Arc<S>>,
  State(events): State<EventHub>,
  Json(form): Json<BloodRequestForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.validate()?;
  let request = store
    .create_blood_request(input)
    .await
    .map_err(ApiError::from_store)?;
  events.publish(CivicEvent::BloodRequestUpdate(request.clone()));
  Ok((StatusCode::CREATED, Json(request)))
}
