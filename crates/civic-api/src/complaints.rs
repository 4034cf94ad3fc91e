//! Handlers for `/complaints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/complaints` | [`ListParams`]: `search`, `status`, `priority`, `category`, `order` |
//! | `POST` | `/complaints` | Body: [`IssueReportForm`]; 201, or 422 with field errors |
//! | `GET`  | `/complaints/{id}` | 404 if not found |
//! | `POST` | `/complaints/{id}/status` | Body: `{"status":"resolved"}` |
//!
//! Creating a complaint publishes `newComplaint`; a status change publishes
//! `issueStatusUpdate`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use civic_core::{
  complaint::{Complaint, ComplaintStatus},
  event::{CivicEvent, StatusUpdate},
  store::CivicStore,
  validation::IssueReportForm,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, events::EventHub, query::ListParams};

/// `GET /complaints`
pub async fn list<S: CivicStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Complaint>>, ApiError> {
  let complaints = store
    .list_complaints(params.into())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(complaints))
}

/// `POST /complaints`
pub async fn create<S: CivicStore>(
  State(store): State<Arc<S>>,
  State(events): State<EventHub>,
  Json(form): Json<IssueReportForm>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form.validate()?;
  let complaint = store
    .report_issue(input)
    .await
    .map_err(ApiError::from_store)?;
  events.publish(CivicEvent::NewComplaint(complaint.clone()));
  Ok((StatusCode::CREATED, Json(complaint)))
}

/// `GET /complaints/{id}`
pub async fn get_one<S: CivicStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Complaint>, ApiError> {
  let complaint = store
    .get_complaint(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("complaint {id} not found")))?;
  Ok(Json(complaint))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ComplaintStatus,
}

/// `POST /complaints/{id}/status`
pub async fn set_status<S: CivicStore>(
  State(store): State<Arc<S>>,
  State(events): State<EventHub>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Complaint>, ApiError> {
  let complaint = store
    .set_complaint_status(id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  events.publish(CivicEvent::IssueStatusUpdate(StatusUpdate {
    id,
    status: complaint.status,
  }));
  Ok(Json(complaint))
}
