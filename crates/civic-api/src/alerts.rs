//! Emergency alert intake: the delivery target of the SOS controller.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/alerts` | Received alerts, newest first |
//! | `POST` | `/alerts` | Body: `EmergencyRequest`; 202 |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use civic_core::{emergency::EmergencyRequest, store::CivicStore};

use crate::error::ApiError;

/// `GET /alerts`
pub async fn list<S: CivicStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<EmergencyRequest>>, ApiError> {
  let alerts = store.list_alerts().await.map_err(ApiError::from_store)?;
  Ok(Json(alerts))
}

/// `POST /alerts`
pub async fn receive<S: CivicStore>(
  State(store): State<Arc<S>>,
  Json(alert): Json<EmergencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let alert = store
    .record_alert(alert)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::ACCEPTED, Json(alert)))
}
