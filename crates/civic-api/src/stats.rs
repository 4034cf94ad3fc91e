//! `GET /stats[?as_of=<rfc3339>]`: dashboard statistics.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use civic_core::{stats::DashboardStats, store::CivicStore};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
  /// Instant at which "active" is judged. Defaults to now.
  pub as_of: Option<DateTime<Utc>>,
}

pub async fn handler<S: CivicStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<DashboardStats>, ApiError> {
  let as_of = params.as_of.unwrap_or_else(Utc::now);
  let stats = store.stats(as_of).await.map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
