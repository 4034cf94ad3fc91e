//! [`MemoryStore`]: the in-memory implementation of [`CivicStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use civic_core::{
  Error, Result,
  complaint::{Complaint, ComplaintStatus, NewComplaint},
  donation::{BloodRequest, NewBloodRequest},
  emergency::EmergencyRequest,
  fundraiser::{Fundraiser, NewFundraiser},
  listing::{self, ListingQuery, Listable},
  seed,
  stats::DashboardStats,
  store::CivicStore,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Most emergency alerts retained. Older ones are dropped first.
pub const MAX_ALERTS: usize = 500;

#[derive(Default)]
struct Tables {
  complaints:     RwLock<Vec<Complaint>>,
  blood_requests: RwLock<Vec<BloodRequest>>,
  fundraisers:    RwLock<Vec<Fundraiser>>,
  alerts:         RwLock<Vec<EmergencyRequest>>,
}

/// A civic record store held entirely in memory.
///
/// Cloning is cheap; clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Tables>,
}

impl MemoryStore {
  /// A store with no records.
  pub fn empty() -> Self { Self::default() }

  /// A store holding the sample complaints, blood requests and fundraisers.
  pub fn seeded() -> Self {
    let tables = Tables {
      complaints:     RwLock::new(seed::complaints()),
      blood_requests: RwLock::new(seed::blood_requests()),
      fundraisers:    RwLock::new(seed::fundraisers()),
      alerts:         RwLock::default(),
    };
    Self {
      tables: Arc::new(tables),
    }
  }
}

/// Run the listing pipeline over `records` and clone the survivors.
fn select<T: Listable + Clone>(records: &[T], query: &ListingQuery) -> Vec<T> {
  listing::apply(records, query).into_iter().cloned().collect()
}

// ─── CivicStore impl ─────────────────────────────────────────────────────────

impl CivicStore for MemoryStore {
  type Error = Error;

  async fn list_complaints(&self, query: ListingQuery) -> Result<Vec<Complaint>> {
    let complaints = self.tables.complaints.read().await;
    Ok(select(&complaints, &query))
  }

  async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
    let complaints = self.tables.complaints.read().await;
    Ok(complaints.iter().find(|c| c.complaint_id == id).cloned())
  }

  async fn report_issue(&self, input: NewComplaint) -> Result<Complaint> {
    let complaint = input.into_complaint(Utc::now());
    self
      .tables
      .complaints
      .write()
      .await
      .insert(0, complaint.clone());
    tracing::info!(id = %complaint.complaint_id, category = %complaint.category, "issue reported");
    Ok(complaint)
  }

  async fn set_complaint_status(
    &self,
    id: Uuid,
    status: ComplaintStatus,
  ) -> Result<Complaint> {
    let mut complaints = self.tables.complaints.write().await;
    let complaint = complaints
      .iter_mut()
      .find(|c| c.complaint_id == id)
      .ok_or(Error::ComplaintNotFound(id))?;
    complaint.status = status;
    complaint.updated_at = Utc::now();
    tracing::info!(%id, %status, "complaint status changed");
    Ok(complaint.clone())
  }

  async fn list_blood_requests(
    &self,
    query: ListingQuery,
  ) -> Result<Vec<BloodRequest>> {
    let requests = self.tables.blood_requests.read().await;
    Ok(select(&requests, &query))
  }

  async fn create_blood_request(
    &self,
    input: NewBloodRequest,
  ) -> Result<BloodRequest> {
    let request = input.into_request(Utc::now());
    self
      .tables
      .blood_requests
      .write()
      .await
      .insert(0, request.clone());
    tracing::info!(id = %request.request_id, blood_type = %request.blood_type, "blood request created");
    Ok(request)
  }

  async fn list_fundraisers(&self, query: ListingQuery) -> Result<Vec<Fundraiser>> {
    let fundraisers = self.tables.fundraisers.read().await;
    Ok(select(&fundraisers, &query))
  }

  async fn create_fundraiser(&self, input: NewFundraiser) -> Result<Fundraiser> {
    let fundraiser = input.into_fundraiser(Utc::now());
    self
      .tables
      .fundraisers
      .write()
      .await
      .insert(0, fundraiser.clone());
    tracing::info!(id = %fundraiser.fundraiser_id, "fundraiser created");
    Ok(fundraiser)
  }

  async fn donate(&self, id: Uuid, amount: f64) -> Result<Fundraiser> {
    let mut fundraisers = self.tables.fundraisers.write().await;
    let fundraiser = fundraisers
      .iter_mut()
      .find(|f| f.fundraiser_id == id)
      .ok_or(Error::FundraiserNotFound(id))?;
    fundraiser.pledge(amount)?;
    tracing::info!(%id, amount, raised = fundraiser.raised_amount, "donation recorded");
    Ok(fundraiser.clone())
  }

  async fn record_alert(&self, alert: EmergencyRequest) -> Result<EmergencyRequest> {
    tracing::warn!(
      alert_id = %alert.alert_id,
      kind = %alert.kind,
      location = %alert.location,
      "emergency alert received"
    );
    let mut alerts = self.tables.alerts.write().await;
    alerts.insert(0, alert.clone());
    if alerts.len() > MAX_ALERTS {
      alerts.truncate(MAX_ALERTS);
      tracing::debug!(kept = MAX_ALERTS, "oldest alerts dropped");
    }
    Ok(alert)
  }

  async fn list_alerts(&self) -> Result<Vec<EmergencyRequest>> {
    Ok(self.tables.alerts.read().await.clone())
  }

  async fn stats(&self, as_of: DateTime<Utc>) -> Result<DashboardStats> {
    let complaints = self.tables.complaints.read().await;
    let requests = self.tables.blood_requests.read().await;
    let fundraisers = self.tables.fundraisers.read().await;
    Ok(DashboardStats::compute(
      &complaints,
      &requests,
      &fundraisers,
      as_of,
    ))
  }
}
