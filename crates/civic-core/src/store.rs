//! The `CivicStore` trait.
//!
//! Implemented by storage backends (e.g. `civic-store-memory`). The HTTP API
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  complaint::{Complaint, ComplaintStatus, NewComplaint},
  donation::{BloodRequest, NewBloodRequest},
  emergency::EmergencyRequest,
  fundraiser::{Fundraiser, NewFundraiser},
  listing::ListingQuery,
  stats::DashboardStats,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error bound for store backends.
///
/// Lets callers tell domain failures (missing record, rejected donation)
/// apart from backend failures without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error behind this failure, if any.
  fn as_core(&self) -> Option<&crate::Error>;
}

impl StoreError for crate::Error {
  fn as_core(&self) -> Option<&crate::Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the record store behind the civic service.
///
/// Listing methods run the [`crate::listing`] pipeline over the stored
/// records and return owned copies in display order. New records are
/// prepended, so insertion order is newest first.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait CivicStore: Send + Sync {
  type Error: StoreError;

  // ── Complaints ────────────────────────────────────────────────────────

  fn list_complaints(
    &self,
    query: ListingQuery,
  ) -> impl Future<Output = Result<Vec<Complaint>, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_complaint(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Persist a validated issue report. The new complaint starts `pending`.
  fn report_issue(
    &self,
    input: NewComplaint,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  /// Move a complaint to `status` and bump its `updated_at`.
  fn set_complaint_status(
    &self,
    id: Uuid,
    status: ComplaintStatus,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  // ── Blood requests ────────────────────────────────────────────────────

  fn list_blood_requests(
    &self,
    query: ListingQuery,
  ) -> impl Future<Output = Result<Vec<BloodRequest>, Self::Error>> + Send + '_;

  fn create_blood_request(
    &self,
    input: NewBloodRequest,
  ) -> impl Future<Output = Result<BloodRequest, Self::Error>> + Send + '_;

  // ── Fundraisers ───────────────────────────────────────────────────────

  fn list_fundraisers(
    &self,
    query: ListingQuery,
  ) -> impl Future<Output = Result<Vec<Fundraiser>, Self::Error>> + Send + '_;

  fn create_fundraiser(
    &self,
    input: NewFundraiser,
  ) -> impl Future<Output = Result<Fundraiser, Self::Error>> + Send + '_;

  /// Pledge `amount` to a campaign and return the updated campaign.
  ///
  /// Fails if the campaign is unknown, `amount` is not positive, or the goal
  /// has already been reached.
  fn donate(
    &self,
    id: Uuid,
    amount: f64,
  ) -> impl Future<Output = Result<Fundraiser, Self::Error>> + Send + '_;

  // ── Emergency alerts ──────────────────────────────────────────────────

  fn record_alert(
    &self,
    alert: EmergencyRequest,
  ) -> impl Future<Output = Result<EmergencyRequest, Self::Error>> + Send + '_;

  /// All received alerts, newest first.
  fn list_alerts(
    &self,
  ) -> impl Future<Output = Result<Vec<EmergencyRequest>, Self::Error>> + Send + '_;

  // ── Dashboard ─────────────────────────────────────────────────────────

  fn stats(
    &self,
    as_of: DateTime<Utc>,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
