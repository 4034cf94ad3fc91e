//! Live notifications pushed to connected clients when records change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  complaint::{Complaint, ComplaintStatus},
  donation::BloodRequest,
};

/// Payload of an [`CivicEvent::IssueStatusUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
  pub id:     Uuid,
  pub status: ComplaintStatus,
}

/// A change worth telling every connected client about.
///
/// Serialised as `{"event": "<name>", "data": {...}}`, with the same names
/// used for the SSE `event:` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum CivicEvent {
  NewComplaint(Complaint),
  BloodRequestUpdate(BloodRequest),
  IssueStatusUpdate(StatusUpdate),
}

impl CivicEvent {
  pub fn name(&self) -> &'static str {
    match self {
      Self::NewComplaint(_) => "newComplaint",
      Self::BloodRequestUpdate(_) => "bloodRequestUpdate",
      Self::IssueStatusUpdate(_) => "issueStatusUpdate",
    }
  }

  /// One-line text for a toast or status bar.
  pub fn message(&self) -> String {
    match self {
      Self::NewComplaint(c) => format!("New issue reported: {}", c.title),
      Self::BloodRequestUpdate(r) => {
        format!("Urgent: Blood donation needed for {}", r.patient_name)
      }
      Self::IssueStatusUpdate(u) => {
        format!("Issue #{} status changed to {}", u.id, u.status)
      }
    }
  }
}
