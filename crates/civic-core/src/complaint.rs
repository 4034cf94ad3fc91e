//! Civic issue reports ("complaints").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  emergency::Coordinates,
  listing::{Facet, Listable},
};

// ─── Categorical fields ──────────────────────────────────────────────────────

/// Moderation state of a complaint. Changed only by the admin view.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComplaintStatus {
  Pending,
  Verified,
  Resolved,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
  Critical,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueCategory {
  Garbage,
  Water,
  Electricity,
  Roads,
  Infrastructure,
  Other,
}

impl IssueCategory {
  /// Label shown next to the category picker.
  pub fn label(self) -> &'static str {
    match self {
      Self::Garbage => "Garbage/Waste Management",
      Self::Water => "Water Supply/Drainage",
      Self::Electricity => "Electricity/Power",
      Self::Roads => "Roads/Transportation",
      Self::Infrastructure => "Infrastructure",
      Self::Other => "Other",
    }
  }
}

// ─── Complaint ───────────────────────────────────────────────────────────────

/// A reported infrastructure issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
  pub complaint_id: Uuid,
  pub title:        String,
  pub description:  String,
  pub location:     String,
  pub coordinates:  Option<Coordinates>,
  pub reported_by:  String,
  pub contact_info: String,
  pub status:       ComplaintStatus,
  pub priority:     Priority,
  pub category:     IssueCategory,
  pub images:       Vec<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Validated input for a new complaint; see
/// [`crate::validation::IssueReportForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
  pub title:        String,
  pub description:  String,
  pub location:     String,
  pub coordinates:  Option<Coordinates>,
  pub reported_by:  String,
  pub contact_info: String,
  pub priority:     Priority,
  pub category:     IssueCategory,
  pub images:       Vec<String>,
}

impl NewComplaint {
  /// Materialise the complaint. New reports always start as `pending`.
  pub fn into_complaint(self, now: DateTime<Utc>) -> Complaint {
    Complaint {
      complaint_id: Uuid::new_v4(),
      title:        self.title,
      description:  self.description,
      location:     self.location,
      coordinates:  self.coordinates,
      reported_by:  self.reported_by,
      contact_info: self.contact_info,
      status:       ComplaintStatus::Pending,
      priority:     self.priority,
      category:     self.category,
      images:       self.images,
      created_at:   now,
      updated_at:   now,
    }
  }
}

impl Listable for Complaint {
  fn id(&self) -> Uuid { self.complaint_id }

  fn search_fields(&self) -> Vec<&str> {
    vec![&self.title, &self.location, &self.reported_by]
      .into_iter()
      .map(String::as_str)
      .collect()
  }

  fn facet(&self, facet: Facet) -> Option<&str> {
    match facet {
      Facet::Status => Some(self.status.as_ref()),
      Facet::Priority => Some(self.priority.as_ref()),
      Facet::Category => Some(self.category.as_ref()),
      Facet::BloodType => None,
    }
  }

  fn priority_label(&self) -> Option<&str> { Some(self.priority.as_ref()) }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }
}
