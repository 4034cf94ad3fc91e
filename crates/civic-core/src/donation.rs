//! Blood donation requests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  emergency::Coordinates,
  listing::{Facet, Listable},
};

/// Days a new blood request stays open.
pub const DEFAULT_REQUIRED_WITHIN_DAYS: i64 = 7;

// ─── Categorical fields ──────────────────────────────────────────────────────

/// ABO/Rh blood group, serialised in its conventional notation (`"O-"`).
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
pub enum BloodType {
  #[serde(rename = "A+")]
  #[strum(serialize = "A+")]
  APositive,
  #[serde(rename = "A-")]
  #[strum(serialize = "A-")]
  ANegative,
  #[serde(rename = "B+")]
  #[strum(serialize = "B+")]
  BPositive,
  #[serde(rename = "B-")]
  #[strum(serialize = "B-")]
  BNegative,
  #[serde(rename = "AB+")]
  #[strum(serialize = "AB+")]
  AbPositive,
  #[serde(rename = "AB-")]
  #[strum(serialize = "AB-")]
  AbNegative,
  #[serde(rename = "O+")]
  #[strum(serialize = "O+")]
  OPositive,
  #[serde(rename = "O-")]
  #[strum(serialize = "O-")]
  ONegative,
}

/// Urgency of a blood request or fundraiser.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Urgency {
  Critical,
  Urgent,
  #[default]
  Normal,
}

// ─── BloodRequest ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
  pub request_id:      Uuid,
  pub patient_name:    String,
  pub blood_type:      BloodType,
  pub urgency:         Urgency,
  pub hospital:        String,
  pub location:        String,
  pub coordinates:     Option<Coordinates>,
  pub contact_person:  String,
  pub contact_phone:   String,
  pub units_needed:    u32,
  pub units_collected: u32,
  pub required_by:     DateTime<Utc>,
  pub description:     String,
  pub created_at:      DateTime<Utc>,
}

impl BloodRequest {
  /// Still accepting donors at `now`.
  pub fn is_active(&self, now: DateTime<Utc>) -> bool { self.required_by > now }

  pub fn units_outstanding(&self) -> u32 {
    self.units_needed.saturating_sub(self.units_collected)
  }
}

/// Validated input for a new blood request; see
/// [`crate::validation::BloodRequestForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBloodRequest {
  pub patient_name:   String,
  pub blood_type:     BloodType,
  pub urgency:        Urgency,
  pub hospital:       String,
  pub location:       String,
  pub contact_person: String,
  pub contact_phone:  String,
  pub units_needed:   u32,
  pub description:    String,
}

impl NewBloodRequest {
  /// Materialise the request with nothing collected yet and a
  /// [`DEFAULT_REQUIRED_WITHIN_DAYS`] deadline.
  pub fn into_request(self, now: DateTime<Utc>) -> BloodRequest {
    BloodRequest {
      request_id:      Uuid::new_v4(),
      patient_name:    self.patient_name,
      blood_type:      self.blood_type,
      urgency:         self.urgency,
      hospital:        self.hospital,
      location:        self.location,
      coordinates:     None,
      contact_person:  self.contact_person,
      contact_phone:   self.contact_phone,
      units_needed:    self.units_needed,
      units_collected: 0,
      required_by:     now + Duration::days(DEFAULT_REQUIRED_WITHIN_DAYS),
      description:     self.description,
      created_at:      now,
    }
  }
}

impl Listable for BloodRequest {
  fn id(&self) -> Uuid { self.request_id }

  fn search_fields(&self) -> Vec<&str> {
    vec![&self.patient_name, &self.hospital, &self.location]
      .into_iter()
      .map(String::as_str)
      .collect()
  }

  fn facet(&self, facet: Facet) -> Option<&str> {
    match facet {
      Facet::BloodType => Some(self.blood_type.as_ref()),
      Facet::Priority => Some(self.urgency.as_ref()),
      Facet::Status | Facet::Category => None,
    }
  }

  fn priority_label(&self) -> Option<&str> { Some(self.urgency.as_ref()) }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn blood_type_uses_conventional_notation() {
    assert_eq!(BloodType::ONegative.as_ref(), "O-");
    assert_eq!(BloodType::from_str("AB+").unwrap(), BloodType::AbPositive);
    assert!(BloodType::from_str("Z+").is_err());
    assert_eq!(
      serde_json::to_string(&BloodType::APositive).unwrap(),
      "\"A+\""
    );
  }

  #[test]
  fn outstanding_units_never_underflow() {
    let now = Utc::now();
    let mut request = NewBloodRequest {
      patient_name:   "Anita Singh".into(),
      blood_type:     BloodType::APositive,
      urgency:        Urgency::Urgent,
      hospital:       "Fortis Hospital".into(),
      location:       "Sector 62, Noida".into(),
      contact_person: "Suresh Singh".into(),
      contact_phone:  "+91 9876543221".into(),
      units_needed:   2,
      description:    "Needs A+ blood for ongoing treatment.".into(),
    }
    .into_request(now);

    assert_eq!(request.units_outstanding(), 2);
    assert!(request.is_active(now));
    assert_eq!(request.required_by - now, Duration::days(7));

    request.units_collected = 5;
    assert_eq!(request.units_outstanding(), 0);
  }
}
