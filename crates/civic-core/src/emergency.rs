//! Emergency alert types: the payload assembled by the SOS controller and
//! accepted by the alert intake endpoint.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use uuid::Uuid;

/// Reporter id attached to alerts until there is an identity layer.
pub const ANONYMOUS_REPORTER: &str = "current-user";

// ─── Location ────────────────────────────────────────────────────────────────

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Coordinates {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude, longitude }
  }

  /// A map link suitable for sharing.
  pub fn maps_url(&self) -> String {
    format!(
      "https://maps.google.com/?q={},{}",
      self.latitude, self.longitude
    )
  }
}

impl fmt::Display for Coordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Lat: {:.6}, Lng: {:.6}", self.latitude, self.longitude)
  }
}

/// Where the emergency is, as far as the device could tell.
///
/// Absence of a fix is a value of its own rather than a missing field, so a
/// dispatched alert always says whether the location is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationFix {
  Known(Coordinates),
  Unavailable,
}

impl LocationFix {
  pub fn coordinates(&self) -> Option<Coordinates> {
    match self {
      Self::Known(c) => Some(*c),
      Self::Unavailable => None,
    }
  }

  pub fn is_known(&self) -> bool { matches!(self, Self::Known(_)) }
}

impl From<Option<Coordinates>> for LocationFix {
  fn from(value: Option<Coordinates>) -> Self {
    value.map_or(Self::Unavailable, Self::Known)
  }
}

impl fmt::Display for LocationFix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Known(c) => fmt::Display::fmt(c, f),
      Self::Unavailable => f.write_str("Location unavailable"),
    }
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

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
  Display,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyKind {
  #[strum(to_string = "Medical Emergency")]
  Medical,
  Accident,
  #[strum(to_string = "Crime/Violence")]
  CrimeViolence,
  Fire,
  #[strum(to_string = "Natural Disaster")]
  NaturalDisaster,
  Other,
  /// Used when the reporter did not pick a kind.
  #[default]
  #[strum(to_string = "General Emergency")]
  General,
}

impl EmergencyKind {
  /// The kinds offered on the SOS form; `General` is only a fallback.
  pub fn selectable() -> impl Iterator<Item = Self> {
    Self::iter().filter(|k| *k != Self::General)
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Lifecycle of an alert. Only the initial state is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
  #[default]
  Active,
}

/// The payload sent to authorities when an SOS countdown expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyRequest {
  pub alert_id:   Uuid,
  pub kind:       EmergencyKind,
  pub location:   LocationFix,
  /// Free-text details from the reporter; may be empty.
  pub note:       String,
  /// Time of dispatch, not of activation.
  pub created_at: DateTime<Utc>,
  pub status:     AlertStatus,
  pub reporter:   String,
}

impl EmergencyRequest {
  /// Assemble a request at `now`. A missing kind becomes
  /// [`EmergencyKind::General`].
  pub fn new(
    kind: Option<EmergencyKind>,
    location: LocationFix,
    note: impl Into<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      alert_id: Uuid::new_v4(),
      kind: kind.unwrap_or_default(),
      location,
      note: note.into(),
      created_at: now,
      status: AlertStatus::Active,
      reporter: ANONYMOUS_REPORTER.to_owned(),
    }
  }
}

// ─── Quick-dial contacts ─────────────────────────────────────────────────────

/// A public emergency service reachable by phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
  pub name:   &'static str,
  pub number: &'static str,
}

pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
  EmergencyContact { name: "Police", number: "100" },
  EmergencyContact { name: "Fire", number: "101" },
  EmergencyContact { name: "Ambulance", number: "102" },
  EmergencyContact { name: "Emergency", number: "108" },
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unavailable_location_is_explicit_in_json() {
    let req = EmergencyRequest::new(None, LocationFix::Unavailable, "", Utc::now());
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["location"], serde_json::json!({ "kind": "unavailable" }));
    assert_eq!(json["kind"], "general");
    assert_eq!(req.kind.to_string(), "General Emergency");
  }

  #[test]
  fn known_location_formats_to_six_places() {
    let fix = LocationFix::Known(Coordinates::new(28.5355, 77.391));
    assert_eq!(fix.to_string(), "Lat: 28.535500, Lng: 77.391000");
    assert_eq!(
      fix.coordinates().unwrap().maps_url(),
      "https://maps.google.com/?q=28.5355,77.391"
    );
    let back: LocationFix =
      serde_json::from_value(serde_json::to_value(fix).unwrap()).unwrap();
    assert_eq!(back, fix);
  }

  #[test]
  fn general_is_not_selectable() {
    let kinds: Vec<_> = EmergencyKind::selectable().collect();
    assert_eq!(kinds.len(), 6);
    assert!(!kinds.contains(&EmergencyKind::General));
    assert_eq!(EmergencyKind::CrimeViolence.to_string(), "Crime/Violence");
  }
}
