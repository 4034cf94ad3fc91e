//! Field-level validation for the three creation forms.
//!
//! Each form arrives as a loosely-typed `*Form` (every field optional, exactly
//! as submitted) and is turned into the typed `New*` input by `validate`. The
//! rules live on the form structs as `validator` attributes. All failing
//! fields are reported together so they can be shown next to their inputs in
//! one pass.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
  complaint::{IssueCategory, NewComplaint, Priority},
  donation::{BloodType, NewBloodRequest, Urgency},
  emergency::Coordinates,
  fundraiser::NewFundraiser,
};

/// Most photos a single issue report may carry. Mirrored in the `images`
/// rule on [`IssueReportForm`].
pub const MAX_IMAGES: usize = 5;

/// Reporter name used until there is an identity layer.
pub const DEFAULT_REPORTER: &str = "Current User";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A problem with one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

/// Every field error found in one submission. Never empty when returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
  pub fields: Vec<FieldError>,
}

impl ValidationErrors {
  /// The message for `field`, if it failed.
  pub fn message_for(&self, field: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|e| e.field == field)
      .map(|e| e.message.as_str())
  }

  /// Flatten a `validator` report into one message per field, in `order`.
  ///
  /// `validator` keys its report by field name with no ordering, so the form
  /// supplies its declaration order. Only the first failure of a field is
  /// kept.
  fn from_report(order: &[&'static str], report: &validator::ValidationErrors) -> Self {
    let by_field = report.field_errors();
    let fields = order
      .iter()
      .filter_map(|&field| {
        let first = by_field.get(field)?.first()?;
        let message = first
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| first.code.to_string());
        Some(FieldError { field, message })
      })
      .collect();
    Self { fields }
  }

  fn missing(field: &'static str) -> Self {
    Self {
      fields: vec![FieldError {
        field,
        message: "Field is required".to_owned(),
      }],
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("validation failed")?;
    for (i, e) in self.fields.iter().enumerate() {
      let sep = if i == 0 { ": " } else { "; " };
      write!(f, "{sep}{} ({})", e.message, e.field)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Rule helpers ────────────────────────────────────────────────────────────

/// Trim `value`, treating blank text as absent.
fn clean(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// Drop numbers that cannot be a quantity at all.
fn finite(value: Option<f64>) -> Option<f64> { value.filter(|v| v.is_finite()) }

/// A field `validator` has already checked is present.
fn present<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationErrors> {
  value.ok_or_else(|| ValidationErrors::missing(field))
}

fn choice<T: FromStr>(value: &str) -> Result<(), ValidationError> {
  match value.parse::<T>() {
    Ok(_) => Ok(()),
    Err(_) => {
      let mut error = ValidationError::new("choice");
      error.message = Some(Cow::Owned(format!("Unknown value {value:?}")));
      Err(error)
    }
  }
}

fn known_category(value: &str) -> Result<(), ValidationError> { choice::<IssueCategory>(value) }

fn known_priority(value: &str) -> Result<(), ValidationError> { choice::<Priority>(value) }

fn known_blood_type(value: &str) -> Result<(), ValidationError> { choice::<BloodType>(value) }

fn known_urgency(value: &str) -> Result<(), ValidationError> { choice::<Urgency>(value) }

fn whole_units(value: f64) -> Result<(), ValidationError> {
  if value.fract() == 0.0 && value <= f64::from(u32::MAX) {
    return Ok(());
  }
  let mut error = ValidationError::new("whole");
  error.message = Some(Cow::Borrowed("Must be a whole number"));
  Err(error)
}

/// Parse a value whose `choice` rule already passed.
fn parsed<T: FromStr>(field: &'static str, value: Option<String>) -> Result<T, ValidationErrors> {
  present(field, value.and_then(|v| v.parse().ok()))
}

// ─── Issue report ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct IssueReportForm {
  #[validate(
    required(message = "Title is required"),
    length(min = 10, message = "Title must be at least 10 characters")
  )]
  pub title:        Option<String>,
  #[validate(
    required(message = "Description is required"),
    length(min = 20, message = "Description must be at least 20 characters")
  )]
  pub description:  Option<String>,
  #[validate(
    required(message = "Category is required"),
    custom(function = "known_category")
  )]
  pub category:     Option<String>,
  #[validate(
    required(message = "Priority is required"),
    custom(function = "known_priority")
  )]
  pub priority:     Option<String>,
  #[validate(required(message = "Location is required"))]
  pub location:     Option<String>,
  #[validate(required(message = "Contact information is required"))]
  pub contact_info: Option<String>,
  pub reported_by:  Option<String>,
  pub coordinates:  Option<Coordinates>,
  #[validate(length(max = 5, message = "Maximum 5 images allowed"))]
  pub images:       Vec<String>,
}

impl IssueReportForm {
  const FIELDS: &'static [&'static str] = &[
    "title",
    "description",
    "category",
    "priority",
    "location",
    "contact_info",
    "images",
  ];

  fn cleaned(self) -> Self {
    Self {
      title: clean(self.title),
      description: clean(self.description),
      category: clean(self.category),
      priority: clean(self.priority),
      location: clean(self.location),
      contact_info: clean(self.contact_info),
      reported_by: clean(self.reported_by),
      ..self
    }
  }

  pub fn validate(self) -> Result<NewComplaint, ValidationErrors> {
    let form = self.cleaned();
    Validate::validate(&form).map_err(|e| ValidationErrors::from_report(Self::FIELDS, &e))?;

    Ok(NewComplaint {
      title:        present("title", form.title)?,
      description:  present("description", form.description)?,
      location:     present("location", form.location)?,
      coordinates:  form.coordinates,
      reported_by:  form
        .reported_by
        .unwrap_or_else(|| DEFAULT_REPORTER.to_owned()),
      contact_info: present("contact_info", form.contact_info)?,
      priority:     parsed("priority", form.priority)?,
      category:     parsed("category", form.category)?,
      images:       form.images,
    })
  }
}

// ─── Blood request ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct BloodRequestForm {
  #[validate(
    required(message = "Patient name is required"),
    length(min = 2, message = "Name must be at least 2 characters")
  )]
  pub patient_name:   Option<String>,
  #[validate(
    required(message = "Blood type is required"),
    custom(function = "known_blood_type")
  )]
  pub blood_type:     Option<String>,
  #[validate(required(message = "Hospital name is required"))]
  pub hospital:       Option<String>,
  #[validate(
    required(message = "Urgency level is required"),
    custom(function = "known_urgency")
  )]
  pub urgency:        Option<String>,
  #[validate(
    required(message = "Units needed is required"),
    range(exclusive_min = 0.0, message = "Must be a positive number"),
    custom(function = "whole_units")
  )]
  pub units_needed:   Option<f64>,
  #[validate(
    required(message = "Phone number is required"),
    length(min = 10, message = "Phone number must be at least 10 digits")
  )]
  pub contact_phone:  Option<String>,
  #[validate(required(message = "Contact person is required"))]
  pub contact_person: Option<String>,
  #[validate(required(message = "Location is required"))]
  pub location:       Option<String>,
  #[validate(
    required(message = "Description is required"),
    length(min = 20, message = "Description must be at least 20 characters")
  )]
  pub description:    Option<String>,
}

impl BloodRequestForm {
  const FIELDS: &'static [&'static str] = &[
    "patient_name",
    "blood_type",
    "hospital",
    "urgency",
    "units_needed",
    "contact_phone",
    "contact_person",
    "location",
    "description",
  ];

  fn cleaned(self) -> Self {
    Self {
      patient_name:   clean(self.patient_name),
      blood_type:     clean(self.blood_type),
      hospital:       clean(self.hospital),
      urgency:        clean(self.urgency),
      units_needed:   finite(self.units_needed),
      contact_phone:  clean(self.contact_phone),
      contact_person: clean(self.contact_person),
      location:       clean(self.location),
      description:    clean(self.description),
    }
  }

  pub fn validate(self) -> Result<NewBloodRequest, ValidationErrors> {
    let form = self.cleaned();
    Validate::validate(&form).map_err(|e| ValidationErrors::from_report(Self::FIELDS, &e))?;

    Ok(NewBloodRequest {
      patient_name:   present("patient_name", form.patient_name)?,
      blood_type:     parsed("blood_type", form.blood_type)?,
      urgency:        parsed("urgency", form.urgency)?,
      hospital:       present("hospital", form.hospital)?,
      location:       present("location", form.location)?,
      contact_person: present("contact_person", form.contact_person)?,
      contact_phone:  present("contact_phone", form.contact_phone)?,
      units_needed:   present("units_needed", form.units_needed)? as u32,
      description:    present("description", form.description)?,
    })
  }
}

// ─── Fundraiser ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct FundraiserForm {
  #[validate(
    required(message = "Title is required"),
    length(min = 10, message = "Title must be at least 10 characters")
  )]
  pub title:         Option<String>,
  #[validate(
    required(message = "Description is required"),
    length(min = 50, message = "Description must be at least 50 characters")
  )]
  pub description:   Option<String>,
  #[validate(
    required(message = "Target amount is required"),
    range(exclusive_min = 0.0, message = "Amount must be positive")
  )]
  pub target_amount: Option<f64>,
  #[validate(required(message = "Organizer name is required"))]
  pub organizer:     Option<String>,
  #[validate(required(message = "Hospital name is required"))]
  pub hospital:      Option<String>,
  pub contact_info:  Option<String>,
  pub category:      Option<String>,
  pub location:      Option<String>,
}

impl FundraiserForm {
  const FIELDS: &'static [&'static str] = &[
    "title",
    "description",
    "target_amount",
    "organizer",
    "hospital",
  ];

  fn cleaned(self) -> Self {
    Self {
      title:         clean(self.title),
      description:   clean(self.description),
      target_amount: finite(self.target_amount),
      organizer:     clean(self.organizer),
      hospital:      clean(self.hospital),
      contact_info:  clean(self.contact_info),
      category:      clean(self.category),
      location:      clean(self.location),
    }
  }

  pub fn validate(self) -> Result<NewFundraiser, ValidationErrors> {
    let form = self.cleaned();
    Validate::validate(&form).map_err(|e| ValidationErrors::from_report(Self::FIELDS, &e))?;

    Ok(NewFundraiser {
      title:         present("title", form.title)?,
      description:   present("description", form.description)?,
      target_amount: present("target_amount", form.target_amount)?,
      organizer:     present("organizer", form.organizer)?,
      contact_info:  form.contact_info.unwrap_or_default(),
      category:      form.category,
      hospital:      present("hospital", form.hospital)?,
      location:      form.location.unwrap_or_default(),
    })
  }
}
