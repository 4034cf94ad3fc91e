//! Editable creation forms.
//!
//! A [`FormState`] is a list of labelled fields edited as text. On submit the
//! values are assembled into the matching `civic_core::validation` form and
//! checked with the same rules the server applies, so field errors show up
//! before anything is sent.

use civic_core::{
  complaint::{IssueCategory, Priority},
  donation::{BloodType, Urgency},
  validation::{
    BloodRequestForm, FieldError, FundraiserForm, IssueReportForm,
    ValidationErrors,
  },
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Number,
  /// One of a fixed set; changed with left/right rather than typed.
  Choice(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FormField {
  pub key:   &'static str,
  pub label: &'static str,
  pub kind:  FieldKind,
  pub value: String,
}

impl FormField {
  fn text(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      kind: FieldKind::Text,
      value: String::new(),
    }
  }

  fn number(key: &'static str, label: &'static str) -> Self {
    Self {
      kind: FieldKind::Number,
      ..Self::text(key, label)
    }
  }

  fn choice<I, S>(key: &'static str, label: &'static str, options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: ToString,
  {
    Self {
      kind: FieldKind::Choice(options.into_iter().map(|o| o.to_string()).collect()),
      ..Self::text(key, label)
    }
  }
}

#[derive(Debug, Clone)]
pub struct FormState {
  pub title:  &'static str,
  pub fields: Vec<FormField>,
  pub cursor: usize,
  pub errors: Option<ValidationErrors>,
}

impl FormState {
  fn new(title: &'static str, fields: Vec<FormField>) -> Self {
    Self {
      title,
      fields,
      cursor: 0,
      errors: None,
    }
  }

  pub fn issue_report() -> Self {
    Self::new("Report an Issue", vec![
      FormField::text("title", "Title"),
      FormField::text("description", "Description"),
      FormField::choice("category", "Category", IssueCategory::iter()),
      FormField::choice("priority", "Priority", Priority::iter()),
      FormField::text("location", "Location"),
      FormField::text("contact_info", "Contact"),
    ])
  }

  pub fn blood_request() -> Self {
    Self::new("New Blood Request", vec![
      FormField::text("patient_name", "Patient name"),
      FormField::choice("blood_type", "Blood type", BloodType::iter()),
      FormField::text("hospital", "Hospital"),
      FormField::choice("urgency", "Urgency", Urgency::iter()),
      FormField::number("units_needed", "Units needed"),
      FormField::text("contact_phone", "Contact phone"),
      FormField::text("contact_person", "Contact person"),
      FormField::text("location", "Location"),
      FormField::text("description", "Description"),
    ])
  }

  pub fn fundraiser() -> Self {
    Self::new("Start a Fundraiser", vec![
      FormField::text("title", "Title"),
      FormField::text("description", "Description"),
      FormField::number("target_amount", "Target amount"),
      FormField::text("organizer", "Organizer"),
      FormField::text("hospital", "Hospital"),
      FormField::text("contact_info", "Contact"),
      FormField::text("location", "Location"),
    ])
  }

  /// A one-field form for a donation amount.
  pub fn donation() -> Self {
    Self::new("Donate", vec![FormField::number("amount", "Amount")])
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn next(&mut self) { self.cursor = (self.cursor + 1) % self.fields.len().max(1); }

  pub fn prev(&mut self) {
    let len = self.fields.len().max(1);
    self.cursor = (self.cursor + len - 1) % len;
  }

  pub fn current(&self) -> Option<&FormField> { self.fields.get(self.cursor) }

  /// Type a character into the current field. Ignored on choice fields.
  pub fn input(&mut self, c: char) {
    if let Some(field) = self.fields.get_mut(self.cursor)
      && !matches!(field.kind, FieldKind::Choice(_))
    {
      field.value.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if let Some(field) = self.fields.get_mut(self.cursor)
      && !matches!(field.kind, FieldKind::Choice(_))
    {
      field.value.pop();
    }
  }

  /// Step a choice field forward or back through its options.
  pub fn cycle(&mut self, forward: bool) {
    let Some(field) = self.fields.get_mut(self.cursor) else {
      return;
    };
    let FieldKind::Choice(options) = &field.kind else {
      return;
    };
    if options.is_empty() {
      return;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == field.value) {
      Some(i) if forward => (i + 1) % len,
      Some(i) => (i + len - 1) % len,
      None if forward => 0,
      None => len - 1,
    };
    field.value = options[next].clone();
  }

  /// The error message for `key`, if the last check flagged it.
  pub fn error_for(&self, key: &str) -> Option<&str> {
    self.errors.as_ref().and_then(|e| e.message_for(key))
  }

  pub fn value(&self, key: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|f| f.key == key)
      .map(|f| f.value.as_str())
  }

  // ── Checking ──────────────────────────────────────────────────────────────

  /// Assemble the raw form. Numeric fields that do not parse are reported
  /// as field errors.
  fn assemble<T: DeserializeOwned>(&self) -> Result<T, ValidationErrors> {
    let mut map = Map::new();
    let mut errors = ValidationErrors::default();
    for field in &self.fields {
      let value = field.value.trim();
      if value.is_empty() {
        continue;
      }
      let json = match field.kind {
        FieldKind::Number => match value.parse::<f64>() {
          Ok(n) => serde_json::Number::from_f64(n).map(Value::Number),
          Err(_) => None,
        },
        _ => Some(Value::String(value.to_owned())),
      };
      match json {
        Some(json) => {
          map.insert(field.key.to_owned(), json);
        }
        None => errors.fields.push(FieldError {
          field:   field.key,
          message: "Must be a number".to_owned(),
        }),
      }
    }
    if !errors.fields.is_empty() {
      return Err(errors);
    }
    serde_json::from_value(Value::Object(map)).map_err(|e| ValidationErrors {
      fields: vec![FieldError {
        field:   "form",
        message: e.to_string(),
      }],
    })
  }

  /// Assemble and validate. On success returns the raw form ready to send
  /// and clears any earlier errors; otherwise records the errors.
  fn check<T, N>(
    &mut self,
    validate: impl FnOnce(T) -> Result<N, ValidationErrors>,
  ) -> Option<T>
  where
    T: DeserializeOwned + Clone,
  {
    let outcome = self
      .assemble::<T>()
      .and_then(|raw| validate(raw.clone()).map(|_| raw));
    match outcome {
      Ok(raw) => {
        self.errors = None;
        Some(raw)
      }
      Err(errors) => {
        self.errors = Some(errors);
        None
      }
    }
  }

  pub fn issue_report_form(&mut self) -> Option<IssueReportForm> {
    self.check(IssueReportForm::validate)
  }

  pub fn blood_request_form(&mut self) -> Option<BloodRequestForm> {
    self.check(BloodRequestForm::validate)
  }

  pub fn fundraiser_form(&mut self) -> Option<FundraiserForm> {
    self.check(FundraiserForm::validate)
  }

  /// The donation amount, if it is a positive number.
  pub fn donation_amount(&mut self) -> Option<f64> {
    let amount = self
      .value("amount")
      .and_then(|v| v.trim().parse::<f64>().ok())
      .filter(|a| a.is_finite() && *a > 0.0);
    self.errors = match amount {
      Some(_) => None,
      None => Some(ValidationErrors {
        fields: vec![FieldError {
          field:   "amount",
          message: "Amount must be positive".to_owned(),
        }],
      }),
    };
    amount
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn type_into(form: &mut FormState, text: &str) {
    for c in text.chars() {
      form.input(c);
    }
  }

  #[test]
  fn empty_issue_report_flags_required_fields() {
    let mut form = FormState::issue_report();
    assert!(form.issue_report_form().is_none());
    assert_eq!(form.error_for("title"), Some("Title is required"));
    assert_eq!(form.error_for("category"), Some("Category is required"));
  }

  #[test]
  fn filled_issue_report_passes() {
    let mut form = FormState::issue_report();
    type_into(&mut form, "Broken water main on Ring Road");
    form.next();
    type_into(&mut form, "Water has been gushing onto the road since morning.");
    form.next();
    form.cycle(true); // garbage
    form.cycle(true); // water
    form.next();
    form.cycle(false); // critical
    form.next();
    type_into(&mut form, "Ring Road, Lajpat Nagar");
    form.next();
    type_into(&mut form, "+91 9876500003");

    let raw = form.issue_report_form().unwrap();
    assert_eq!(raw.category.as_deref(), Some("water"));
    assert_eq!(raw.priority.as_deref(), Some("critical"));
    assert!(form.errors.is_none());
  }

  #[test]
  fn typing_into_choice_is_ignored() {
    let mut form = FormState::issue_report();
    form.cursor = 2;
    form.input('x');
    assert_eq!(form.value("category"), Some(""));
  }

  #[test]
  fn non_numeric_units_are_reported() {
    let mut form = FormState::blood_request();
    form.cursor = 4;
    type_into(&mut form, "two");
    assert!(form.blood_request_form().is_none());
    assert_eq!(form.error_for("units_needed"), Some("Must be a number"));
  }

  #[test]
  fn cursor_wraps() {
    let mut form = FormState::fundraiser();
    form.prev();
    assert_eq!(form.current().map(|f| f.key), Some("location"));
    form.next();
    assert_eq!(form.current().map(|f| f.key), Some("title"));
  }

  #[test]
  fn donation_amount_must_be_positive() {
    let mut form = FormState::donation();
    type_into(&mut form, "-5");
    assert_eq!(form.donation_amount(), None);
    assert_eq!(form.error_for("amount"), Some("Amount must be positive"));

    form.backspace();
    form.backspace();
    type_into(&mut form, "500");
    assert_eq!(form.donation_amount(), Some(500.0));
    assert!(form.errors.is_none());
  }
}
