//! Per-screen listing state: search text, facet choices and the cursor.

use civic_core::listing::{self, ALL, Facet, Listable, ListingOrder, ListingQuery};

/// A facet the user can cycle through, with its possible values.
#[derive(Debug, Clone)]
struct FacetChoice {
  facet:   Facet,
  options: Vec<String>,
}

/// State behind one list screen.
#[derive(Debug, Clone)]
pub struct ListView {
  pub query:     ListingQuery,
  /// Whether `/` search input is capturing keys.
  pub searching: bool,
  pub cursor:    usize,
  choices:       Vec<FacetChoice>,
}

impl ListView {
  pub fn new(order: ListingOrder) -> Self {
    Self {
      query:     ListingQuery::new().order(order),
      searching: false,
      cursor:    0,
      choices:   Vec::new(),
    }
  }

  /// Make `facet` cyclable through `options` (plus the `all` sentinel).
  pub fn with_facet<I, S>(mut self, facet: Facet, options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: ToString,
  {
    self.choices.push(FacetChoice {
      facet,
      options: options.into_iter().map(|o| o.to_string()).collect(),
    });
    self
  }

  /// The records this view shows, in display order.
  pub fn visible<'a, T: Listable>(&self, records: &'a [T]) -> Vec<&'a T> {
    listing::apply(records, &self.query)
  }

  /// Current value for `facet`, `all` when unconstrained.
  pub fn facet_value(&self, facet: Facet) -> &str {
    self
      .query
      .filters
      .get(&facet)
      .map(String::as_str)
      .unwrap_or(ALL)
  }

  /// Facets this view offers, with their current values.
  pub fn facet_summary(&self) -> Vec<(Facet, &str)> {
    self
      .choices
      .iter()
      .map(|c| (c.facet, self.facet_value(c.facet)))
      .collect()
  }

  /// Advance `facet` to its next value, wrapping back to `all`.
  pub fn cycle_facet(&mut self, facet: Facet) {
    let Some(choice) = self.choices.iter().find(|c| c.facet == facet) else {
      return;
    };
    let current = self.facet_value(facet);
    let next = match choice.options.iter().position(|o| o == current) {
      Some(i) if i + 1 < choice.options.len() => choice.options[i + 1].clone(),
      Some(_) => ALL.to_owned(),
      None => choice.options.first().cloned().unwrap_or_else(|| ALL.to_owned()),
    };
    self.query.filters.insert(facet, next);
    self.cursor = 0;
  }

  // ── Search input ──────────────────────────────────────────────────────────

  pub fn start_search(&mut self) {
    self.searching = true;
    self.query.search = Some(String::new());
    self.cursor = 0;
  }

  pub fn search_text(&self) -> &str { self.query.search.as_deref().unwrap_or("") }

  pub fn push_search(&mut self, c: char) {
    self.query.search.get_or_insert_with(String::new).push(c);
    self.cursor = 0;
  }

  pub fn pop_search(&mut self) {
    if let Some(s) = self.query.search.as_mut() {
      s.pop();
    }
    self.cursor = 0;
  }

  /// Leave search input, keeping the text as a filter.
  pub fn accept_search(&mut self) { self.searching = false; }

  /// Leave search input and drop the text.
  pub fn cancel_search(&mut self) {
    self.searching = false;
    self.query.search = None;
    self.cursor = 0;
  }

  // ── Cursor ────────────────────────────────────────────────────────────────

  pub fn down(&mut self, len: usize) {
    if self.cursor + 1 < len {
      self.cursor += 1;
    }
  }

  pub fn up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  /// Keep the cursor inside a list that may have shrunk.
  pub fn clamp(&mut self, len: usize) {
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  /// The record under the cursor.
  pub fn selected<'a, T: Listable>(&self, records: &'a [T]) -> Option<&'a T> {
    self.visible(records).get(self.cursor).copied()
  }
}

#[cfg(test)]
mod tests {
  use civic_core::{donation::BloodType, seed};
  use strum::IntoEnumIterator;

  use super::*;

  fn blood_view() -> ListView {
    ListView::new(ListingOrder::Priority)
      .with_facet(Facet::BloodType, BloodType::iter())
      .with_facet(Facet::Priority, ["critical", "urgent", "normal"])
  }

  #[test]
  fn facet_cycles_through_options_and_back_to_all() {
    let mut view = ListView::new(ListingOrder::Priority)
      .with_facet(Facet::Priority, ["critical", "urgent"]);
    assert_eq!(view.facet_value(Facet::Priority), "all");
    view.cycle_facet(Facet::Priority);
    assert_eq!(view.facet_value(Facet::Priority), "critical");
    view.cycle_facet(Facet::Priority);
    assert_eq!(view.facet_value(Facet::Priority), "urgent");
    view.cycle_facet(Facet::Priority);
    assert_eq!(view.facet_value(Facet::Priority), "all");
  }

  #[test]
  fn cycling_an_unoffered_facet_does_nothing() {
    let mut view = blood_view();
    view.cycle_facet(Facet::Status);
    assert!(view.query.is_unconstrained());
  }

  #[test]
  fn search_narrows_and_cancel_restores() {
    let records = seed::blood_requests();
    let mut view = blood_view();
    view.start_search();
    for c in "ravi".chars() {
      view.push_search(c);
    }
    assert_eq!(view.visible(&records).len(), 1);
    view.accept_search();
    assert!(!view.searching);
    assert_eq!(view.search_text(), "ravi");

    view.cancel_search();
    assert_eq!(view.visible(&records).len(), 3);
  }

  #[test]
  fn blood_type_filter_uses_conventional_notation() {
    let records = seed::blood_requests();
    let mut view = blood_view();
    view.cycle_facet(Facet::BloodType);
    assert_eq!(view.facet_value(Facet::BloodType), "A+");
    let visible = view.visible(&records);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].patient_name, "Anita Singh");
  }

  #[test]
  fn cursor_stays_in_bounds() {
    let records = seed::blood_requests();
    let mut view = blood_view();
    for _ in 0..10 {
      view.down(records.len());
    }
    assert_eq!(view.cursor, 2);
    assert_eq!(
      view.selected(&records).map(|r| r.patient_name.as_str()),
      Some("Child Patient")
    );
    view.clamp(1);
    assert_eq!(view.cursor, 0);
    view.up();
    assert_eq!(view.cursor, 0);
  }
}
