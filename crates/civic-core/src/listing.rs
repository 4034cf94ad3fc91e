//! The listing pipeline shared by every request view.
//!
//! A view hands [`apply`] a borrowed slice of records and a [`ListingQuery`];
//! it gets back a new, ordered sequence of references. The input is never
//! touched, so the same seed slice can back any number of concurrent views.
//!
//! Predicates (free-text search and one exact-match filter per [`Facet`]) are
//! combined with logical AND, which makes their order irrelevant. Ordering is
//! a stable sort, so records of equal rank keep their input order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

// ─── Facets ──────────────────────────────────────────────────────────────────

/// A categorical field that can be narrowed by exact match.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
  Status,
  /// Complaint priority or blood/fundraiser urgency.
  Priority,
  BloodType,
  Category,
}

/// The catch-all filter value; equivalent to not filtering at all.
pub const ALL: &str = "all";

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// Fixed ranking for priority and urgency labels. Higher sorts first.
pub const PRIORITY_RANKS: &[(&str, u8)] = &[
  ("critical", 3),
  ("urgent", 2),
  ("high", 2),
  ("normal", 1),
  ("medium", 1),
  ("low", 0),
];

/// Look up the rank of a priority label. Labels missing from
/// [`PRIORITY_RANKS`] return `None`, which orders below every listed level.
pub fn priority_rank(label: &str) -> Option<u8> {
  PRIORITY_RANKS
    .iter()
    .find(|(known, _)| *known == label)
    .map(|(_, rank)| *rank)
}

// ─── Listable ────────────────────────────────────────────────────────────────

/// The shape every complaint-like or donation-like record exposes to the
/// pipeline.
pub trait Listable {
  fn id(&self) -> Uuid;

  /// The fixed, type-specific subset of text fields searched by
  /// [`ListingQuery::search`].
  fn search_fields(&self) -> Vec<&str>;

  /// The value of `facet` for this record, or `None` if the record type has
  /// no such field.
  fn facet(&self, facet: Facet) -> Option<&str>;

  /// Priority or urgency label, used only for ordering.
  fn priority_label(&self) -> Option<&str>;

  fn created_at(&self) -> DateTime<Utc>;
}

impl<T: Listable + ?Sized> Listable for &T {
  fn id(&self) -> Uuid { (**self).id() }

  fn search_fields(&self) -> Vec<&str> { (**self).search_fields() }

  fn facet(&self, facet: Facet) -> Option<&str> { (**self).facet(facet) }

  fn priority_label(&self) -> Option<&str> { (**self).priority_label() }

  fn created_at(&self) -> DateTime<Utc> { (**self).created_at() }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// How the filtered records are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
  /// Descending [`priority_rank`]; the default for every request view.
  #[default]
  Priority,
  /// Most recently created first; used by the admin complaint view.
  Newest,
}

/// Parameters for [`apply`]. The default query keeps every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
  /// Case-insensitive substring matched against the search fields.
  pub search:  Option<String>,
  /// One exact-match value per facet. Empty strings and [`ALL`] are ignored.
  pub filters: BTreeMap<Facet, String>,
  pub order:   ListingOrder,
}

impl ListingQuery {
  pub fn new() -> Self { Self::default() }

  pub fn search(mut self, text: impl Into<String>) -> Self {
    self.search = Some(text.into());
    self
  }

  pub fn filter(mut self, facet: Facet, value: impl Into<String>) -> Self {
    self.filters.insert(facet, value.into());
    self
  }

  pub fn order(mut self, order: ListingOrder) -> Self {
    self.order = order;
    self
  }

  /// The filters that actually constrain the result.
  pub fn active_filters(&self) -> impl Iterator<Item = (Facet, &str)> {
    self
      .filters
      .iter()
      .map(|(facet, value)| (*facet, value.as_str()))
      .filter(|(_, value)| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
  }

  /// `true` when no search text and no active filter is set.
  pub fn is_unconstrained(&self) -> bool {
    self.needle().is_none() && self.active_filters().next().is_none()
  }

  /// The normalised search text, if any.
  fn needle(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
  }

  /// Whether `record` passes every active predicate of this query.
  pub fn matches<T: Listable + ?Sized>(&self, record: &T) -> bool {
    matches_search(record, self.needle().as_deref())
      && self
        .active_filters()
        .all(|(facet, value)| record.facet(facet) == Some(value))
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

fn matches_search<T: Listable + ?Sized>(record: &T, needle: Option<&str>) -> bool {
  let Some(needle) = needle else {
    return true;
  };
  record
    .search_fields()
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Narrow `records` by `query` and return the survivors in display order.
pub fn apply<'a, T: Listable>(
  records: &'a [T],
  query: &ListingQuery,
) -> Vec<&'a T> {
  let needle = query.needle();
  let filters: Vec<(Facet, &str)> = query.active_filters().collect();

  let mut selected: Vec<&T> = records
    .iter()
    .filter(|record| matches_search(*record, needle.as_deref()))
    .filter(|record| {
      filters
        .iter()
        .all(|(facet, value)| record.facet(*facet) == Some(*value))
    })
    .collect();

  // `sort_by` is stable: equal keys keep their input order.
  match query.order {
    ListingOrder::Priority => selected.sort_by(|a, b| rank(b).cmp(&rank(a))),
    ListingOrder::Newest => {
      selected.sort_by(|a, b| b.created_at().cmp(&a.created_at()))
    }
  }

  selected
}

fn rank<T: Listable + ?Sized>(record: &T) -> Option<u8> {
  record.priority_label().and_then(priority_rank)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use proptest::prelude::*;

  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Row {
    id:       Uuid,
    name:     String,
    place:    String,
    status:   &'static str,
    priority: Option<&'static str>,
    created:  DateTime<Utc>,
  }

  impl Listable for Row {
    fn id(&self) -> Uuid { self.id }

    fn search_fields(&self) -> Vec<&str> { vec![self.name.as_str(), self.place.as_str()] }

    fn facet(&self, facet: Facet) -> Option<&str> {
      match facet {
        Facet::Status => Some(self.status),
        Facet::Priority => self.priority,
        Facet::BloodType | Facet::Category => None,
      }
    }

    fn priority_label(&self) -> Option<&str> { self.priority }

    fn created_at(&self) -> DateTime<Utc> { self.created }
  }

  fn row(name: &str, status: &'static str, priority: Option<&'static str>) -> Row {
    Row {
      id: Uuid::new_v4(),
      name: name.into(),
      place: "Sector 15".into(),
      status,
      priority,
      created: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
    }
  }

  fn row_names(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.name.clone()).collect()
  }

  #[test]
  fn empty_input_gives_empty_output() {
    let rows: Vec<Row> = Vec::new();
    assert!(apply(&rows, &ListingQuery::new().search("x")).is_empty());
  }

  #[test]
  fn no_filters_sorts_by_priority_descending() {
    let rows = vec![
      row("low", "pending", Some("low")),
      row("critical", "pending", Some("critical")),
      row("normal", "pending", Some("normal")),
    ];
    let out = apply(&rows, &ListingQuery::new());
    assert_eq!(row_names(&out), ["critical", "normal", "low"]);
  }

  #[test]
  fn unranked_labels_sort_below_every_listed_level() {
    let rows = vec![
      row("mystery", "pending", Some("whenever")),
      row("none", "pending", None),
      row("low", "pending", Some("low")),
    ];
    let out = apply(&rows, &ListingQuery::new());
    assert_eq!(row_names(&out), ["low", "mystery", "none"]);
  }

  #[test]
  fn equal_ranks_keep_input_order() {
    let rows = vec![
      row("a", "pending", Some("high")),
      row("b", "pending", Some("urgent")),
      row("c", "pending", Some("critical")),
      row("d", "pending", Some("high")),
    ];
    let out = apply(&rows, &ListingQuery::new());
    assert_eq!(row_names(&out), ["c", "a", "b", "d"]);
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let rows = vec![
      row("Ravi Mehta", "pending", Some("critical")),
      row("Anita Singh", "pending", Some("urgent")),
    ];
    let out = apply(&rows, &ListingQuery::new().search("RAVI"));
    assert_eq!(row_names(&out), ["Ravi Mehta"]);

    let by_place = apply(&rows, &ListingQuery::new().search("sector"));
    assert_eq!(by_place.len(), 2);
  }

  #[test]
  fn blank_search_keeps_everything() {
    let rows = vec![row("a", "pending", None), row("b", "pending", None)];
    assert_eq!(apply(&rows, &ListingQuery::new().search("   ")).len(), 2);
    assert!(ListingQuery::new().search("").is_unconstrained());
  }

  #[test]
  fn all_sentinel_and_empty_filter_are_ignored() {
    let rows = vec![row("a", "pending", None), row("b", "resolved", None)];
    let q = ListingQuery::new()
      .filter(Facet::Status, "All")
      .filter(Facet::Priority, "");
    assert!(q.is_unconstrained());
    assert_eq!(apply(&rows, &q).len(), 2);
  }

  #[test]
  fn unknown_filter_value_matches_nothing() {
    let rows = vec![row("a", "pending", Some("critical"))];
    let q = ListingQuery::new().filter(Facet::Status, "Z+");
    assert!(apply(&rows, &q).is_empty());
  }

  #[test]
  fn filter_on_missing_facet_excludes_record() {
    let rows = vec![row("a", "pending", Some("critical"))];
    let q = ListingQuery::new().filter(Facet::BloodType, "O-");
    assert!(apply(&rows, &q).is_empty());
  }

  #[test]
  fn newest_order_uses_created_at() {
    let mut old = row("old", "pending", Some("critical"));
    old.created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let new = row("new", "pending", Some("low"));
    let rows = vec![old, new];
    let out = apply(&rows, &ListingQuery::new().order(ListingOrder::Newest));
    assert_eq!(row_names(&out), ["new", "old"]);
  }

  #[test]
  fn matches_agrees_with_apply() {
    let rows = vec![
      row("Ravi", "pending", Some("critical")),
      row("Ravi", "resolved", Some("low")),
    ];
    let q = ListingQuery::new()
      .search("ravi")
      .filter(Facet::Status, "resolved");
    assert!(!q.matches(&rows[0]));
    assert!(q.matches(&rows[1]));
    assert_eq!(apply(&rows, &q).len(), 1);
  }

  // ── Properties ────────────────────────────────────────────────────────────

  const STATUSES: [&str; 3] = ["pending", "verified", "resolved"];
  const PRIORITIES: [Option<&str>; 6] = [
    Some("low"),
    Some("medium"),
    Some("high"),
    Some("critical"),
    Some("unknown"),
    None,
  ];

  fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
      ("[a-c]{1,3}", 0..STATUSES.len(), 0..PRIORITIES.len()),
      0..24,
    )
    .prop_map(|specs| {
      specs
        .into_iter()
        .map(|(name, s, p)| row(&name, STATUSES[s], PRIORITIES[p]))
        .collect()
    })
  }

  proptest! {
    #[test]
    fn predicate_order_does_not_matter(
      rows in arb_rows(),
      needle in "[a-c]{0,2}",
      status in 0..STATUSES.len(),
    ) {
      let search = ListingQuery::new().search(needle.clone());
      let status = ListingQuery::new().filter(Facet::Status, STATUSES[status]);

      let searched = apply(&rows, &search);
      let search_first = apply(&searched, &status);
      let filtered = apply(&rows, &status);
      let status_first = apply(&filtered, &search);

      let a: Vec<Uuid> = search_first.iter().map(|r| r.id()).collect();
      let b: Vec<Uuid> = status_first.iter().map(|r| r.id()).collect();
      prop_assert_eq!(a, b);
    }

    #[test]
    fn output_is_ranked_and_stable(rows in arb_rows()) {
      let out = apply(&rows, &ListingQuery::new());
      prop_assert_eq!(out.len(), rows.len());

      let position = |r: &Row| rows.iter().position(|x| x.id == r.id).unwrap();
      for pair in out.windows(2) {
        let (a, b) = (rank(pair[0]), rank(pair[1]));
        prop_assert!(a >= b);
        if a == b {
          prop_assert!(position(pair[0]) < position(pair[1]));
        }
      }
    }

    #[test]
    fn input_is_never_mutated(rows in arb_rows(), needle in "[a-c]{0,2}") {
      let before = rows.clone();
      let _ = apply(&rows, &ListingQuery::new().search(needle));
      prop_assert_eq!(before, rows);
    }
  }
}
