//! Query-string parameters shared by the listing endpoints.

use civic_core::listing::{Facet, ListingOrder, ListingQuery};
use serde::Deserialize;

/// `?search=&status=&priority=&urgency=&blood_type=&category=&order=`
///
/// Every field is optional; `all` or an empty value leaves a facet
/// unconstrained. `priority` and `urgency` address the same facet, with
/// `priority` taking precedence. A `+` in `blood_type` must be sent
/// percent-encoded (`A%2B`).
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search:     Option<String>,
  pub status:     Option<String>,
  pub priority:   Option<String>,
  pub urgency:    Option<String>,
  pub blood_type: Option<String>,
  pub category:   Option<String>,
  pub order:      Option<ListingOrder>,
}

impl From<ListParams> for ListingQuery {
  fn from(p: ListParams) -> Self {
    let mut query = ListingQuery::new().order(p.order.unwrap_or_default());
    query.search = p.search;
    let facets = [
      (Facet::Status, p.status),
      (Facet::Priority, p.priority.or(p.urgency)),
      (Facet::BloodType, p.blood_type),
      (Facet::Category, p.category),
    ];
    for (facet, value) in facets {
      if let Some(value) = value {
        query = query.filter(facet, value);
      }
    }
    query
  }
}
