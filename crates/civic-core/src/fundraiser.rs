//! Medical fundraising campaigns.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  donation::Urgency,
  listing::{Facet, Listable},
};

/// Days a new campaign stays open.
pub const DEFAULT_CAMPAIGN_DAYS: i64 = 30;

/// Category assigned to campaigns created without one.
pub const DEFAULT_CATEGORY: &str = "medical";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundraiser {
  pub fundraiser_id: Uuid,
  pub title:         String,
  pub description:   String,
  pub target_amount: f64,
  pub raised_amount: f64,
  pub organizer:     String,
  pub contact_info:  String,
  pub category:      String,
  pub urgency:       Urgency,
  pub hospital:      String,
  pub location:      String,
  pub images:        Vec<String>,
  pub end_date:      DateTime<Utc>,
  pub created_at:    DateTime<Utc>,
}

impl Fundraiser {
  /// Fraction of the target raised, capped at `1.0`.
  pub fn progress(&self) -> f64 {
    if self.target_amount <= 0.0 {
      return 1.0;
    }
    (self.raised_amount / self.target_amount).min(1.0)
  }

  /// Amount still needed; zero once the goal is met.
  pub fn remaining(&self) -> f64 {
    (self.target_amount - self.raised_amount).max(0.0)
  }

  pub fn goal_reached(&self) -> bool { self.raised_amount >= self.target_amount }

  pub fn is_active(&self, now: DateTime<Utc>) -> bool { self.end_date > now }

  /// Add a pledge to the campaign.
  ///
  /// Returns an error if `amount` is not positive or if the campaign has
  /// already reached its goal.
  pub fn pledge(&mut self, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
      return Err(Error::InvalidAmount(amount));
    }
    if self.goal_reached() {
      return Err(Error::GoalReached(self.fundraiser_id));
    }
    self.raised_amount += amount;
    Ok(())
  }
}

/// Validated input for a new campaign; see
/// [`crate::validation::FundraiserForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewFundraiser {
  pub title:         String,
  pub description:   String,
  pub target_amount: f64,
  pub organizer:     String,
  pub contact_info:  String,
  pub category:      Option<String>,
  pub hospital:      String,
  pub location:      String,
}

impl NewFundraiser {
  /// Materialise the campaign: nothing raised, `normal` urgency, open for
  /// [`DEFAULT_CAMPAIGN_DAYS`].
  pub fn into_fundraiser(self, now: DateTime<Utc>) -> Fundraiser {
    Fundraiser {
      fundraiser_id: Uuid::new_v4(),
      title:         self.title,
      description:   self.description,
      target_amount: self.target_amount,
      raised_amount: 0.0,
      organizer:     self.organizer,
      contact_info:  self.contact_info,
      category:      self
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
      urgency:       Urgency::Normal,
      hospital:      self.hospital,
      location:      self.location,
      images:        Vec::new(),
      end_date:      now + Duration::days(DEFAULT_CAMPAIGN_DAYS),
      created_at:    now,
    }
  }
}

impl Listable for Fundraiser {
  fn id(&self) -> Uuid { self.fundraiser_id }

  fn search_fields(&self) -> Vec<&str> {
    vec![&self.title, &self.organizer, &self.hospital, &self.location]
      .into_iter()
      .map(String::as_str)
      .collect()
  }

  fn facet(&self, facet: Facet) -> Option<&str> {
    match facet {
      Facet::Category => Some(&self.category),
      Facet::Priority => Some(self.urgency.as_ref()),
      Facet::Status | Facet::BloodType => None,
    }
  }

  fn priority_label(&self) -> Option<&str> { Some(self.urgency.as_ref()) }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }
}
