//! Dashboard statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  complaint::{Complaint, ComplaintStatus},
  donation::BloodRequest,
  fundraiser::Fundraiser,
};

/// Headline counts for the admin dashboard, as of one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total_issues:          usize,
  pub pending_issues:        usize,
  pub resolved_issues:       usize,
  pub active_blood_requests: usize,
  pub active_fundraisers:    usize,
}

impl DashboardStats {
  pub fn compute(
    complaints: &[Complaint],
    blood_requests: &[BloodRequest],
    fundraisers: &[Fundraiser],
    now: DateTime<Utc>,
  ) -> Self {
    let with_status =
      |s: ComplaintStatus| complaints.iter().filter(|c| c.status == s).count();

    Self {
      total_issues:          complaints.len(),
      pending_issues:        with_status(ComplaintStatus::Pending),
      resolved_issues:       with_status(ComplaintStatus::Resolved),
      active_blood_requests: blood_requests
        .iter()
        .filter(|r| r.is_active(now))
        .count(),
      active_fundraisers:    fundraisers
        .iter()
        .filter(|f| f.is_active(now))
        .count(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed;

  #[test]
  fn counts_seed_data_mid_january() {
    let now = seed::at(2024, 1, 16, 0, 0, 0);
    let stats = DashboardStats::compute(
      &seed::complaints(),
      &seed::blood_requests(),
      &seed::fundraisers(),
      now,
    );
    assert_eq!(stats, DashboardStats {
      total_issues:          3,
      pending_issues:        1,
      resolved_issues:       1,
      active_blood_requests: 3,
      active_fundraisers:    2,
    });
  }

  #[test]
  fn expired_records_are_not_active() {
    let now = seed::at(2024, 2, 1, 0, 0, 0);
    let stats =
      DashboardStats::compute(&[], &seed::blood_requests(), &seed::fundraisers(), now);
    assert_eq!(stats.active_blood_requests, 0);
    // Only the Rajesh campaign runs into February.
    assert_eq!(stats.active_fundraisers, 1);
  }
}
