//! Sample records loaded at start-up.
//!
//! Ids are fixed so links and tests stay stable across restarts.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  complaint::{Complaint, ComplaintStatus, IssueCategory, Priority},
  donation::{BloodRequest, BloodType, Urgency},
  emergency::Coordinates,
  fundraiser::Fundraiser,
};

/// A UTC instant from calendar fields. Out-of-range input yields the epoch.
pub fn at(
  year: i32,
  month: u32,
  day: u32,
  hour: u32,
  min: u32,
  sec: u32,
) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, hour, min, sec)
    .single()
    .unwrap_or_default()
}

pub const fn complaint_id(n: u128) -> Uuid { Uuid::from_u128(0x1000 + n) }
pub const fn blood_request_id(n: u128) -> Uuid { Uuid::from_u128(0x2000 + n) }
pub const fn fundraiser_id(n: u128) -> Uuid { Uuid::from_u128(0x3000 + n) }

fn images(urls: &[&str]) -> Vec<String> {
  urls.iter().map(|u| (*u).to_owned()).collect()
}

pub fn complaints() -> Vec<Complaint> {
  vec![
    Complaint {
      complaint_id: complaint_id(1),
      title:        "Garbage overflow near Central Park".into(),
      description:  "Large amounts of garbage have been accumulating near \
                     the Central Park entrance for over a week. The smell is \
                     becoming unbearable and attracting stray animals. \
                     Multiple bins are overflowing and need immediate \
                     attention."
        .into(),
      location:     "Central Park Entrance, Sector 15".into(),
      coordinates:  Some(Coordinates::new(28.5355, 77.3910)),
      reported_by:  "Rahul Sharma".into(),
      contact_info: "+91 9876543210".into(),
      status:       ComplaintStatus::Pending,
      priority:     Priority::High,
      category:     IssueCategory::Garbage,
      images:       images(&[
        "https://images.unsplash.com/photo-1530587191325-3db32d826c18?w=400",
        "https://images.unsplash.com/photo-1604187351574-c75ca79f5807?w=400",
      ]),
      created_at:   at(2024, 1, 15, 10, 30, 0),
      updated_at:   at(2024, 1, 15, 10, 30, 0),
    },
    Complaint {
      complaint_id: complaint_id(2),
      title:        "Water pipe leak on MG Road".into(),
      description:  "Major water pipe has burst on MG Road causing \
                     significant water logging and traffic disruption. The \
                     leak has been ongoing since yesterday morning and is \
                     affecting nearby shops and residences."
        .into(),
      location:     "MG Road, near Metro Station".into(),
      coordinates:  Some(Coordinates::new(28.5421, 77.3931)),
      reported_by:  "Priya Patel".into(),
      contact_info: "+91 9876543211".into(),
      status:       ComplaintStatus::Verified,
      priority:     Priority::Critical,
      category:     IssueCategory::Water,
      images:       images(&[
        "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=400",
      ]),
      created_at:   at(2024, 1, 14, 8, 15, 0),
      updated_at:   at(2024, 1, 15, 9, 20, 0),
    },
    Complaint {
      complaint_id: complaint_id(3),
      title:        "Broken streetlight creating safety hazard".into(),
      description:  "The streetlight at the corner of residential block B \
                     has been non-functional for over two weeks. This is \
                     creating a safety concern for residents, especially \
                     women and elderly people walking in the evening."
        .into(),
      location:     "Block B, Residential Area".into(),
      coordinates:  Some(Coordinates::new(28.5389, 77.3889)),
      reported_by:  "Amit Kumar".into(),
      contact_info: "+91 9876543212".into(),
      status:       ComplaintStatus::Resolved,
      priority:     Priority::Medium,
      category:     IssueCategory::Infrastructure,
      images:       Vec::new(),
      created_at:   at(2024, 1, 10, 19, 45, 0),
      updated_at:   at(2024, 1, 14, 14, 30, 0),
    },
  ]
}

pub fn blood_requests() -> Vec<BloodRequest> {
  vec![
    BloodRequest {
      request_id:      blood_request_id(1),
      patient_name:    "Ravi Mehta".into(),
      blood_type:      BloodType::ONegative,
      urgency:         Urgency::Critical,
      hospital:        "AIIMS Delhi".into(),
      location:        "Ansari Nagar, New Delhi".into(),
      coordinates:     Some(Coordinates::new(28.5672, 77.2100)),
      contact_person:  "Dr. Sarah Johnson".into(),
      contact_phone:   "+91 9876543220".into(),
      units_needed:    4,
      units_collected: 1,
      required_by:     at(2024, 1, 16, 12, 0, 0),
      description:     "Patient requires urgent O- blood for emergency \
                        surgery following a car accident. Any help would be \
                        greatly appreciated by the family."
        .into(),
      created_at:      at(2024, 1, 15, 14, 20, 0),
    },
    BloodRequest {
      request_id:      blood_request_id(2),
      patient_name:    "Anita Singh".into(),
      blood_type:      BloodType::APositive,
      urgency:         Urgency::Urgent,
      hospital:        "Fortis Hospital".into(),
      location:        "Sector 62, Noida".into(),
      coordinates:     Some(Coordinates::new(28.6139, 77.3678)),
      contact_person:  "Suresh Singh".into(),
      contact_phone:   "+91 9876543221".into(),
      units_needed:    2,
      units_collected: 0,
      required_by:     at(2024, 1, 17, 10, 0, 0),
      description:     "My mother needs A+ blood for her cancer treatment. We \
                        are looking for voluntary donors who can help during \
                        this difficult time."
        .into(),
      created_at:      at(2024, 1, 15, 11, 45, 0),
    },
    BloodRequest {
      request_id:      blood_request_id(3),
      patient_name:    "Child Patient".into(),
      blood_type:      BloodType::BPositive,
      urgency:         Urgency::Normal,
      hospital:        "Max Hospital".into(),
      location:        "Saket, New Delhi".into(),
      coordinates:     Some(Coordinates::new(28.5244, 77.2066)),
      contact_person:  "Dr. Rajesh Kumar".into(),
      contact_phone:   "+91 9876543222".into(),
      units_needed:    1,
      units_collected: 0,
      required_by:     at(2024, 1, 20, 15, 0, 0),
      description:     "Young patient requires B+ blood for scheduled \
                        surgery. The family is requesting community support \
                        for this medical procedure."
        .into(),
      created_at:      at(2024, 1, 15, 9, 30, 0),
    },
  ]
}

pub fn fundraisers() -> Vec<Fundraiser> {
  vec![
    Fundraiser {
      fundraiser_id: fundraiser_id(1),
      title:         "Help Rajesh Fight Cancer".into(),
      description:   "Rajesh, a 45-year-old auto driver, has been diagnosed \
                      with stage 3 cancer. He needs urgent financial support \
                      for his treatment including chemotherapy and surgery."
        .into(),
      target_amount: 500_000.0,
      raised_amount: 125_000.0,
      organizer:     "Meera Rajesh".into(),
      contact_info:  "+91 9876543230".into(),
      category:      "medical".into(),
      urgency:       Urgency::Critical,
      hospital:      "Tata Memorial Hospital".into(),
      location:      "Mumbai, Maharashtra".into(),
      images:        images(&[
        "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=400",
      ]),
      end_date:      at(2024, 2, 15, 23, 59, 59),
      created_at:    at(2024, 1, 10, 12, 0, 0),
    },
    Fundraiser {
      fundraiser_id: fundraiser_id(2),
      title:         "Save Little Arya's Life".into(),
      description:   "3-year-old Arya needs a heart surgery that costs 8 \
                      lakhs. Her family cannot afford the expensive \
                      treatment. Please help save this innocent life."
        .into(),
      target_amount: 800_000.0,
      raised_amount: 245_000.0,
      organizer:     "Children's Welfare Society".into(),
      contact_info:  "+91 9876543231".into(),
      category:      "medical".into(),
      urgency:       Urgency::Critical,
      hospital:      "Fortis Escorts Heart Institute".into(),
      location:      "New Delhi".into(),
      images:        images(&[
        "https://images.unsplash.com/photo-1581833971358-2c8b550f87b3?w=400",
      ]),
      end_date:      at(2024, 1, 30, 23, 59, 59),
      created_at:    at(2024, 1, 12, 15, 30, 0),
    },
  ]
}
