//! Router tests against a seeded in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::Utc;
use civic_core::{
  emergency::{EmergencyRequest, LocationFix},
  seed,
};
use civic_store_memory::MemoryStore;
use futures::StreamExt as _;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn call(
  store: &Arc<MemoryStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = api_router(store.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn store() -> Arc<MemoryStore> { Arc::new(MemoryStore::seeded()) }

// ── Complaints ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_complaints_sorted_by_priority() {
  let s = store();
  let (status, body) = call(&s, "GET", "/complaints", None).await;
  assert_eq!(status, StatusCode::OK);
  let priorities: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["priority"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(priorities, ["critical", "high", "medium"]);
}

#[tokio::test]
async fn list_complaints_with_filters() {
  let s = store();
  let (_, body) = call(&s, "GET", "/complaints?status=all&category=water", None).await;
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["reported_by"], "Priya Patel");

  let (_, body) = call(&s, "GET", "/complaints?search=CENTRAL%20park", None).await;
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_complaint_returns_201() {
  let s = store();
  let form = json!({
    "title": "Open manhole near the market",
    "description": "An uncovered manhole is a danger to pedestrians at night.",
    "category": "roads",
    "priority": "critical",
    "location": "Main Market, Sector 18",
    "contact_info": "+91 9876500002",
  });
  let (status, body) = call(&s, "POST", "/complaints", Some(form)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "pending");
  assert_eq!(body["reported_by"], "Current User");

  let id = body["complaint_id"].as_str().unwrap();
  let (status, fetched) = call(&s, "GET", &format!("/complaints/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["title"], "Open manhole near the market");
}

#[tokio::test]
async fn invalid_complaint_returns_422_with_fields() {
  let s = store();
  let form = json!({ "title": "Short", "category": "roads" });
  let (status, body) = call(&s, "POST", "/complaints", Some(form)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "validation failed");
  let fields: Vec<_> = body["fields"]
    .as_array()
    .unwrap()
    .iter()
    .map(|f| f["field"].as_str().unwrap())
    .collect();
  assert_eq!(fields, [
    "title",
    "description",
    "priority",
    "location",
    "contact_info"
  ]);
}

#[tokio::test]
async fn get_missing_complaint_returns_404() {
  let s = store();
  let uri = format!("/complaints/{}", uuid::Uuid::new_v4());
  let (status, body) = call(&s, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn set_status_updates_complaint() {
  let s = store();
  let uri = format!("/complaints/{}/status", seed::complaint_id(1));
  let (status, body) =
    call(&s, "POST", &uri, Some(json!({ "status": "resolved" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "resolved");

  let uri = format!("/complaints/{}/status", uuid::Uuid::new_v4());
  let (status, _) = call(&s, "POST", &uri, Some(json!({ "status": "resolved" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Blood requests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn blood_requests_search_and_filter() {
  let s = store();
  let (_, body) = call(&s, "GET", "/blood-requests?search=ravi", None).await;
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["patient_name"], "Ravi Mehta");

  let (_, body) = call(&s, "GET", "/blood-requests?blood_type=A%2B", None).await;
  assert_eq!(body[0]["patient_name"], "Anita Singh");

  let (status, body) = call(&s, "GET", "/blood-requests?blood_type=Z%2B", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_blood_request_validates_units() {
  let s = store();
  let mut form = json!({
    "patient_name": "Kiran Rao",
    "blood_type": "AB-",
    "hospital": "Apollo Hospital",
    "urgency": "urgent",
    "units_needed": 1.5,
    "contact_phone": "+91 9876500001",
    "contact_person": "Meena Rao",
    "location": "Sarita Vihar, New Delhi",
    "description": "Needs AB- blood after a road accident.",
  });
  let (status, body) = call(&s, "POST", "/blood-requests", Some(form.clone())).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["fields"][0]["message"], "Must be a whole number");

  form["units_needed"] = json!(2);
  let (status, body) = call(&s, "POST", "/blood-requests", Some(form)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["blood_type"], "AB-");
  assert_eq!(body["units_collected"], 0);
}

// ── Fundraisers ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn donate_to_fundraiser() {
  let s = store();
  let uri = format!("/fundraisers/{}/donate", seed::fundraiser_id(2));
  let (status, body) = call(&s, "POST", &uri, Some(json!({ "amount": 500 }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["raised_amount"], 245_500.0);

  let (status, _) = call(&s, "POST", &uri, Some(json!({ "amount": 0 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn donating_past_the_goal_conflicts() {
  let s = store();
  let uri = format!("/fundraisers/{}/donate", seed::fundraiser_id(1));
  let (status, _) =
    call(&s, "POST", &uri, Some(json!({ "amount": 375_000 }))).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = call(&s, "POST", &uri, Some(json!({ "amount": 1 }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_fundraiser_defaults() {
  let s = store();
  let form = json!({
    "title": "Dialysis support for Suresh",
    "description": "Suresh needs dialysis three times a week and his family can no longer cover the cost.",
    "target_amount": 200000,
    "organizer": "Lakshmi Suresh",
    "hospital": "Safdarjung Hospital",
  });
  let (status, body) = call(&s, "POST", "/fundraisers", Some(form)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["category"], "medical");
  assert_eq!(body["urgency"], "normal");
  assert_eq!(body["raised_amount"], 0.0);

  let (_, body) = call(&s, "GET", "/fundraisers?urgency=critical", None).await;
  assert_eq!(body.as_array().unwrap().len(), 2);
}

// ── Alerts, chat, stats ─────────────────────────────────────────────────────

#[tokio::test]
async fn alerts_are_received_and_listed() {
  let s = store();
  let alert = EmergencyRequest::new(None, LocationFix::Unavailable, "", Utc::now());
  let (status, body) = call(
    &s,
    "POST",
    "/alerts",
    Some(serde_json::to_value(&alert).unwrap()),
  )
  .await;
  assert_eq!(status, StatusCode::ACCEPTED);
  assert_eq!(body["location"]["kind"], "unavailable");

  let (_, body) = call(&s, "GET", "/alerts", None).await;
  assert_eq!(body[0]["alert_id"], alert.alert_id.to_string());
}

#[tokio::test]
async fn chat_replies_and_rejects_blank() {
  let s = store();
  let (status, body) =
    call(&s, "POST", "/chat", Some(json!({ "message": "someone is choking" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["reply"].as_str().unwrap().starts_with("For choking"));

  let (status, _) = call(&s, "POST", "/chat", Some(json!({ "message": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_as_of_an_instant() {
  let s = store();
  let (status, body) =
    call(&s, "GET", "/stats?as_of=2024-01-16T00:00:00Z", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({
    "total_issues": 3,
    "pending_issues": 1,
    "resolved_issues": 1,
    "active_blood_requests": 3,
    "active_fundraisers": 2,
  }));
}

// ── Events ──────────────────────────────────────────────────────────────────

fn post(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

/// Read one SSE message as its `event:` name and parsed `data:` JSON.
async fn next_event(stream: &mut axum::body::BodyDataStream) -> (String, Value) {
  let mut buf = String::new();
  while !buf.contains("\n\n") {
    let chunk = tokio::time::timeout(std::time::Duration::from_secs(5), stream.next())
      .await
      .expect("no event within 5s")
      .unwrap()
      .unwrap();
    buf.push_str(std::str::from_utf8(&chunk).unwrap());
  }
  let mut name = String::new();
  let mut data = String::new();
  for line in buf.lines() {
    if let Some(v) = line.strip_prefix("event:") {
      name = v.trim().to_owned();
    } else if let Some(v) = line.strip_prefix("data:") {
      data.push_str(v.trim_start());
    }
  }
  (name, serde_json::from_str(&data).unwrap())
}

#[tokio::test]
async fn writes_are_pushed_to_event_subscribers() {
  let app = api_router(store());
  let req = Request::builder().uri("/events").body(Body::empty()).unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/event-stream");
  let mut events = resp.into_body().into_data_stream();

  // A rejected form publishes nothing; the next message is the valid one.
  let resp = app
    .clone()
    .oneshot(post("/complaints", json!({ "title": "short" })))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

  let form = json!({
    "title": "Open manhole near the market",
    "description": "An uncovered manhole is a danger to pedestrians at night.",
    "category": "roads",
    "priority": "critical",
    "location": "Main Market, Sector 18",
    "contact_info": "+91 9876500002",
  });
  let resp = app.clone().oneshot(post("/complaints", form)).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);

  let (name, body) = next_event(&mut events).await;
  assert_eq!(name, "newComplaint");
  assert_eq!(body["event"], "newComplaint");
  assert_eq!(body["data"]["title"], "Open manhole near the market");
  let id = body["data"]["complaint_id"].as_str().unwrap().to_owned();

  let resp = app
    .clone()
    .oneshot(post(
      &format!("/complaints/{id}/status"),
      json!({ "status": "verified" }),
    ))
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);

  let (name, body) = next_event(&mut events).await;
  assert_eq!(name, "issueStatusUpdate");
  assert_eq!(body["data"], json!({ "id": id, "status": "verified" }));
}

#[tokio::test]
async fn new_blood_request_is_announced() {
  let app = api_router(store());
  let req = Request::builder().uri("/events").body(Body::empty()).unwrap();
  let mut events = app
    .clone()
    .oneshot(req)
    .await
    .unwrap()
    .into_body()
    .into_data_stream();

  let form = json!({
    "patient_name": "Kiran Rao",
    "blood_type": "AB-",
    "hospital": "Apollo Hospital",
    "urgency": "critical",
    "units_needed": 2,
    "contact_phone": "+91 9876500001",
    "contact_person": "Meena Rao",
    "location": "Sarita Vihar, New Delhi",
    "description": "Needs AB- blood after a road accident.",
  });
  let resp = app.clone().oneshot(post("/blood-requests", form)).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);

  let (name, body) = next_event(&mut events).await;
  assert_eq!(name, "bloodRequestUpdate");
  assert_eq!(body["data"]["patient_name"], "Kiran Rao");
}
