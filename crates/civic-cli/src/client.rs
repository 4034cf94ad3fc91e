//! Async HTTP client wrapping the civic JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use civic_core::{
  complaint::{Complaint, ComplaintStatus},
  donation::BloodRequest,
  emergency::EmergencyRequest,
  event::CivicEvent,
  fundraiser::Fundraiser,
  stats::DashboardStats,
  validation::{BloodRequestForm, FundraiserForm, IssueReportForm},
};
use civic_sos::capability::{AlertDispatcher, DispatchFailed};
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Per-request limit for ordinary API calls. The event stream has none.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait before reconnecting a dropped event stream.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Async HTTP client for the civic JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

/// Turn a response into `T`, or into an error carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp
      .json()
      .await
      .with_context(|| format!("deserialising {what}"));
  }
  let body: Value = resp.json().await.unwrap_or_default();
  let message = body["error"].as_str().unwrap_or("request failed");
  let fields: Vec<&str> = body["fields"]
    .as_array()
    .map(|fs| fs.iter().filter_map(|f| f["message"].as_str()).collect())
    .unwrap_or_default();
  if fields.is_empty() {
    Err(anyhow!("{what} → {status}: {message}"))
  } else {
    Err(anyhow!("{what} → {status}: {}", fields.join("; ")))
  }
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let resp = self
      .client
      .get(self.url(path))
      .timeout(REQUEST_TIMEOUT)
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    decode(resp, &format!("GET {path}")).await
  }

  async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    let resp = self
      .client
      .post(self.url(path))
      .timeout(REQUEST_TIMEOUT)
      .json(body)
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    decode(resp, &format!("POST {path}")).await
  }

  // ── Complaints ────────────────────────────────────────────────────────────

  /// `GET /api/complaints`
  pub async fn list_complaints(&self) -> Result<Vec<Complaint>> {
    self.get("/complaints").await
  }

  /// `POST /api/complaints`
  pub async fn report_issue(&self, form: &IssueReportForm) -> Result<Complaint> {
    self.post("/complaints", form).await
  }

  /// `POST /api/complaints/{id}/status`
  pub async fn set_complaint_status(
    &self,
    id: Uuid,
    status: ComplaintStatus,
  ) -> Result<Complaint> {
    self
      .post(
        &format!("/complaints/{id}/status"),
        &json!({ "status": status }),
      )
      .await
  }

  // ── Blood requests ────────────────────────────────────────────────────────

  /// `GET /api/blood-requests`
  pub async fn list_blood_requests(&self) -> Result<Vec<BloodRequest>> {
    self.get("/blood-requests").await
  }

  /// `POST /api/blood-requests`
  pub async fn create_blood_request(
    &self,
    form: &BloodRequestForm,
  ) -> Result<BloodRequest> {
    self.post("/blood-requests", form).await
  }

  // ── Fundraisers ───────────────────────────────────────────────────────────

  /// `GET /api/fundraisers`
  pub async fn list_fundraisers(&self) -> Result<Vec<Fundraiser>> {
    self.get("/fundraisers").await
  }

  /// `POST /api/fundraisers`
  pub async fn create_fundraiser(&self, form: &FundraiserForm) -> Result<Fundraiser> {
    self.post("/fundraisers", form).await
  }

  /// `POST /api/fundraisers/{id}/donate`
  pub async fn donate(&self, id: Uuid, amount: f64) -> Result<Fundraiser> {
    self
      .post(
        &format!("/fundraisers/{id}/donate"),
        &json!({ "amount": amount }),
      )
      .await
  }

  // ── Assistant & dashboard ─────────────────────────────────────────────────

  /// `POST /api/chat`
  pub async fn chat(&self, message: &str) -> Result<String> {
    let reply: Value = self.post("/chat", &json!({ "message": message })).await?;
    reply["reply"]
      .as_str()
      .map(str::to_owned)
      .ok_or_else(|| anyhow!("chat reply missing"))
  }

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<DashboardStats> { self.get("/stats").await }

  // ── Alerts ────────────────────────────────────────────────────────────────

  /// `POST /api/alerts`
  pub async fn send_alert(&self, request: &EmergencyRequest) -> Result<()> {
    let _: Value = self.post("/alerts", request).await?;
    Ok(())
  }
}

// ─── Live events ──────────────────────────────────────────────────────────────

impl ApiClient {
  /// Follow `GET /api/events` in the background, reconnecting when the
  /// stream drops. Stops once the receiver is dropped.
  pub fn watch_events(&self) -> UnboundedReceiver<CivicEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let client = self.clone();
    tokio::spawn(async move {
      loop {
        if let Err(e) = client.follow_events(&tx).await {
          tracing::debug!(error = %format!("{e:#}"), "event stream dropped");
        }
        if tx.is_closed() {
          break;
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
      }
    });
    rx
  }

  async fn follow_events(&self, tx: &UnboundedSender<CivicEvent>) -> Result<()> {
    let mut resp = self
      .client
      .get(self.url("/events"))
      .send()
      .await
      .context("GET /events failed")?
      .error_for_status()
      .context("GET /events")?;
    tracing::info!("listening for live updates");

    let mut decoder = SseDecoder::default();
    while let Some(chunk) = resp.chunk().await.context("reading event stream")? {
      for event in decoder.push(&chunk) {
        if tx.send(event).is_err() {
          return Ok(());
        }
      }
    }
    Ok(())
  }
}

/// Incremental parser for the `text/event-stream` body of `/api/events`.
///
/// Only `data:` lines matter: they carry the tagged event JSON. Comments
/// (keep-alives), other fields and unreadable payloads are skipped.
#[derive(Default)]
struct SseDecoder {
  buf: Vec<u8>,
}

impl SseDecoder {
  fn push(&mut self, chunk: &[u8]) -> Vec<CivicEvent> {
    // Chunks may split a UTF-8 sequence, so text is decoded per message.
    self.buf.extend(chunk.iter().filter(|&&b| b != b'\r'));

    let mut events = Vec::new();
    while let Some(end) = self.buf.windows(2).position(|w| w == b"\n\n") {
      let message: Vec<u8> = self.buf.drain(..end + 2).collect();
      let message = String::from_utf8_lossy(&message);
      let data: Vec<&str> = message
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|d| d.strip_prefix(' ').unwrap_or(d))
        .collect();
      if data.is_empty() {
        continue;
      }
      match serde_json::from_str(&data.join("\n")) {
        Ok(event) => events.push(event),
        Err(e) => tracing::debug!(error = %e, "skipping unreadable event"),
      }
    }
    events
  }
}

impl AlertDispatcher for ApiClient {
  async fn send_emergency_alert(
    &self,
    request: &EmergencyRequest,
  ) -> Result<(), DispatchFailed> {
    self
      .send_alert(request)
      .await
      .map_err(|e| DispatchFailed::new(format!("{e:#}")))
  }
}
