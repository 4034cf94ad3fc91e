//! Application state machine and event dispatcher.

use std::{collections::VecDeque, num::NonZeroU32};

use civic_core::{
  chat::{self, GREETING},
  complaint::{Complaint, ComplaintStatus, IssueCategory, Priority},
  donation::{BloodRequest, BloodType, Urgency},
  emergency::{Coordinates, EMERGENCY_CONTACTS, EmergencyKind},
  event::CivicEvent,
  fundraiser::Fundraiser,
  listing::{Facet, Listable, ListingOrder},
  stats::DashboardStats,
};
use civic_sos::{
  SosController, SosState, TickOutcome,
  capability::{Notice, NoticeLevel},
  scheduler::{Cycle, IntervalScheduler},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::{browse::ListView, client::ApiClient, form::FormState, platform::TerminalPlatform};

pub type Sos = SosController<TerminalPlatform<ApiClient>, IntervalScheduler>;

/// Status messages kept for the SOS screen's recent list.
pub const NOTICE_HISTORY: usize = 6;

// ─── Screen ───────────────────────────────────────────────────────────────────

/// One top-level page. Each corresponds to a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Home,
  SubmitIssue,
  BloodRequests,
  Fundraisers,
  Sos,
  Admin,
}

impl Screen {
  /// Tab order; also the `1`..`6` shortcuts.
  pub const ALL: [Self; 6] = [
    Self::Home,
    Self::SubmitIssue,
    Self::BloodRequests,
    Self::Fundraisers,
    Self::Sos,
    Self::Admin,
  ];

  /// Resolve a route path. Unknown paths land on the home screen.
  pub fn from_path(path: &str) -> Self {
    let path = path.trim_end_matches('/');
    Self::ALL
      .into_iter()
      .find(|s| s.path().trim_end_matches('/') == path)
      .unwrap_or(Self::Home)
  }

  pub fn path(self) -> &'static str {
    match self {
      Self::Home => "/",
      Self::SubmitIssue => "/submit-issue",
      Self::BloodRequests => "/blood-request",
      Self::Fundraisers => "/fundraiser",
      Self::Sos => "/sos",
      Self::Admin => "/admin",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Self::Home => "Home",
      Self::SubmitIssue => "Report Issue",
      Self::BloodRequests => "Blood Requests",
      Self::Fundraisers => "Fundraisers",
      Self::Sos => "SOS",
      Self::Admin => "Admin",
    }
  }

  fn next(self) -> Self {
    let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
    Self::ALL[(i + 1) % Self::ALL.len()]
  }
}

// ─── Overlays ─────────────────────────────────────────────────────────────────

/// A modal form drawn over a list screen.
#[derive(Debug, Clone)]
pub enum Overlay {
  NewBloodRequest(FormState),
  NewFundraiser(FormState),
  Donate { fundraiser_id: Uuid, form: FormState },
}

impl Overlay {
  pub fn form(&self) -> &FormState {
    match self {
      Self::NewBloodRequest(form) | Self::NewFundraiser(form) => form,
      Self::Donate { form, .. } => form,
    }
  }

  fn form_mut(&mut self) -> &mut FormState {
    match self {
      Self::NewBloodRequest(form) | Self::NewFundraiser(form) => form,
      Self::Donate { form, .. } => form,
    }
  }
}

/// The first-aid assistant side panel.
#[derive(Debug, Clone)]
pub struct ChatPanel {
  pub open:    bool,
  pub input:   String,
  /// `(from_user, text)` pairs, oldest first.
  pub history: Vec<(bool, String)>,
}

impl Default for ChatPanel {
  fn default() -> Self {
    Self {
      open:    false,
      input:   String::new(),
      history: vec![(false, GREETING.to_owned())],
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  pub complaints:     Vec<Complaint>,
  pub blood_requests: Vec<BloodRequest>,
  pub fundraisers:    Vec<Fundraiser>,
  pub stats:          Option<DashboardStats>,

  /// Highest-priority complaints on the dashboard.
  pub home:        ListView,
  pub blood:       ListView,
  pub fundraising: ListView,
  /// Every complaint, newest first.
  pub admin:       ListView,

  pub issue_form: FormState,
  pub overlay:    Option<Overlay>,
  pub chat:       ChatPanel,

  pub sos:            Sos,
  /// Whether keys are going into the SOS note.
  pub editing_note:   bool,
  pub contact_cursor: usize,

  /// Latest message for the status bar.
  pub status:  Option<Notice>,
  /// Recent messages, oldest first.
  pub notices: VecDeque<Notice>,

  pub client: ApiClient,
}

impl App {
  /// Create the app and the receiver the SOS countdown ticks arrive on.
  pub fn new(
    client: ApiClient,
    position: Option<Coordinates>,
    countdown: NonZeroU32,
  ) -> (Self, UnboundedReceiver<Cycle>) {
    let (scheduler, ticks) = IntervalScheduler::new(IntervalScheduler::DEFAULT_PERIOD);
    let platform = TerminalPlatform::new(position, client.clone());
    let sos = SosController::new(platform, scheduler).with_countdown(countdown);

    let urgencies: Vec<_> = Urgency::iter().collect();
    let app = Self {
      screen: Screen::Home,
      complaints: Vec::new(),
      blood_requests: Vec::new(),
      fundraisers: Vec::new(),
      stats: None,
      home: ListView::new(ListingOrder::Priority)
        .with_facet(Facet::Status, ComplaintStatus::iter())
        .with_facet(Facet::Priority, Priority::iter())
        .with_facet(Facet::Category, IssueCategory::iter()),
      blood: ListView::new(ListingOrder::Priority)
        .with_facet(Facet::BloodType, BloodType::iter())
        .with_facet(Facet::Priority, urgencies.clone()),
      fundraising: ListView::new(ListingOrder::Priority)
        .with_facet(Facet::Priority, urgencies),
      admin: ListView::new(ListingOrder::Newest)
        .with_facet(Facet::Status, ComplaintStatus::iter()),
      issue_form: FormState::issue_report(),
      overlay: None,
      chat: ChatPanel::default(),
      sos,
      editing_note: false,
      contact_cursor: 0,
      status: None,
      notices: VecDeque::with_capacity(NOTICE_HISTORY),
      client,
    };
    (app, ticks)
  }

  fn set_status(&mut self, notice: Notice) {
    match notice.level {
      NoticeLevel::Error => tracing::warn!(message = %notice.message, "status"),
      _ => tracing::debug!(message = %notice.message, "status"),
    }
    if self.notices.len() == NOTICE_HISTORY {
      self.notices.pop_front();
    }
    self.notices.push_back(notice.clone());
    self.status = Some(notice);
  }

  /// Move queued SOS notices into the history in the order they were raised.
  /// The status bar ends up showing the newest.
  pub fn absorb_notices(&mut self) {
    for notice in self.sos.platform().drain_notices() {
      self.set_status(notice);
    }
  }

  // ── Live events ───────────────────────────────────────────────────────────

  /// Fold a pushed server event into the local lists and announce it.
  pub fn apply_event(&mut self, event: CivicEvent) {
    let notice = match &event {
      CivicEvent::NewComplaint(_) => Notice::info(event.message()),
      CivicEvent::BloodRequestUpdate(_) => Notice::error(event.message()),
      CivicEvent::IssueStatusUpdate(_) => Notice::success(event.message()),
    };
    match event {
      CivicEvent::NewComplaint(complaint) => {
        if !self.complaints.iter().any(|c| c.complaint_id == complaint.complaint_id) {
          self.complaints.insert(0, complaint);
        }
      }
      CivicEvent::BloodRequestUpdate(request) => {
        match self
          .blood_requests
          .iter_mut()
          .find(|r| r.request_id == request.request_id)
        {
          Some(existing) => *existing = request,
          None => self.blood_requests.insert(0, request),
        }
      }
      CivicEvent::IssueStatusUpdate(update) => {
        if let Some(c) = self.complaints.iter_mut().find(|c| c.complaint_id == update.id) {
          c.status = update.status;
        }
      }
    }
    self.clamp_cursors();
    self.set_status(notice);
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Reload every record family and the dashboard figures.
  pub async fn refresh(&mut self) -> anyhow::Result<()> {
    self.status = Some(Notice::info("Loading…"));
    let loaded = tokio::try_join!(
      self.client.list_complaints(),
      self.client.list_blood_requests(),
      self.client.list_fundraisers(),
      self.client.stats(),
    );
    match loaded {
      Ok((complaints, blood_requests, fundraisers, stats)) => {
        self.complaints = complaints;
        self.blood_requests = blood_requests;
        self.fundraisers = fundraisers;
        self.stats = Some(stats);
        self.clamp_cursors();
        self.status = None;
        Ok(())
      }
      Err(e) => {
        self.set_status(Notice::error(format!("Error: {e:#}")));
        Err(e)
      }
    }
  }

  fn clamp_cursors(&mut self) {
    let home = self.home.visible(&self.complaints).len();
    let admin = self.admin.visible(&self.complaints).len();
    let blood = self.blood.visible(&self.blood_requests).len();
    let fundraising = self.fundraising.visible(&self.fundraisers).len();
    self.home.clamp(home);
    self.admin.clamp(admin);
    self.blood.clamp(blood);
    self.fundraising.clamp(fundraising);
  }

  // ── Countdown ─────────────────────────────────────────────────────────────

  /// Feed a scheduler tick to the SOS controller.
  pub async fn sos_tick(&mut self, cycle: Cycle) {
    match self.sos.tick_cycle(cycle).await {
      Ok(Some(TickOutcome::Dispatched(report))) => {
        tracing::info!(
          alert_id = %report.request.alert_id,
          delivered = report.delivered,
          "SOS cycle finished"
        );
      }
      Ok(_) => {}
      Err(e) => tracing::warn!(error = %e, "SOS tick rejected"),
    }
    self.absorb_notices();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Whether printable keys are currently text input.
  pub fn typing(&self) -> bool {
    self.overlay.is_some()
      || self.chat.open
      || self.editing_note
      || self.screen == Screen::SubmitIssue
      || self.current_list().is_some_and(|v| v.searching)
  }

  pub fn current_list(&self) -> Option<&ListView> {
    match self.screen {
      Screen::Home => Some(&self.home),
      Screen::BloodRequests => Some(&self.blood),
      Screen::Fundraisers => Some(&self.fundraising),
      Screen::Admin => Some(&self.admin),
      Screen::SubmitIssue | Screen::Sos => None,
    }
  }

  fn current_list_mut(&mut self) -> Option<&mut ListView> {
    match self.screen {
      Screen::Home => Some(&mut self.home),
      Screen::BloodRequests => Some(&mut self.blood),
      Screen::Fundraisers => Some(&mut self.fundraising),
      Screen::Admin => Some(&mut self.admin),
      Screen::SubmitIssue | Screen::Sos => None,
    }
  }

  fn current_len(&self) -> usize {
    match self.screen {
      Screen::Home => self.home.visible(&self.complaints).len(),
      Screen::Admin => self.admin.visible(&self.complaints).len(),
      Screen::BloodRequests => self.blood.visible(&self.blood_requests).len(),
      Screen::Fundraisers => self.fundraising.visible(&self.fundraisers).len(),
      Screen::SubmitIssue | Screen::Sos => 0,
    }
  }

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.overlay.is_some() {
      self.handle_overlay_key(key).await;
    } else if self.chat.open {
      self.handle_chat_key(key).await;
    } else if self.editing_note {
      self.handle_note_key(key);
    } else if self.current_list().is_some_and(|v| v.searching) {
      self.handle_search_key(key);
    } else if self.screen == Screen::SubmitIssue {
      self.handle_issue_key(key).await;
    } else {
      match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Tab => self.screen = self.screen.next(),
        KeyCode::Char(c @ '1'..='6') => {
          let i = c as usize - '1' as usize;
          self.screen = Screen::ALL[i];
        }
        KeyCode::Char('r') => {
          // Errors are already on the status bar.
          let _ = self.refresh().await;
        }
        KeyCode::Char('?') => self.chat.open = true,
        _ if self.screen == Screen::Sos => self.handle_sos_key(key).await,
        _ => self.handle_list_key(key).await,
      }
    }

    self.absorb_notices();
    Ok(true)
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let Some(view) = self.current_list_mut() else {
      return;
    };
    match key.code {
      KeyCode::Esc => view.cancel_search(),
      KeyCode::Enter => view.accept_search(),
      KeyCode::Backspace => view.pop_search(),
      KeyCode::Char(c) => view.push_search(c),
      _ => {}
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) {
    let len = self.current_len();
    let screen = self.screen;
    let Some(view) = self.current_list_mut() else {
      return;
    };
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => view.down(len),
      KeyCode::Up | KeyCode::Char('k') => view.up(),
      KeyCode::Char('/') => view.start_search(),
      KeyCode::Char('s') => view.cycle_facet(Facet::Status),
      KeyCode::Char('p') => view.cycle_facet(Facet::Priority),
      KeyCode::Char('g') => view.cycle_facet(Facet::Category),
      KeyCode::Char('b') => view.cycle_facet(Facet::BloodType),
      _ => match screen {
        Screen::BloodRequests => self.handle_blood_key(key),
        Screen::Fundraisers => self.handle_fundraiser_key(key),
        Screen::Admin => self.handle_admin_key(key).await,
        _ => {}
      },
    }
  }

  fn handle_blood_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('n') => {
        self.overlay = Some(Overlay::NewBloodRequest(FormState::blood_request()));
      }
      // Call the contact of the selected request.
      KeyCode::Enter => {
        let phone = self
          .blood
          .selected(&self.blood_requests)
          .map(|r| r.contact_phone.clone());
        if let Some(phone) = phone {
          self.sos.call(&phone);
        }
      }
      _ => {}
    }
  }

  fn handle_fundraiser_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('n') => {
        self.overlay = Some(Overlay::NewFundraiser(FormState::fundraiser()));
      }
      KeyCode::Char('d') | KeyCode::Enter => {
        let selected = self.fundraising.selected(&self.fundraisers);
        match selected {
          Some(f) if f.goal_reached() => {
            self.set_status(Notice::info("This campaign has reached its goal"));
          }
          Some(f) => {
            self.overlay = Some(Overlay::Donate {
              fundraiser_id: f.id(),
              form:          FormState::donation(),
            });
          }
          None => {}
        }
      }
      _ => {}
    }
  }

  async fn handle_admin_key(&mut self, key: KeyEvent) {
    let status = match key.code {
      KeyCode::Char('v') => ComplaintStatus::Verified,
      KeyCode::Char('x') => ComplaintStatus::Resolved,
      KeyCode::Char('u') => ComplaintStatus::Pending,
      _ => return,
    };
    let Some(id) = self.admin.selected(&self.complaints).map(|c| c.complaint_id) else {
      return;
    };
    match self.client.set_complaint_status(id, status).await {
      Ok(updated) => {
        if let Some(slot) = self.complaints.iter_mut().find(|c| c.complaint_id == id) {
          *slot = updated;
        }
        self.set_status(Notice::success(format!("Complaint marked {status}")));
        if let Ok(stats) = self.client.stats().await {
          self.stats = Some(stats);
        }
      }
      Err(e) => self.set_status(Notice::error(format!("Error: {e:#}"))),
    }
  }

  async fn handle_issue_key(&mut self, key: KeyEvent) {
    let form = &mut self.issue_form;
    match key.code {
      KeyCode::Esc => self.screen = Screen::Home,
      KeyCode::Tab | KeyCode::Down => form.next(),
      KeyCode::BackTab | KeyCode::Up => form.prev(),
      KeyCode::Left => form.cycle(false),
      KeyCode::Right => form.cycle(true),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Char(c) => form.input(c),
      KeyCode::Enter => {
        let Some(raw) = form.issue_report_form() else {
          self.set_status(Notice::error("Please fix the highlighted fields"));
          return;
        };
        match self.client.report_issue(&raw).await {
          Ok(complaint) => {
            tracing::info!(id = %complaint.complaint_id, "issue reported");
            self.complaints.insert(0, complaint);
            self.issue_form = FormState::issue_report();
            self.screen = Screen::Home;
            self.set_status(Notice::success("Issue reported successfully"));
          }
          Err(e) => self.set_status(Notice::error(format!("Error: {e:#}"))),
        }
      }
      _ => {}
    }
  }

  async fn handle_overlay_key(&mut self, key: KeyEvent) {
    let Some(overlay) = self.overlay.as_mut() else {
      return;
    };
    let form = overlay.form_mut();
    match key.code {
      KeyCode::Esc => self.overlay = None,
      KeyCode::Tab | KeyCode::Down => form.next(),
      KeyCode::BackTab | KeyCode::Up => form.prev(),
      KeyCode::Left => form.cycle(false),
      KeyCode::Right => form.cycle(true),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Char(c) => form.input(c),
      KeyCode::Enter => self.submit_overlay().await,
      _ => {}
    }
  }

  async fn submit_overlay(&mut self) {
    let Some(overlay) = self.overlay.as_mut() else {
      return;
    };
    let outcome = match overlay {
      Overlay::NewBloodRequest(form) => {
        let Some(raw) = form.blood_request_form() else {
          return;
        };
        self.client.create_blood_request(&raw).await.map(|created| {
          self.blood_requests.insert(0, created);
          "Blood request created"
        })
      }
      Overlay::NewFundraiser(form) => {
        let Some(raw) = form.fundraiser_form() else {
          return;
        };
        self.client.create_fundraiser(&raw).await.map(|created| {
          self.fundraisers.insert(0, created);
          "Fundraiser created"
        })
      }
      Overlay::Donate { fundraiser_id, form } => {
        let Some(amount) = form.donation_amount() else {
          return;
        };
        let id = *fundraiser_id;
        self.client.donate(id, amount).await.map(|updated| {
          if let Some(slot) = self.fundraisers.iter_mut().find(|f| f.fundraiser_id == id) {
            *slot = updated;
          }
          "Thank you for your donation!"
        })
      }
    };
    match outcome {
      Ok(message) => {
        self.overlay = None;
        self.set_status(Notice::success(message));
      }
      Err(e) => self.set_status(Notice::error(format!("Error: {e:#}"))),
    }
  }

  async fn handle_chat_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.chat.open = false,
      KeyCode::Backspace => {
        self.chat.input.pop();
      }
      KeyCode::Char(c) => self.chat.input.push(c),
      KeyCode::Enter => {
        let message = std::mem::take(&mut self.chat.input);
        let message = message.trim();
        if message.is_empty() {
          return;
        }
        let reply = match self.client.chat(message).await {
          Ok(reply) => reply,
          // The responder is deterministic, so answer locally when offline.
          Err(e) => {
            tracing::warn!(error = %e, "chat endpoint unreachable");
            chat::respond(message).unwrap_or_default().to_owned()
          }
        };
        self.chat.history.push((true, message.to_owned()));
        self.chat.history.push((false, reply));
      }
      _ => {}
    }
  }

  // ── SOS ───────────────────────────────────────────────────────────────────

  fn handle_note_key(&mut self, key: KeyEvent) {
    let mut note = self.sos.note().to_owned();
    match key.code {
      KeyCode::Esc | KeyCode::Enter => self.editing_note = false,
      KeyCode::Backspace => {
        note.pop();
      }
      KeyCode::Char(c) => note.push(c),
      _ => {}
    }
    self.sos.set_note(note);
  }

  async fn handle_sos_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char(' ') => {
        if let Err(e) = self.sos.activate().await {
          self.set_status(Notice::warning(e.to_string()));
        }
      }
      KeyCode::Esc | KeyCode::Char('x') => {
        if self.sos.state() == SosState::Idle {
          self.set_status(Notice::info("No emergency to cancel"));
        } else if let Err(e) = self.sos.cancel() {
          self.set_status(Notice::warning(e.to_string()));
        }
      }
      KeyCode::Char('t') => {
        let next = next_kind(self.sos.kind());
        self.sos.set_kind(next);
      }
      KeyCode::Char('e') => self.editing_note = true,
      KeyCode::Char('l') => {
        self.sos.detect_location().await;
      }
      KeyCode::Char('s') => {
        // Failures are reported through notices.
        let _ = self.sos.share_location().await;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if self.contact_cursor + 1 < EMERGENCY_CONTACTS.len() {
          self.contact_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.contact_cursor = self.contact_cursor.saturating_sub(1);
      }
      KeyCode::Enter => {
        if let Some(contact) = EMERGENCY_CONTACTS.get(self.contact_cursor) {
          self.sos.call(contact.number);
        }
      }
      _ => {}
    }
  }
}

/// Step through "unspecified" and then each selectable kind.
fn next_kind(current: Option<EmergencyKind>) -> Option<EmergencyKind> {
  let kinds: Vec<_> = EmergencyKind::selectable().collect();
  match current {
    None => kinds.first().copied(),
    Some(kind) => {
      let i = kinds.iter().position(|k| *k == kind)?;
      kinds.get(i + 1).copied()
    }
  }
}

#[cfg(test)]
mod tests {
  use civic_core::seed;
  use crossterm::event::KeyEventKind;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: crossterm::event::KeyEventState::NONE,
    }
  }

  fn app(position: Option<Coordinates>) -> App {
    // Nothing listens here; requests that get made fail fast.
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let (mut app, _ticks) = App::new(client, position, NonZeroU32::new(3).unwrap());
    app.complaints = seed::complaints();
    app.blood_requests = seed::blood_requests();
    app.fundraisers = seed::fundraisers();
    app
  }

  #[test]
  fn paths_resolve_to_screens() {
    assert_eq!(Screen::from_path("/"), Screen::Home);
    assert_eq!(Screen::from_path("/submit-issue"), Screen::SubmitIssue);
    assert_eq!(Screen::from_path("/blood-request"), Screen::BloodRequests);
    assert_eq!(Screen::from_path("/fundraiser/"), Screen::Fundraisers);
    assert_eq!(Screen::from_path("/sos"), Screen::Sos);
    assert_eq!(Screen::from_path("/admin"), Screen::Admin);
    assert_eq!(Screen::from_path("/nowhere"), Screen::Home);
    for screen in Screen::ALL {
      assert_eq!(Screen::from_path(screen.path()), screen);
    }
  }

  #[test]
  fn kinds_cycle_back_to_unspecified() {
    let mut kind = None;
    let mut seen = 0;
    loop {
      kind = next_kind(kind);
      if kind.is_none() {
        break;
      }
      seen += 1;
    }
    assert_eq!(seen, 6);
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn number_keys_switch_screens_unless_typing() {
    let mut app = app(None);
    assert!(app.handle_key(key(KeyCode::Char('3'))).await.unwrap());
    assert_eq!(app.screen, Screen::BloodRequests);

    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    assert!(app.typing());
    app.handle_key(key(KeyCode::Char('1'))).await.unwrap();
    assert_eq!(app.screen, Screen::BloodRequests);
    assert_eq!(app.blood.search_text(), "1");

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.screen, Screen::Fundraisers);
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn list_keys_filter_the_current_screen() {
    let mut app = app(None);
    app.screen = Screen::BloodRequests;
    app.handle_key(key(KeyCode::Char('b'))).await.unwrap();
    assert_eq!(app.blood.visible(&app.blood_requests).len(), 1);
    app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
    assert_eq!(app.blood.cursor, 0);
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn invalid_issue_report_stays_on_form() {
    let mut app = app(None);
    app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
    assert_eq!(app.issue_form.value("title"), Some("q"));

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.screen, Screen::SubmitIssue);
    assert_eq!(
      app.issue_form.error_for("title"),
      Some("Title must be at least 10 characters")
    );
    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.screen, Screen::Home);
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn sos_arms_and_cancels_from_keys() {
    let mut app = app(None);
    app.screen = Screen::Sos;
    app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
    assert_eq!(app.sos.state(), SosState::Countdown { remaining: 3 });
    assert_eq!(
      app.status.as_ref().map(|n| n.message.as_str()),
      Some("Unable to get location. Emergency will still be triggered.")
    );

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.sos.state(), SosState::Idle);
    assert_eq!(
      app.status.as_ref().map(|n| n.message.as_str()),
      Some("Emergency cancelled")
    );
    assert!(app.sos.last_dispatch().is_none());
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn sos_note_and_share() {
    let mut app = app(Some(Coordinates::new(28.6139, 77.209)));
    app.screen = Screen::Sos;
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    for c in "smoke".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.sos.note(), "smoke");
    assert!(!app.editing_note);

    app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
    assert_eq!(
      app.sos.platform().clipboard().as_deref(),
      Some("Emergency Location: https://maps.google.com/?q=28.6139,77.209")
    );

    app.handle_key(key(KeyCode::Down)).await.unwrap();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.sos.platform().last_dialed().as_deref(), Some("tel:101"));
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn every_sos_notice_is_kept_in_order() {
    let mut app = app(Some(Coordinates::new(28.6139, 77.209)));
    app.screen = Screen::Sos;
    app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('s'))).await.unwrap();

    let messages: Vec<_> = app.notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, ["Location detected", "Location copied to clipboard"]);
    assert_eq!(
      app.status.as_ref().map(|n| n.message.as_str()),
      Some("Location copied to clipboard")
    );

    for _ in 0..NOTICE_HISTORY {
      app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
    }
    assert_eq!(app.notices.len(), NOTICE_HISTORY);
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn pushed_events_update_lists_and_announce() {
    use civic_core::event::StatusUpdate;

    let mut app = app(None);
    let mut complaint = seed::complaints().remove(0);
    complaint.complaint_id = Uuid::new_v4();
    complaint.title = "Fallen tree blocking Ring Road".to_owned();
    let id = complaint.complaint_id;

    let before = app.complaints.len();
    app.apply_event(CivicEvent::NewComplaint(complaint.clone()));
    app.apply_event(CivicEvent::NewComplaint(complaint));
    assert_eq!(app.complaints.len(), before + 1);
    assert_eq!(app.complaints[0].complaint_id, id);

    app.apply_event(CivicEvent::IssueStatusUpdate(StatusUpdate {
      id,
      status: ComplaintStatus::Resolved,
    }));
    assert_eq!(app.complaints[0].status, ComplaintStatus::Resolved);

    let request = app.blood_requests[0].clone();
    app.apply_event(CivicEvent::BloodRequestUpdate(request.clone()));
    assert_eq!(app.blood_requests.len(), seed::blood_requests().len());

    let messages: Vec<_> = app.notices.iter().map(|n| n.message.clone()).collect();
    assert_eq!(messages, [
      "New issue reported: Fallen tree blocking Ring Road".to_owned(),
      "New issue reported: Fallen tree blocking Ring Road".to_owned(),
      format!("Issue #{id} status changed to resolved"),
      format!("Urgent: Blood donation needed for {}", request.patient_name),
    ]);
    assert_eq!(app.status.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn stale_ticks_are_ignored() {
    let mut app = app(None);
    app.sos_tick(42).await;
    assert_eq!(app.sos.state(), SosState::Idle);
  }
}
