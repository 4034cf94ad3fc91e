//! [`SosController`]: the armed-countdown state machine.

use std::{fmt, num::NonZeroU32};

use chrono::Utc;
use civic_core::emergency::{
  Coordinates, EmergencyKind, EmergencyRequest, LocationFix,
};

use crate::{
  Error, Operation, Result,
  capability::{Notice, Platform, ShareError},
  scheduler::{CountdownScheduler, Cycle},
};

/// Seconds between activation and dispatch unless configured otherwise.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

const DEFAULT_COUNTDOWN: NonZeroU32 = match NonZeroU32::new(DEFAULT_COUNTDOWN_SECS) {
  Some(n) => n,
  None => panic!("countdown must be at least one second"),
};

const SHARE_TITLE: &str = "My Emergency Location";

// ─── State ───────────────────────────────────────────────────────────────────

/// Where the controller is in an SOS cycle.
///
/// `Idle` is both the starting and the resting state; a controller can run
/// any number of cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SosState {
  #[default]
  Idle,
  /// Waiting on the location fix that precedes the countdown.
  Arming,
  /// Counting down; `remaining` is always at least 1.
  Countdown { remaining: u32 },
  /// The alert is being delivered.
  Dispatching,
}

impl SosState {
  pub fn is_armed(&self) -> bool { !matches!(self, Self::Idle) }
}

impl fmt::Display for SosState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Idle => f.write_str("idle"),
      Self::Arming => f.write_str("arming"),
      Self::Countdown { remaining } => write!(f, "counting down ({remaining}s)"),
      Self::Dispatching => f.write_str("dispatching"),
    }
  }
}

/// What happened to the last dispatched alert.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
  pub request:   EmergencyRequest,
  pub delivered: bool,
}

/// Result of a single countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
  Remaining(u32),
  Dispatched(DispatchReport),
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct SosController<P, S> {
  platform:      P,
  scheduler:     S,
  countdown:     NonZeroU32,
  state:         SosState,
  cycle:         Cycle,
  kind:          Option<EmergencyKind>,
  note:          String,
  /// Last known position, shown to the user and used for sharing.
  location:      Option<Coordinates>,
  /// The fix captured when the current cycle was armed.
  armed_fix:     LocationFix,
  last_dispatch: Option<DispatchReport>,
}

impl<P, S> SosController<P, S>
where
  P: Platform,
  S: CountdownScheduler,
{
  pub fn new(platform: P, scheduler: S) -> Self {
    Self {
      platform,
      scheduler,
      countdown: DEFAULT_COUNTDOWN,
      state: SosState::Idle,
      cycle: 0,
      kind: None,
      note: String::new(),
      location: None,
      armed_fix: LocationFix::Unavailable,
      last_dispatch: None,
    }
  }

  /// Override the countdown length for future cycles.
  pub fn with_countdown(mut self, seconds: NonZeroU32) -> Self {
    self.countdown = seconds;
    self
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn state(&self) -> SosState { self.state }

  pub fn countdown_secs(&self) -> u32 { self.countdown.get() }

  /// The cycle id of the most recent activation; `0` before the first.
  pub fn cycle(&self) -> Cycle { self.cycle }

  pub fn kind(&self) -> Option<EmergencyKind> { self.kind }

  pub fn note(&self) -> &str { &self.note }

  pub fn location(&self) -> Option<Coordinates> { self.location }

  pub fn last_dispatch(&self) -> Option<&DispatchReport> {
    self.last_dispatch.as_ref()
  }

  pub fn platform(&self) -> &P { &self.platform }

  pub fn scheduler(&self) -> &S { &self.scheduler }

  // ── Form inputs ───────────────────────────────────────────────────────

  /// Kind to report on the next dispatch; `None` sends a general emergency.
  pub fn set_kind(&mut self, kind: Option<EmergencyKind>) { self.kind = kind; }

  pub fn set_note(&mut self, note: impl Into<String>) { self.note = note.into(); }

  // ── Cycle ─────────────────────────────────────────────────────────────

  fn reject(&self, operation: Operation) -> Error {
    tracing::warn!(%operation, state = %self.state, "ignoring invalid SOS transition");
    Error::InvalidTransition {
      operation,
      state: self.state,
    }
  }

  /// Arm a new cycle: capture the location, then start the countdown.
  ///
  /// A failed location lookup does not stop the cycle; the alert is sent
  /// with [`LocationFix::Unavailable`].
  pub async fn activate(&mut self) -> Result<()> {
    if self.state != SosState::Idle {
      return Err(self.reject(Operation::Activate));
    }
    self.state = SosState::Arming;
    let seconds = self.countdown.get();

    self.armed_fix = match self.platform.current_location().await {
      Ok(position) => {
        self.location = Some(position);
        self.platform.notify(Notice::success("Location detected"));
        self.platform.notify(Notice::warning(format!(
          "Emergency will be triggered in {seconds} seconds. Cancel if this \
           was accidental."
        )));
        LocationFix::Known(position)
      }
      Err(e) => {
        tracing::warn!(error = %e, "arming SOS without a location");
        self.platform.notify(Notice::error(
          "Unable to get location. Emergency will still be triggered.",
        ));
        LocationFix::Unavailable
      }
    };

    self.cycle += 1;
    self.state = SosState::Countdown { remaining: seconds };
    self.scheduler.start(self.cycle);
    tracing::info!(cycle = self.cycle, seconds, "SOS countdown armed");
    Ok(())
  }

  /// Advance the countdown by one second, dispatching when it hits zero.
  pub async fn tick(&mut self) -> Result<TickOutcome> {
    let SosState::Countdown { remaining } = self.state else {
      return Err(self.reject(Operation::Tick));
    };

    let remaining = remaining - 1;
    if remaining > 0 {
      tracing::debug!(cycle = self.cycle, remaining, "SOS countdown tick");
      self.state = SosState::Countdown { remaining };
      return Ok(TickOutcome::Remaining(remaining));
    }

    self.scheduler.clear();
    self.state = SosState::Dispatching;
    let report = self.dispatch().await;
    self.state = SosState::Idle;
    Ok(TickOutcome::Dispatched(report))
  }

  /// Tick on behalf of a scheduler. Ticks for any cycle other than the one
  /// currently counting down are dropped and yield `None`.
  pub async fn tick_cycle(&mut self, cycle: Cycle) -> Result<Option<TickOutcome>> {
    let counting = matches!(self.state, SosState::Countdown { .. });
    if cycle != self.cycle || !counting {
      tracing::debug!(cycle, current = self.cycle, "dropping stale SOS tick");
      return Ok(None);
    }
    self.tick().await.map(Some)
  }

  /// Abort the countdown. Nothing is sent for this cycle.
  pub fn cancel(&mut self) -> Result<()> {
    let SosState::Countdown { remaining } = self.state else {
      return Err(self.reject(Operation::Cancel));
    };
    self.scheduler.clear();
    self.state = SosState::Idle;
    self.platform.notify(Notice::info("Emergency cancelled"));
    tracing::info!(cycle = self.cycle, remaining, "SOS cancelled");
    Ok(())
  }

  async fn dispatch(&mut self) -> DispatchReport {
    let request = EmergencyRequest::new(
      self.kind,
      self.armed_fix,
      self.note.clone(),
      Utc::now(),
    );
    tracing::info!(
      alert_id = %request.alert_id,
      kind = %request.kind,
      location = %request.location,
      "dispatching emergency alert"
    );

    let delivered = match self.platform.send_emergency_alert(&request).await {
      Ok(()) => {
        self.platform.notify(Notice::success(
          "Emergency alert sent to authorities and emergency contacts!",
        ));
        self.platform.notify(Notice::info("Live location sharing activated"));
        true
      }
      Err(e) => {
        tracing::error!(alert_id = %request.alert_id, error = %e, "emergency alert not delivered");
        self.platform.notify(Notice::error(
          "Failed to send emergency alert. Please call manually.",
        ));
        false
      }
    };

    let report = DispatchReport { request, delivered };
    self.last_dispatch = Some(report.clone());
    report
  }

  // ── Side actions ──────────────────────────────────────────────────────

  /// Refresh the displayed location. Available in any state; a failure
  /// keeps whatever was there before.
  pub async fn detect_location(&mut self) -> Option<Coordinates> {
    match self.platform.current_location().await {
      Ok(position) => {
        self.location = Some(position);
        self.platform.notify(Notice::success("Location detected"));
        Some(position)
      }
      Err(e) => {
        tracing::warn!(error = %e, "location refresh failed");
        self.platform.notify(Notice::error("Unable to get location"));
        None
      }
    }
  }

  /// Share the last known location, falling back to the clipboard when the
  /// host cannot share.
  pub async fn share_location(&mut self) -> Result<()> {
    let Some(position) = self.location else {
      self.platform.notify(Notice::error("Location not available"));
      return Err(Error::NoLocation);
    };
    let url = position.maps_url();

    let text = format!("I need help! My location: {url}");
    match self.platform.share_text(SHARE_TITLE, &text).await {
      Ok(()) => Ok(()),
      Err(ShareError::Unsupported) => {
        self
          .platform
          .copy_text(&format!("Emergency Location: {url}"))
          .inspect_err(|e| tracing::warn!(error = %e, "clipboard fallback failed"))?;
        self
          .platform
          .notify(Notice::success("Location copied to clipboard"));
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, "sharing location failed");
        Err(e.into())
      }
    }
  }

  /// Open the dialer for `number`.
  pub fn call(&self, number: &str) {
    tracing::info!(number, "opening dialer");
    self.platform.open_dialer(number);
  }
}
