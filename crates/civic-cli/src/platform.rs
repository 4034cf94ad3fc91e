//! Device capabilities as a terminal can provide them.
//!
//! There is no GPS, phone or share sheet here: the position comes from
//! configuration, dialing is logged, native sharing is unsupported (so the
//! controller falls back to the clipboard), and the "clipboard" is a buffer
//! shown on the SOS screen. Notices queue up for the status bar.

use std::{
  collections::VecDeque,
  sync::{Mutex, MutexGuard, PoisonError},
};

use civic_core::emergency::{Coordinates, EmergencyRequest};
use civic_sos::capability::{
  AlertDispatcher, Dialer, DispatchFailed, Geolocator, LocationUnavailable,
  Notice, Notifier, ShareError, ShareSheet,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TerminalPlatform<D> {
  position:   Option<Coordinates>,
  dispatcher: D,
  notices:    Mutex<VecDeque<Notice>>,
  dialed:     Mutex<Option<String>>,
  clipboard:  Mutex<Option<String>>,
}

impl<D> TerminalPlatform<D> {
  /// `position` is reported as the device location; `None` makes every
  /// lookup fail.
  pub fn new(position: Option<Coordinates>, dispatcher: D) -> Self {
    Self {
      position,
      dispatcher,
      notices: Mutex::default(),
      dialed: Mutex::default(),
      clipboard: Mutex::default(),
    }
  }

  /// Take every queued notice, oldest first.
  pub fn drain_notices(&self) -> Vec<Notice> { lock(&self.notices).drain(..).collect() }

  /// The last `tel:` URI handed to the dialer.
  pub fn last_dialed(&self) -> Option<String> { lock(&self.dialed).clone() }

  pub fn clipboard(&self) -> Option<String> { lock(&self.clipboard).clone() }
}

impl<D: Send + Sync> Geolocator for TerminalPlatform<D> {
  async fn current_location(&self) -> Result<Coordinates, LocationUnavailable> {
    self
      .position
      .ok_or_else(|| LocationUnavailable::new("no position configured"))
  }
}

impl<D: AlertDispatcher + Sync> AlertDispatcher for TerminalPlatform<D> {
  async fn send_emergency_alert(
    &self,
    request: &EmergencyRequest,
  ) -> Result<(), DispatchFailed> {
    self.dispatcher.send_emergency_alert(request).await
  }
}

impl<D> Dialer for TerminalPlatform<D> {
  fn open_dialer(&self, number: &str) {
    let uri = format!("tel:{number}");
    tracing::info!(%uri, "dial requested");
    self.notify(Notice::info(format!("Call {number} from your phone ({uri})")));
    *lock(&self.dialed) = Some(uri);
  }
}

impl<D: Sync> ShareSheet for TerminalPlatform<D> {
  async fn share_text(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
    Err(ShareError::Unsupported)
  }

  fn copy_text(&self, text: &str) -> Result<(), ShareError> {
    *lock(&self.clipboard) = Some(text.to_owned());
    Ok(())
  }
}

impl<D> Notifier for TerminalPlatform<D> {
  fn notify(&self, notice: Notice) {
    tracing::debug!(level = ?notice.level, message = %notice.message, "notice");
    lock(&self.notices).push_back(notice);
  }
}

#[cfg(test)]
mod tests {
  use std::num::NonZeroU32;

  use civic_core::emergency::LocationFix;
  use civic_sos::{SosController, TickOutcome, scheduler::ManualScheduler};

  use super::*;

  struct Recorder(Mutex<Vec<EmergencyRequest>>);

  impl AlertDispatcher for Recorder {
    async fn send_emergency_alert(
      &self,
      request: &EmergencyRequest,
    ) -> Result<(), DispatchFailed> {
      lock(&self.0).push(request.clone());
      Ok(())
    }
  }

  fn platform(position: Option<Coordinates>) -> TerminalPlatform<Recorder> {
    TerminalPlatform::new(position, Recorder(Mutex::default()))
  }

  #[tokio::test]
  async fn share_falls_back_to_internal_clipboard() {
    let p = platform(Some(Coordinates::new(19.076, 72.8777)));
    let mut sos = SosController::new(p, ManualScheduler::default());
    sos.detect_location().await.unwrap();
    sos.share_location().await.unwrap();

    assert_eq!(
      sos.platform().clipboard().as_deref(),
      Some("Emergency Location: https://maps.google.com/?q=19.076,72.8777")
    );
    let messages: Vec<_> = sos
      .platform()
      .drain_notices()
      .into_iter()
      .map(|n| n.message)
      .collect();
    assert_eq!(messages, ["Location detected", "Location copied to clipboard"]);
    assert!(sos.platform().drain_notices().is_empty());
  }

  #[tokio::test]
  async fn unconfigured_position_dispatches_unavailable() {
    let mut sos = SosController::new(platform(None), ManualScheduler::default())
      .with_countdown(NonZeroU32::new(1).unwrap());
    sos.activate().await.unwrap();
    let outcome = sos.tick().await.unwrap();

    let TickOutcome::Dispatched(report) = outcome else {
      panic!("expected dispatch");
    };
    assert_eq!(report.request.location, LocationFix::Unavailable);
    assert_eq!(lock(&sos.platform().dispatcher.0).len(), 1);
  }

  #[test]
  fn dialer_records_tel_uri() {
    let p = platform(None);
    p.open_dialer("102");
    assert_eq!(p.last_dialed().as_deref(), Some("tel:102"));
    assert_eq!(p.drain_notices().len(), 1);
  }
}
