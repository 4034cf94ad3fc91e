//! Device capabilities the controller depends on.
//!
//! Each trait is a seam for one host facility. A terminal client, a test
//! double, or a mobile shell implement them; the controller never reaches
//! for a global.

use std::future::Future;

use civic_core::emergency::{Coordinates, EmergencyRequest};
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// The device could not produce a position fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location unavailable: {reason}")]
pub struct LocationUnavailable {
  pub reason: String,
}

impl LocationUnavailable {
  pub fn new(reason: impl Into<String>) -> Self {
    Self { reason: reason.into() }
  }
}

/// The alert could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("alert dispatch failed: {reason}")]
pub struct DispatchFailed {
  pub reason: String,
}

impl DispatchFailed {
  pub fn new(reason: impl Into<String>) -> Self {
    Self { reason: reason.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
  /// The host has no share sheet; callers fall back to the clipboard.
  #[error("sharing is not supported here")]
  Unsupported,

  #[error("share failed: {0}")]
  Failed(String),
}

// ─── Notices ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Success,
  Info,
  Warning,
  Error,
}

/// A short-lived, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level:   NoticeLevel,
  pub message: String,
}

impl Notice {
  pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
    Self { level, message: message.into() }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Success, message)
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Info, message)
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Warning, message)
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self::new(NoticeLevel::Error, message)
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

pub trait Geolocator {
  fn current_location(
    &self,
  ) -> impl Future<Output = Result<Coordinates, LocationUnavailable>> + Send + '_;
}

pub trait AlertDispatcher {
  /// Deliver `request` to authorities and emergency contacts.
  fn send_emergency_alert<'a>(
    &'a self,
    request: &'a EmergencyRequest,
  ) -> impl Future<Output = Result<(), DispatchFailed>> + Send + 'a;
}

pub trait Dialer {
  /// Hand `number` to the phone dialer. Fire-and-forget.
  fn open_dialer(&self, number: &str);
}

pub trait ShareSheet {
  fn share_text<'a>(
    &'a self,
    title: &'a str,
    text: &'a str,
  ) -> impl Future<Output = Result<(), ShareError>> + Send + 'a;

  fn copy_text(&self, text: &str) -> Result<(), ShareError>;
}

pub trait Notifier {
  fn notify(&self, notice: Notice);
}

/// Everything the controller needs from its host, in one bound.
pub trait Platform:
  Geolocator + AlertDispatcher + Dialer + ShareSheet + Notifier
{
}

impl<T> Platform for T where
  T: Geolocator + AlertDispatcher + Dialer + ShareSheet + Notifier
{
}
