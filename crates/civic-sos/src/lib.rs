//! The emergency SOS controller.
//!
//! [`SosController`] is a small state machine that arms a countdown, captures
//! the reporter's location, and dispatches an
//! [`EmergencyRequest`](civic_core::emergency::EmergencyRequest) when the
//! countdown expires unless it is cancelled first. Everything it talks to
//! (geolocation, the alert channel, the dialer, sharing, notifications and
//! the countdown timer) is injected through the traits in [`capability`] and
//! [`scheduler`].

pub mod capability;
pub mod controller;
pub mod error;
pub mod scheduler;

pub use controller::{
  DEFAULT_COUNTDOWN_SECS, DispatchReport, SosController, SosState, TickOutcome,
};
pub use error::{Error, Operation, Result};
