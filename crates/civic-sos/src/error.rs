//! Error type for `civic-sos`.

use strum::Display;
use thiserror::Error;

use crate::{capability::ShareError, controller::SosState};

/// A controller operation that is only legal in some states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
  Activate,
  Tick,
  Cancel,
}

#[derive(Debug, Error)]
pub enum Error {
  /// The operation is not valid in the current state. Nothing was changed.
  #[error("cannot {operation} while {state}")]
  InvalidTransition { operation: Operation, state: SosState },

  /// Sharing was requested before any location was captured.
  #[error("location not available")]
  NoLocation,

  #[error(transparent)]
  Share(#[from] ShareError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
