//! Error types for `civic-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  #[error("complaint not found: {0}")]
  ComplaintNotFound(Uuid),

  #[error("blood request not found: {0}")]
  BloodRequestNotFound(Uuid),

  #[error("fundraiser not found: {0}")]
  FundraiserNotFound(Uuid),

  #[error("fundraiser {0} has already reached its goal")]
  GoalReached(Uuid),

  #[error("donation amount must be positive, got {0}")]
  InvalidAmount(f64),

  #[error("chat message is empty")]
  EmptyMessage,

  #[error("{0}")]
  Validation(#[from] ValidationErrors),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
