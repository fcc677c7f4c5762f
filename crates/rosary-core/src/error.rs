//! Error types for `rosary-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::mystery::MysteryId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("group not found: {0}")]
  GroupNotFound(i64),

  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  #[error("group {group_id} still has {members} member(s)")]
  GroupNotEmpty { group_id: i64, members: u32 },

  #[error("group {0} already has the maximum number of members")]
  GroupFull(i64),

  #[error("profile {0} is not an administrator")]
  NotAdmin(Uuid),

  #[error("profile {0} has no mystery assigned")]
  NotAssigned(Uuid),

  #[error("mystery {got} is not the current assignment (expected {expected})")]
  MysteryMismatch { expected: MysteryId, got: MysteryId },

  #[error("mystery id out of range: {0}")]
  InvalidMystery(i64),

  #[error("month out of range: {0}")]
  InvalidMonth(u32),

  #[error("invalid period {0:?}, expected YYYY-MM")]
  InvalidPeriod(String),

  #[error("name must not be empty")]
  EmptyName,

  #[error("email already registered: {0}")]
  EmailTaken(String),
}

impl Error {
  /// Whether the error means the addressed entity does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::GroupNotFound(_) | Self::ProfileNotFound(_))
  }
}

/// Implemented by backend errors so that callers can recover the domain
/// failure behind an opaque storage error.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

impl DomainError for std::convert::Infallible {
  fn domain(&self) -> Option<&Error> { match *self {} }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
