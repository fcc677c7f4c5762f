//! Append-only records: acknowledgments and the rotation audit trail.
//!
//! Neither table is ever updated. Whether an acknowledgment still counts is
//! decided at read time by comparing its window with the member's current
//! one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{assignment::AssignmentWindow, mystery::MysteryId};

/// A member's confirmation that they meditated on their mystery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgment {
  pub ack_id:     Uuid,
  pub user_id:    Uuid,
  pub mystery_id: MysteryId,
  pub window:     AssignmentWindow,
  pub created_at: DateTime<Utc>,
}

/// Audit record written with every rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rotation {
  pub rotation_id:  Uuid,
  pub group_id:     i64,
  pub performed_by: Uuid,
  /// The group's generation after this rotation was applied.
  pub generation:   i64,
  pub recorded_at:  DateTime<Utc>,
}
