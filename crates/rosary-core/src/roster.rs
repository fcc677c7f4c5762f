//! Groups ("Roses") and the member profiles seated in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::mystery::{CYCLE_LEN, MysteryId};

/// Most members a single Rose can hold: one per mystery.
pub const MAX_MEMBERS: u32 = CYCLE_LEN as u32;

/// A prayer group whose members share one rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:         i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  /// Number of rotations applied so far. Starts at 0, never decreases.
  pub generation: i64,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  User,
}

/// A member of the parish, optionally seated in a group.
///
/// `group_id` and `rose_pos` are either both set or both empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:        Uuid,
  pub full_name: String,
  pub email:     String,
  pub role:      Role,
  pub group_id:  Option<i64>,
  pub rose_pos:  Option<u32>,
}

impl Profile {
  pub fn is_admin(&self) -> bool { self.role == Role::Admin }

  /// The member's seat, if they have one.
  pub fn seat(&self) -> Option<(i64, u32)> { self.group_id.zip(self.rose_pos) }
}

/// Input to [`crate::store::RosaryStore::create_profile`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
  pub full_name: String,
  pub email:     String,
  #[serde(default)]
  pub role:      Role,
  /// Seat the new member at the end of this group right away.
  #[serde(default)]
  pub group_id:  Option<i64>,
}

impl NewProfile {
  pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      full_name: full_name.into(),
      email:     email.into(),
      role:      Role::User,
      group_id:  None,
    }
  }
}

/// One row of a group's assignment overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAssignment {
  pub profile:      Profile,
  pub mystery_id:   MysteryId,
  pub acknowledged: bool,
}
