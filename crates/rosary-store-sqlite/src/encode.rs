//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings, periods as `YYYY-MM`, and roles as their lowercase
//! names.

use chrono::{DateTime, Utc};
use rosary_core::{
  assignment::{AssignmentWindow, Period},
  intention::Intention,
  ledger::{Acknowledgment, Rotation},
  mystery::MysteryId,
  roster::{Group, Profile, Role},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::Decode { column: "role", value: s.to_owned() })
}

// ─── Small scalars ────────────────────────────────────────────────────────────

fn decode_period(s: &str) -> Result<Period> {
  s.parse().map_err(|_| Error::Decode { column: "period", value: s.to_owned() })
}

fn decode_mystery(id: i64) -> Result<MysteryId> {
  MysteryId::new(id).map_err(|_| Error::Decode { column: "mystery_id", value: id.to_string() })
}

fn decode_pos(pos: i64) -> Result<u32> {
  u32::try_from(pos)
    .ok()
    .filter(|p| *p > 0)
    .ok_or_else(|| Error::Decode { column: "rose_pos", value: pos.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `rose_groups` row.
pub struct RawGroup {
  pub group_id:   i64,
  pub name:       String,
  pub created_at: String,
  pub generation: i64,
}

impl RawGroup {
  pub const COLUMNS: &'static str = "group_id, name, created_at, generation";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      group_id:   row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
      generation: row.get(3)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      id:         self.group_id,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      generation: self.generation,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub full_name:  String,
  pub email:      String,
  pub role:       String,
  pub group_id:   Option<i64>,
  pub rose_pos:   Option<i64>,
  pub seating:    i64,
}

impl RawProfile {
  pub const COLUMNS: &'static str =
    "profile_id, full_name, email, role, group_id, rose_pos, seating";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      full_name:  row.get(1)?,
      email:      row.get(2)?,
      role:       row.get(3)?,
      group_id:   row.get(4)?,
      rose_pos:   row.get(5)?,
      seating:    row.get(6)?,
    })
  }

  pub fn is_admin(&self) -> bool { self.role == encode_role(Role::Admin) }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:        decode_uuid(&self.profile_id)?,
      full_name: self.full_name,
      email:     self.email,
      role:      decode_role(&self.role)?,
      group_id:  self.group_id,
      rose_pos:  self.rose_pos.map(decode_pos).transpose()?,
    })
  }
}

/// Raw values read directly from a `rotations` row.
pub struct RawRotation {
  pub rotation_id:  String,
  pub group_id:     i64,
  pub performed_by: String,
  pub generation:   i64,
  pub recorded_at:  String,
}

impl RawRotation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      rotation_id:  row.get(0)?,
      group_id:     row.get(1)?,
      performed_by: row.get(2)?,
      generation:   row.get(3)?,
      recorded_at:  row.get(4)?,
    })
  }

  pub fn into_rotation(self) -> Result<Rotation> {
    Ok(Rotation {
      rotation_id:  decode_uuid(&self.rotation_id)?,
      group_id:     self.group_id,
      performed_by: decode_uuid(&self.performed_by)?,
      generation:   self.generation,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values of an `acknowledgments` row.
pub struct RawAck {
  pub ack_id:     String,
  pub user_id:    String,
  pub mystery_id: i64,
  pub group_id:   i64,
  pub generation: i64,
  pub seating:    i64,
  pub period:     Option<String>,
  pub created_at: String,
}

impl RawAck {
  pub fn into_ack(self) -> Result<Acknowledgment> {
    Ok(Acknowledgment {
      ack_id:     decode_uuid(&self.ack_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      mystery_id: decode_mystery(self.mystery_id)?,
      window:     AssignmentWindow {
        group_id:   self.group_id,
        generation: self.generation,
        seating:    self.seating,
        period:     self.period.as_deref().map(decode_period).transpose()?,
      },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `intentions` row.
pub struct RawIntention {
  pub year:       i32,
  pub month:      u32,
  pub title:      String,
  pub content:    String,
  pub updated_at: String,
}

impl RawIntention {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      year:       row.get(0)?,
      month:      row.get(1)?,
      title:      row.get(2)?,
      content:    row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_intention(self) -> Result<Intention> {
    Ok(Intention {
      period:     Period::new(self.year, self.month).map_err(|_| Error::Decode {
        column: "month",
        value:  self.month.to_string(),
      })?,
      title:      self.title,
      content:    self.content,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_roundtrip_uses_lowercase_names() {
    assert_eq!(encode_role(Role::Admin), "admin");
    assert_eq!(decode_role("user").unwrap(), Role::User);
    assert!(matches!(decode_role("root"), Err(Error::Decode { column: "role", .. })));
  }

  #[test]
  fn corrupt_columns_are_not_domain_errors() {
    assert!(matches!(decode_period("2026-13"), Err(Error::Decode { column: "period", .. })));
    assert!(matches!(decode_mystery(21), Err(Error::Decode { column: "mystery_id", .. })));
  }

  #[test]
  fn non_positive_positions_are_corrupt() {
    assert_eq!(decode_pos(3).unwrap(), 3);
    assert!(decode_pos(0).is_err());
    assert!(decode_pos(-2).is_err());
  }
}
