//! Mystery assignment arithmetic.
//!
//! A member's mystery is a pure function of their seat (`rose_pos`) and the
//! group's *phase*. The phase combines the group's rotation generation with,
//! under the monthly schedule, the number of months elapsed since an anchor
//! period:
//!
//! ```text
//! phase      = (generation + calendar_shift) mod 20
//! mystery_id = ((rose_pos - 1 + phase) mod 20) + 1
//! ```
//!
//! Nothing here reads the clock; callers pass the [`Period`] in.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  mystery::{CYCLE_LEN, Mystery, MysteryId},
};

// ─── Period ──────────────────────────────────────────────────────────────────

/// A calendar month, written `YYYY-MM`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
  year:  i32,
  month: u32,
}

impl Period {
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(Error::InvalidMonth(month));
    }
    Ok(Self { year, month })
  }

  pub fn from_date(date: NaiveDate) -> Self {
    Self { year: date.year(), month: date.month() }
  }

  /// The period containing the current UTC instant.
  pub fn current() -> Self { Self::from_date(Utc::now().date_naive()) }

  pub fn year(self) -> i32 { self.year }

  pub fn month(self) -> u32 { self.month }

  /// Months since year 0; consecutive periods differ by exactly one.
  pub fn index(self) -> i64 {
    i64::from(self.year) * 12 + i64::from(self.month) - 1
  }

  pub fn next(self) -> Self {
    if self.month == 12 {
      Self { year: self.year + 1, month: 1 }
    } else {
      Self { year: self.year, month: self.month + 1 }
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

impl FromStr for Period {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidPeriod(s.to_owned());
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Self::new(year, month)
  }
}

impl TryFrom<String> for Period {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<Period> for String {
  fn from(p: Period) -> Self { p.to_string() }
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// How a group's phase advances over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RotationSchedule {
  /// The phase only moves when an administrator rotates the group.
  #[default]
  Manual,
  /// The phase also advances by one every calendar month after `anchor`.
  Monthly { anchor: Period },
}

impl RotationSchedule {
  /// Steps contributed by the calendar for `period`, already reduced mod 20.
  pub fn calendar_shift(&self, period: Period) -> u32 {
    match self {
      Self::Manual => 0,
      Self::Monthly { anchor } => (period.index() - anchor.index())
        .rem_euclid(i64::from(CYCLE_LEN)) as u32,
    }
  }

  /// The phase of a group at `generation` during `period`.
  pub fn phase(&self, generation: i64, period: Period) -> u32 {
    let rotations = generation.rem_euclid(i64::from(CYCLE_LEN)) as u32;
    (rotations + self.calendar_shift(period)) % u32::from(CYCLE_LEN)
  }

  /// The window during which a seated member's assignment stays constant.
  pub fn window(
    &self,
    group_id: i64,
    generation: i64,
    seating: i64,
    period: Period,
  ) -> AssignmentWindow {
    AssignmentWindow {
      group_id,
      generation,
      seating,
      period: match self {
        Self::Manual => None,
        Self::Monthly { .. } => Some(period),
      },
    }
  }
}

/// Identifies the stretch of time in which a member's assignment is fixed.
/// Acknowledgments are scoped to one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWindow {
  pub group_id:   i64,
  pub generation: i64,
  /// Counts the member's seat changes. Leaving and rejoining a group, or
  /// sliding up when a seat ahead is closed, opens a fresh window even when
  /// group and generation are unchanged.
  pub seating:    i64,
  /// Only set under [`RotationSchedule::Monthly`], where the calendar also
  /// moves the window.
  pub period:     Option<Period>,
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// Map a seat to its mystery for the given phase.
///
/// Positions start at 1; a zero position has no mystery.
pub fn mystery_for_position(rose_pos: u32, phase: u32) -> Option<MysteryId> {
  let seat = rose_pos.checked_sub(1)?;
  let cycle = u32::from(CYCLE_LEN);
  Some(MysteryId::from_offset(seat % cycle + phase % cycle))
}

/// What a member sees for their current assignment.
///
/// `ComputeError` keeps a failed lookup distinguishable from a member who
/// simply has no seat, while still letting the caller render "no mystery".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentStatus {
  Assigned { mystery: Mystery },
  Unassigned,
  ComputeError { reason: String },
}

impl AssignmentStatus {
  pub fn mystery_id(&self) -> Option<MysteryId> {
    match self {
      Self::Assigned { mystery } => Some(mystery.id),
      _ => None,
    }
  }
}

impl From<Option<MysteryId>> for AssignmentStatus {
  fn from(id: Option<MysteryId>) -> Self {
    match id {
      Some(id) => Self::Assigned { mystery: id.mystery() },
      None => Self::Unassigned,
    }
  }
}
