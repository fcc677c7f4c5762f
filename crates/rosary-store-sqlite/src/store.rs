//! [`SqliteStore`] — the SQLite implementation of [`RosaryStore`].

use std::path::Path;

use chrono::Utc;
use rosary_core::{
  assignment::{AssignmentWindow, Period, RotationSchedule, mystery_for_position},
  intention::{Intention, NewIntention},
  ledger::{Acknowledgment, Rotation},
  mystery::MysteryId,
  roster::{Group, MAX_MEMBERS, MemberAssignment, NewProfile, Profile, Role},
  store::RosaryStore,
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawAck, RawGroup, RawIntention, RawProfile, RawRotation, encode_dt,
    encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

type CoreError = rosary_core::Error;

// ─── Closure outcomes ────────────────────────────────────────────────────────

/// Result of a closure run on the connection thread. Domain rejections travel
/// back as values so the transaction is dropped (rolled back) before the
/// error is raised.
enum Outcome<T> {
  Done(T),
  Rejected(CoreError),
}

impl<T> Outcome<T> {
  fn into_result(self) -> Result<T> {
    match self {
      Self::Done(v) => Ok(v),
      Self::Rejected(e) => Err(e.into()),
    }
  }
}

use Outcome::{Done, Rejected};

// ─── Row-level helpers (run on the connection thread) ────────────────────────

fn load_group(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawGroup>> {
  conn
    .query_row(
      &format!("SELECT {} FROM rose_groups WHERE group_id = ?1", RawGroup::COLUMNS),
      rusqlite::params![id],
      RawGroup::from_row,
    )
    .optional()
}

fn load_profile(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawProfile>> {
  conn
    .query_row(
      &format!("SELECT {} FROM profiles WHERE profile_id = ?1", RawProfile::COLUMNS),
      rusqlite::params![id],
      RawProfile::from_row,
    )
    .optional()
}

fn load_members(conn: &Connection, group_id: i64) -> rusqlite::Result<Vec<RawProfile>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM profiles WHERE group_id = ?1 ORDER BY rose_pos",
    RawProfile::COLUMNS
  ))?;
  stmt
    .query_map(rusqlite::params![group_id], RawProfile::from_row)?
    .collect()
}

fn member_count(conn: &Connection, group_id: i64) -> rusqlite::Result<u32> {
  conn.query_row(
    "SELECT COUNT(*) FROM profiles WHERE group_id = ?1",
    rusqlite::params![group_id],
    |r| r.get(0),
  )
}

/// The seat a newcomer to `group_id` takes: one past the current last seat.
fn next_seat(conn: &Connection, group_id: i64) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COALESCE(MAX(rose_pos), 0) + 1 FROM profiles WHERE group_id = ?1",
    rusqlite::params![group_id],
    |r| r.get(0),
  )
}

/// Check that `group_id` exists and has room for one more member.
fn check_room(conn: &Connection, group_id: i64) -> rusqlite::Result<Option<CoreError>> {
  if load_group(conn, group_id)?.is_none() {
    return Ok(Some(CoreError::GroupNotFound(group_id)));
  }
  if member_count(conn, group_id)? >= MAX_MEMBERS {
    return Ok(Some(CoreError::GroupFull(group_id)));
  }
  Ok(None)
}

/// Shift every seat behind `rose_pos` down by one after it was vacated. Each
/// shifted member starts a new seating.
///
/// Positions are negated first and flipped back second, so the unique
/// `(group_id, rose_pos)` index never observes two rows on one seat.
fn close_seat(conn: &Connection, group_id: i64, rose_pos: i64) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE profiles SET rose_pos = -(rose_pos - 1), seating = seating + 1
     WHERE group_id = ?1 AND rose_pos > ?2",
    rusqlite::params![group_id, rose_pos],
  )?;
  conn.execute(
    "UPDATE profiles SET rose_pos = -rose_pos WHERE group_id = ?1 AND rose_pos < 0",
    rusqlite::params![group_id],
  )?;
  Ok(())
}

/// A member's current window and mystery, resolved in a single read.
struct Seat {
  window:     AssignmentWindow,
  mystery_id: MysteryId,
}

/// Resolve the member's seat. The outer `Option` is `None` when the profile
/// does not exist; the inner one when the member has no seat.
fn load_seat(
  conn: &Connection,
  user_id: &str,
  schedule: RotationSchedule,
  period: Period,
) -> rusqlite::Result<Option<Option<Seat>>> {
  let row: Option<(Option<i64>, Option<i64>, i64, Option<i64>)> = conn
    .query_row(
      "SELECT p.group_id, p.rose_pos, p.seating, g.generation
       FROM profiles p
       LEFT JOIN rose_groups g ON g.group_id = p.group_id
       WHERE p.profile_id = ?1",
      rusqlite::params![user_id],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )
    .optional()?;

  Ok(row.map(|(group_id, rose_pos, seating, generation)| {
    let (group_id, rose_pos, generation) = (group_id?, rose_pos?, generation?);
    seat_for(schedule, period, group_id, generation, seating, rose_pos)
  }))
}

fn seat_for(
  schedule: RotationSchedule,
  period: Period,
  group_id: i64,
  generation: i64,
  seating: i64,
  rose_pos: i64,
) -> Option<Seat> {
  let rose_pos = u32::try_from(rose_pos).ok()?;
  let phase = schedule.phase(generation, period);
  Some(Seat {
    window:     schedule.window(group_id, generation, seating, period),
    mystery_id: mystery_for_position(rose_pos, phase)?,
  })
}

fn acknowledged_in(
  conn: &Connection,
  user_id: &str,
  mystery_id: MysteryId,
  window: &AssignmentWindow,
) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS (
       SELECT 1 FROM acknowledgments
       WHERE user_id = ?1 AND mystery_id = ?2
         AND group_id = ?3 AND generation = ?4 AND seating = ?5
         AND period IS ?6
     )",
    rusqlite::params![
      user_id,
      i64::from(mystery_id),
      window.group_id,
      window.generation,
      window.seating,
      window.period.map(|p| p.to_string()),
    ],
    |r| r.get(0),
  )
}

fn validated_name(name: &str) -> Option<String> {
  let trimmed = name.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rosary store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  schedule: RotationSchedule,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, schedule: RotationSchedule::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, schedule: RotationSchedule::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Compute phases with `schedule` instead of the manual default.
  pub fn with_schedule(mut self, schedule: RotationSchedule) -> Self {
    self.schedule = schedule;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_profile(&self, id: Uuid) -> Result<Profile> {
    self
      .get_profile(id)
      .await?
      .ok_or_else(|| CoreError::ProfileNotFound(id).into())
  }
}

// ─── RosaryStore impl ────────────────────────────────────────────────────────

impl RosaryStore for SqliteStore {
  type Error = Error;

  fn schedule(&self) -> RotationSchedule { self.schedule }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn create_group(&self, name: String) -> Result<Group> {
    let name = validated_name(&name).ok_or(CoreError::EmptyName)?;
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let stored_name = name.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rose_groups (name, created_at) VALUES (?1, ?2)",
          rusqlite::params![stored_name, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Group { id, name, created_at, generation: 0 })
  }

  async fn rename_group(&self, id: i64, name: String) -> Result<Group> {
    let name = validated_name(&name).ok_or(CoreError::EmptyName)?;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE rose_groups SET name = ?1 WHERE group_id = ?2",
          rusqlite::params![name, id],
        )?;
        if changed == 0 {
          return Ok(Rejected(CoreError::GroupNotFound(id)));
        }
        Ok(load_group(conn, id)?.map_or(Rejected(CoreError::GroupNotFound(id)), Done))
      })
      .await?
      .into_result()?;

    raw.into_group()
  }

  async fn get_group(&self, id: i64) -> Result<Option<Group>> {
    let raw = self.conn.call(move |conn| Ok(load_group(conn, id)?)).await?;
    raw.map(RawGroup::into_group).transpose()
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let raws: Vec<RawGroup> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM rose_groups ORDER BY group_id",
          RawGroup::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawGroup::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGroup::into_group).collect()
  }

  async fn delete_group(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if load_group(&tx, id)?.is_none() {
          return Ok(Rejected(CoreError::GroupNotFound(id)));
        }
        let members = member_count(&tx, id)?;
        if members > 0 {
          return Ok(Rejected(CoreError::GroupNotEmpty { group_id: id, members }));
        }
        tx.execute("DELETE FROM rose_groups WHERE group_id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Done(()))
      })
      .await?
      .into_result()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
    let full_name = validated_name(&input.full_name).ok_or(CoreError::EmptyName)?;
    let email = input.email.trim().to_lowercase();
    let id = Uuid::new_v4();
    let id_str = encode_uuid(id);
    let role_str = encode_role(input.role);
    let group_id = input.group_id;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken: bool = tx.query_row(
          "SELECT EXISTS (SELECT 1 FROM profiles WHERE email = ?1)",
          rusqlite::params![email],
          |r| r.get(0),
        )?;
        if taken {
          return Ok(Rejected(CoreError::EmailTaken(email)));
        }

        let rose_pos = match group_id {
          Some(g) => {
            if let Some(rejection) = check_room(&tx, g)? {
              return Ok(Rejected(rejection));
            }
            Some(next_seat(&tx, g)?)
          }
          None => None,
        };

        tx.execute(
          "INSERT INTO profiles (profile_id, full_name, email, role, group_id, rose_pos)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, full_name, email, role_str, group_id, rose_pos],
        )?;
        tx.commit()?;
        Ok(Done(()))
      })
      .await?
      .into_result()?;

    self.fetch_profile(id).await
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_profile(conn, &id_str)?))
      .await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self, group_id: Option<i64>) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let Some(g) = group_id else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM profiles ORDER BY full_name, email",
            RawProfile::COLUMNS
          ))?;
          let rows = stmt
            .query_map([], RawProfile::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          return Ok(Done(rows));
        };
        if load_group(conn, g)?.is_none() {
          return Ok(Rejected(CoreError::GroupNotFound(g)));
        }
        Ok(Done(load_members(conn, g)?))
      })
      .await?
      .into_result()?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<Profile> {
    let id_str = encode_uuid(id);
    let role_str = encode_role(role);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET role = ?1 WHERE profile_id = ?2",
          rusqlite::params![role_str, id_str],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(CoreError::ProfileNotFound(id).into());
    }

    self.fetch_profile(id).await
  }

  async fn move_user_to_group(&self, user_id: Uuid, group_id: Option<i64>) -> Result<Profile> {
    let id_str = encode_uuid(user_id);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(current) = load_profile(&tx, &id_str)? else {
          return Ok(Rejected(CoreError::ProfileNotFound(user_id)));
        };
        if current.group_id == group_id {
          return Ok(Done(current));
        }
        if let Some(g) = group_id
          && let Some(rejection) = check_room(&tx, g)?
        {
          return Ok(Rejected(rejection));
        }

        if let (Some(old_group), Some(old_pos)) = (current.group_id, current.rose_pos) {
          tx.execute(
            "UPDATE profiles SET group_id = NULL, rose_pos = NULL, seating = seating + 1
             WHERE profile_id = ?1",
            rusqlite::params![id_str],
          )?;
          close_seat(&tx, old_group, old_pos)?;
        }

        if let Some(g) = group_id {
          let seat = next_seat(&tx, g)?;
          tx.execute(
            "UPDATE profiles SET group_id = ?1, rose_pos = ?2, seating = seating + 1
             WHERE profile_id = ?3",
            rusqlite::params![g, seat, id_str],
          )?;
        }

        let moved = load_profile(&tx, &id_str)?;
        tx.commit()?;
        Ok(moved.map_or(Rejected(CoreError::ProfileNotFound(user_id)), Done))
      })
      .await?
      .into_result()?;

    raw.into_profile()
  }

  async fn delete_profile(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(current) = load_profile(&tx, &id_str)? else {
          return Ok(Rejected(CoreError::ProfileNotFound(id)));
        };
        tx.execute(
          "DELETE FROM acknowledgments WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute("DELETE FROM profiles WHERE profile_id = ?1", rusqlite::params![id_str])?;
        if let (Some(group_id), Some(rose_pos)) = (current.group_id, current.rose_pos) {
          close_seat(&tx, group_id, rose_pos)?;
        }
        tx.commit()?;
        Ok(Done(()))
      })
      .await?
      .into_result()
  }

  // ── Assignment ────────────────────────────────────────────────────────────

  async fn get_mystery_id_for_user(
    &self,
    user_id: Uuid,
    period: Period,
  ) -> Result<Option<MysteryId>> {
    let id_str = encode_uuid(user_id);
    let schedule = self.schedule;

    let seat = self
      .conn
      .call(move |conn| Ok(load_seat(conn, &id_str, schedule, period)?))
      .await?
      .ok_or(CoreError::ProfileNotFound(user_id))?;

    Ok(seat.map(|s| s.mystery_id))
  }

  async fn group_assignments(
    &self,
    group_id: i64,
    period: Period,
  ) -> Result<Vec<MemberAssignment>> {
    let schedule = self.schedule;

    let rows: Vec<(RawProfile, MysteryId, bool)> = self
      .conn
      .call(move |conn| {
        let Some(group) = load_group(conn, group_id)? else {
          return Ok(Rejected(CoreError::GroupNotFound(group_id)));
        };
        let mut rows = Vec::new();
        for member in load_members(conn, group_id)? {
          let Some(seat) = member.rose_pos.and_then(|pos| {
            seat_for(schedule, period, group_id, group.generation, member.seating, pos)
          }) else {
            continue;
          };
          let acknowledged =
            acknowledged_in(conn, &member.profile_id, seat.mystery_id, &seat.window)?;
          rows.push((member, seat.mystery_id, acknowledged));
        }
        Ok(Done(rows))
      })
      .await?
      .into_result()?;

    rows
      .into_iter()
      .map(|(raw, mystery_id, acknowledged)| {
        Ok(MemberAssignment { profile: raw.into_profile()?, mystery_id, acknowledged })
      })
      .collect()
  }

  // ── Rotation ──────────────────────────────────────────────────────────────

  async fn rotate_group_members(
    &self,
    group_id: i64,
    performed_by: Uuid,
  ) -> Result<Option<Rotation>> {
    let rotation_id_str = encode_uuid(Uuid::new_v4());
    let actor_str = encode_uuid(performed_by);
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawRotation> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if load_group(&tx, group_id)?.is_none() {
          return Ok(Rejected(CoreError::GroupNotFound(group_id)));
        }
        match load_profile(&tx, &actor_str)? {
          None => return Ok(Rejected(CoreError::ProfileNotFound(performed_by))),
          Some(actor) if !actor.is_admin() => {
            return Ok(Rejected(CoreError::NotAdmin(performed_by)));
          }
          Some(_) => {}
        }
        if member_count(&tx, group_id)? == 0 {
          return Ok(Done(None));
        }

        tx.execute(
          "UPDATE rose_groups SET generation = generation + 1 WHERE group_id = ?1",
          rusqlite::params![group_id],
        )?;
        let generation: i64 = tx.query_row(
          "SELECT generation FROM rose_groups WHERE group_id = ?1",
          rusqlite::params![group_id],
          |r| r.get(0),
        )?;
        tx.execute(
          "INSERT INTO rotations (rotation_id, group_id, performed_by, generation, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![rotation_id_str, group_id, actor_str, generation, at_str],
        )?;
        tx.commit()?;

        Ok(Done(Some(RawRotation {
          rotation_id: rotation_id_str,
          group_id,
          performed_by: actor_str,
          generation,
          recorded_at: at_str,
        })))
      })
      .await?
      .into_result()?;

    raw.map(RawRotation::into_rotation).transpose()
  }

  async fn list_rotations(&self, group_id: i64) -> Result<Vec<Rotation>> {
    let raws: Vec<RawRotation> = self
      .conn
      .call(move |conn| {
        if load_group(conn, group_id)?.is_none() {
          return Ok(Rejected(CoreError::GroupNotFound(group_id)));
        }
        let mut stmt = conn.prepare(
          "SELECT rotation_id, group_id, performed_by, generation, recorded_at
           FROM rotations WHERE group_id = ?1
           ORDER BY generation DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![group_id], RawRotation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Done(rows))
      })
      .await?
      .into_result()?;

    raws.into_iter().map(RawRotation::into_rotation).collect()
  }

  // ── Acknowledgments ───────────────────────────────────────────────────────

  async fn acknowledge_mystery(
    &self,
    user_id: Uuid,
    mystery_id: MysteryId,
    period: Period,
  ) -> Result<Acknowledgment> {
    let user_str = encode_uuid(user_id);
    let ack_id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());
    let schedule = self.schedule;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let seat = match load_seat(&tx, &user_str, schedule, period)? {
          None => return Ok(Rejected(CoreError::ProfileNotFound(user_id))),
          Some(None) => return Ok(Rejected(CoreError::NotAssigned(user_id))),
          Some(Some(seat)) => seat,
        };
        if seat.mystery_id != mystery_id {
          return Ok(Rejected(CoreError::MysteryMismatch {
            expected: seat.mystery_id,
            got:      mystery_id,
          }));
        }

        let period_str = seat.window.period.map(|p| p.to_string());
        tx.execute(
          "INSERT INTO acknowledgments
             (ack_id, user_id, mystery_id, group_id, generation, seating, period, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            ack_id_str,
            user_str,
            i64::from(mystery_id),
            seat.window.group_id,
            seat.window.generation,
            seat.window.seating,
            period_str,
            at_str,
          ],
        )?;
        tx.commit()?;

        Ok(Done(RawAck {
          ack_id:     ack_id_str,
          user_id:    user_str,
          mystery_id: i64::from(mystery_id),
          group_id:   seat.window.group_id,
          generation: seat.window.generation,
          seating:    seat.window.seating,
          period:     period_str,
          created_at: at_str,
        }))
      })
      .await?
      .into_result()?;

    raw.into_ack()
  }

  async fn check_acknowledgment(
    &self,
    user_id: Uuid,
    mystery_id: MysteryId,
    period: Period,
  ) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let schedule = self.schedule;

    self
      .conn
      .call(move |conn| {
        let seat = match load_seat(conn, &user_str, schedule, period)? {
          None => return Ok(Rejected(CoreError::ProfileNotFound(user_id))),
          Some(None) => return Ok(Done(false)),
          Some(Some(seat)) => seat,
        };
        if seat.mystery_id != mystery_id {
          return Ok(Done(false));
        }
        Ok(Done(acknowledged_in(conn, &user_str, mystery_id, &seat.window)?))
      })
      .await?
      .into_result()
  }

  // ── Intentions ────────────────────────────────────────────────────────────

  async fn upsert_intention(&self, input: NewIntention) -> Result<Intention> {
    let title = validated_name(&input.title).ok_or(CoreError::EmptyName)?;
    let updated_at = Utc::now();
    let at_str = encode_dt(updated_at);
    let (year, month) = (input.period.year(), input.period.month());
    let (stored_title, content) = (title.clone(), input.content.clone());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO intentions (year, month, title, content, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (year, month) DO UPDATE SET
             title      = excluded.title,
             content    = excluded.content,
             updated_at = excluded.updated_at",
          rusqlite::params![year, month, stored_title, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Intention { period: input.period, title, content: input.content, updated_at })
  }

  async fn get_intention(&self, period: Period) -> Result<Option<Intention>> {
    let (year, month) = (period.year(), period.month());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT year, month, title, content, updated_at
               FROM intentions WHERE year = ?1 AND month = ?2",
              rusqlite::params![year, month],
              RawIntention::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIntention::into_intention).transpose()
  }

  async fn list_intentions(&self, year: Option<i32>) -> Result<Vec<Intention>> {
    let raws: Vec<RawIntention> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT year, month, title, content, updated_at
           FROM intentions
           WHERE ?1 IS NULL OR year = ?1
           ORDER BY year DESC, month DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![year], RawIntention::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIntention::into_intention).collect()
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Run raw SQL against the connection; tests use it to plant triggers.
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Audit rows stored for `group_id`, whether or not the group still exists.
  pub(crate) async fn rotation_rows(&self, group_id: i64) -> Result<i64> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM rotations WHERE group_id = ?1",
          rusqlite::params![group_id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(n)
  }

  pub(crate) async fn seats(&self, group_id: i64) -> Result<Vec<(Uuid, u32)>> {
    self
      .list_profiles(Some(group_id))
      .await?
      .into_iter()
      .map(|p| Ok((p.id, p.rose_pos.unwrap_or_default())))
      .collect()
  }
}

