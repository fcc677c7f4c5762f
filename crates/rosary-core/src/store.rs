//! The `RosaryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rosary-store-sqlite`).
//! Higher layers (`rosary-api`, `rosary-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Backends own the transactional boundary: every operation that touches more
//! than one row (rotation, moving a member, deleting a member) must either
//! apply completely or not at all.

use std::future::Future;

use uuid::Uuid;

use crate::{
  DomainError,
  assignment::{Period, RotationSchedule},
  intention::{Intention, NewIntention},
  ledger::{Acknowledgment, Rotation},
  mystery::MysteryId,
  roster::{Group, MemberAssignment, NewProfile, Profile, Role},
};

/// Abstraction over a Rosary store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RosaryStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  /// The schedule this store computes phases with.
  fn schedule(&self) -> RotationSchedule;

  // ── Groups ────────────────────────────────────────────────────────────

  fn create_group(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn rename_group(
    &self,
    id: i64,
    name: String,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  /// Retrieve a group by id. Returns `None` if not found.
  fn get_group(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Delete an empty group. Fails with `GroupNotEmpty` while any member is
  /// still seated in it.
  fn delete_group(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create a profile. If `input.group_id` is set the member is seated at the
  /// end of that group.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// List profiles, optionally restricted to one group (ordered by seat).
  fn list_profiles(
    &self,
    group_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn set_role(
    &self,
    id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Move a member to another group (appended at the last seat) or out of
  /// any group. The seats left behind are closed up so positions stay
  /// contiguous.
  fn move_user_to_group(
    &self,
    user_id: Uuid,
    group_id: Option<i64>,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Delete a profile together with its acknowledgments, closing up its seat.
  fn delete_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Assignment ────────────────────────────────────────────────────────

  /// The member's mystery during `period`, or `None` if they have no seat.
  fn get_mystery_id_for_user(
    &self,
    user_id: Uuid,
    period: Period,
  ) -> impl Future<Output = Result<Option<MysteryId>, Self::Error>> + Send + '_;

  /// Every member of a group with their mystery and acknowledgment state,
  /// ordered by seat.
  fn group_assignments(
    &self,
    group_id: i64,
    period: Period,
  ) -> impl Future<Output = Result<Vec<MemberAssignment>, Self::Error>> + Send + '_;

  // ── Rotation ──────────────────────────────────────────────────────────

  /// Advance every member of the group by one mystery, atomically.
  ///
  /// `performed_by` must be an administrator. Returns `None` without
  /// changing anything when the group has no members. Not idempotent.
  fn rotate_group_members(
    &self,
    group_id: i64,
    performed_by: Uuid,
  ) -> impl Future<Output = Result<Option<Rotation>, Self::Error>> + Send + '_;

  /// The rotation audit trail of a group, newest first.
  fn list_rotations(
    &self,
    group_id: i64,
  ) -> impl Future<Output = Result<Vec<Rotation>, Self::Error>> + Send + '_;

  // ── Acknowledgments ───────────────────────────────────────────────────

  /// Append an acknowledgment for the member's current mystery. Repeated
  /// calls append repeated rows.
  fn acknowledge_mystery(
    &self,
    user_id: Uuid,
    mystery_id: MysteryId,
    period: Period,
  ) -> impl Future<Output = Result<Acknowledgment, Self::Error>> + Send + '_;

  /// Whether the member acknowledged `mystery_id` within their current
  /// assignment window.
  fn check_acknowledgment(
    &self,
    user_id: Uuid,
    mystery_id: MysteryId,
    period: Period,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Intentions ────────────────────────────────────────────────────────

  fn upsert_intention(
    &self,
    input: NewIntention,
  ) -> impl Future<Output = Result<Intention, Self::Error>> + Send + '_;

  fn get_intention(
    &self,
    period: Period,
  ) -> impl Future<Output = Result<Option<Intention>, Self::Error>> + Send + '_;

  /// List intentions, newest month first, optionally for a single year.
  fn list_intentions(
    &self,
    year: Option<i32>,
  ) -> impl Future<Output = Result<Vec<Intention>, Self::Error>> + Send + '_;
}
