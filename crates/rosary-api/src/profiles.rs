//! Handlers for `/profiles` endpoints, including a member's mystery and
//! acknowledgments.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profiles` | Optional `?group_id=<id>` (seat order) |
//! | `POST`   | `/profiles` | Body: [`NewProfile`]; returns 201 |
//! | `GET`    | `/profiles/:id` | 404 if not found |
//! | `DELETE` | `/profiles/:id` | Closes the member's seat |
//! | `PUT`    | `/profiles/:id/group` | Body: `{"group_id":<id>\|null}` |
//! | `PUT`    | `/profiles/:id/role` | Body: `{"role":"admin"\|"user"}` |
//! | `GET`    | `/profiles/:id/mystery` | Tagged [`AssignmentStatus`]; `?period=` |
//! | `POST`   | `/profiles/:id/acknowledgments` | Body: `{"mystery_id":n}`; returns 201 |
//! | `GET`    | `/profiles/:id/acknowledgments/:mystery_id` | `{"acknowledged":bool}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rosary_core::{
  DomainError as _,
  assignment::{AssignmentStatus, Period},
  mystery::MysteryId,
  roster::{NewProfile, Profile, Role},
  store::RosaryStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PeriodParams, error::ApiError};

// ─── List / get ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub group_id: Option<i64>,
}

/// `GET /profiles[?group_id=<id>]`
pub async fn list<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Profile>>, ApiError> {
  let profiles = store
    .list_profiles(params.group_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profiles))
}

/// `GET /profiles/:id`
pub async fn get_one<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
  let profile = store
    .get_profile(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}

// ─── Create / delete ──────────────────────────────────────────────────────────

/// `POST /profiles`
pub async fn create<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewProfile>,
) -> Result<impl IntoResponse, ApiError> {
  let profile = store.create_profile(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// `DELETE /profiles/:id`
pub async fn delete_one<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_profile(id).await.map_err(ApiError::store)?;
  tracing::info!(profile_id = %id, "profile deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Membership / role ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  /// Target group; `null` removes the member from their group.
  pub group_id: Option<i64>,
}

/// `PUT /profiles/:id/group`
pub async fn move_group<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MoveBody>,
) -> Result<Json<Profile>, ApiError> {
  let profile = store
    .move_user_to_group(id, body.group_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    profile_id = %id,
    group_id = ?profile.group_id,
    rose_pos = ?profile.rose_pos,
    "profile moved"
  );
  Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub role: Role,
}

/// `PUT /profiles/:id/role`
pub async fn set_role<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RoleBody>,
) -> Result<Json<Profile>, ApiError> {
  let profile = store.set_role(id, body.role).await.map_err(ApiError::store)?;
  Ok(Json(profile))
}

// ─── Mystery ──────────────────────────────────────────────────────────────────

/// `GET /profiles/:id/mystery[?period=YYYY-MM]`
///
/// A storage failure does not fail the request: it is logged and reported as
/// `compute_error`, which clients render like `unassigned`. Domain failures
/// (unknown profile) still map to their status codes.
pub async fn mystery<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<PeriodParams>,
) -> Result<Json<AssignmentStatus>, ApiError> {
  let period = params.resolve();
  match store.get_mystery_id_for_user(id, period).await {
    Ok(found) => Ok(Json(AssignmentStatus::from(found))),
    Err(e) => match e.domain() {
      Some(domain) => Err(ApiError::from_domain(domain)),
      None => {
        tracing::error!(
          profile_id = %id,
          %period,
          error = %e,
          "mystery lookup failed; reporting no assignment"
        );
        Ok(Json(AssignmentStatus::ComputeError { reason: e.to_string() }))
      }
    },
  }
}

// ─── Acknowledgments ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcknowledgeBody {
  pub mystery_id: MysteryId,
}

/// `POST /profiles/:id/acknowledgments`
///
/// Always acknowledges the mystery of the current month; unlike the reads,
/// this endpoint takes no `period`.
pub async fn acknowledge<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AcknowledgeBody>,
) -> Result<impl IntoResponse, ApiError> {
  let ack = store
    .acknowledge_mystery(id, body.mystery_id, Period::current())
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(ack)))
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
  pub mystery_id:   MysteryId,
  pub acknowledged: bool,
}

/// `GET /profiles/:id/acknowledgments/:mystery_id[?period=YYYY-MM]`
pub async fn check<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path((id, mystery_id)): Path<(Uuid, i64)>,
  Query(params): Query<PeriodParams>,
) -> Result<Json<CheckResponse>, ApiError> {
  let mystery_id = MysteryId::new(mystery_id)?;
  let acknowledged = store
    .check_acknowledgment(id, mystery_id, params.resolve())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(CheckResponse { mystery_id, acknowledged }))
}
