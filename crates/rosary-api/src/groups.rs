//! Handlers for `/groups` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/groups` | All groups |
//! | `POST`   | `/groups` | Body: `{"name":"..."}`; returns 201 |
//! | `GET`    | `/groups/:id` | 404 if not found |
//! | `PATCH`  | `/groups/:id` | Body: `{"name":"..."}` |
//! | `DELETE` | `/groups/:id` | 409 while members remain |
//! | `POST`   | `/groups/:id/rotate` | Body: `{"performed_by":"<admin uuid>"}` |
//! | `GET`    | `/groups/:id/rotations` | Audit trail, newest first |
//! | `GET`    | `/groups/:id/assignments` | Optional `?period=YYYY-MM` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rosary_core::{
  ledger::Rotation,
  roster::{Group, MemberAssignment},
  store::RosaryStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PeriodParams, error::ApiError};

async fn require_group<S: RosaryStore>(store: &S, id: i64) -> Result<Group, ApiError> {
  store
    .get_group(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))
}

// ─── List / get ───────────────────────────────────────────────────────────────

/// `GET /groups`
pub async fn list<S: RosaryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Group>>, ApiError> {
  let groups = store.list_groups().await.map_err(ApiError::store)?;
  Ok(Json(groups))
}

/// `GET /groups/:id`
pub async fn get_one<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Group>, ApiError> {
  Ok(Json(require_group(store.as_ref(), id).await?))
}

// ─── Create / rename / delete ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// `POST /groups` — body: `{"name":"Rose of St. Dominic"}`
pub async fn create<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError> {
  let group = store.create_group(body.name).await.map_err(ApiError::store)?;
  tracing::info!(group_id = group.id, name = %group.name, "group created");
  Ok((StatusCode::CREATED, Json(group)))
}

/// `PATCH /groups/:id`
pub async fn rename<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NameBody>,
) -> Result<Json<Group>, ApiError> {
  let group = store.rename_group(id, body.name).await.map_err(ApiError::store)?;
  Ok(Json(group))
}

/// `DELETE /groups/:id`
pub async fn delete_one<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_group(id).await.map_err(ApiError::store)?;
  tracing::info!(group_id = id, "group deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Rotation ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RotateBody {
  /// The administrator on whose authority the rotation happens.
  pub performed_by: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RotateResponse {
  /// The group after the rotation.
  pub group:    Group,
  /// `None` when the group had no members and nothing changed.
  pub rotation: Option<Rotation>,
}

/// `POST /groups/:id/rotate`
pub async fn rotate<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<RotateBody>,
) -> Result<Json<RotateResponse>, ApiError> {
  let rotation = store
    .rotate_group_members(id, body.performed_by)
    .await
    .map_err(ApiError::store)?;

  match &rotation {
    Some(r) => tracing::info!(
      group_id = id,
      performed_by = %r.performed_by,
      generation = r.generation,
      "group rotated"
    ),
    None => tracing::info!(group_id = id, "rotation skipped: group has no members"),
  }

  let group = require_group(store.as_ref(), id).await?;
  Ok(Json(RotateResponse { group, rotation }))
}

/// `GET /groups/:id/rotations`
pub async fn rotations<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Rotation>>, ApiError> {
  let rotations = store.list_rotations(id).await.map_err(ApiError::store)?;
  Ok(Json(rotations))
}

// ─── Overview ─────────────────────────────────────────────────────────────────

/// `GET /groups/:id/assignments[?period=YYYY-MM]`
pub async fn assignments<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<MemberAssignment>>, ApiError> {
  let rows = store
    .group_assignments(id, params.resolve())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}
