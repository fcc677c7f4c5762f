//! Handlers for the read-only `/mysteries` catalog.

use axum::{Json, extract::Path};
use rosary_core::mystery::{self, Mystery, MysteryId};

use crate::error::ApiError;

/// `GET /mysteries`
pub async fn list() -> Json<Vec<Mystery>> { Json(mystery::catalog()) }

/// `GET /mysteries/:id` — 404 for ids outside 1..=20.
pub async fn get_one(Path(id): Path<i64>) -> Result<Json<Mystery>, ApiError> {
  let id = MysteryId::new(id)
    .map_err(|_| ApiError::NotFound(format!("mystery {id} not found")))?;
  Ok(Json(id.mystery()))
}
