//! Handlers for `/intentions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/intentions` | Optional `?year=<yyyy>`; newest first |
//! | `GET`  | `/intentions/:year/:month` | 404 if none is set |
//! | `PUT`  | `/intentions/:year/:month` | Body: `{"title":"...","content":"..."}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use rosary_core::{
  assignment::Period,
  intention::{Intention, NewIntention},
  store::RosaryStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub year: Option<i32>,
}

/// `GET /intentions[?year=<yyyy>]`
pub async fn list<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Intention>>, ApiError> {
  let intentions = store
    .list_intentions(params.year)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(intentions))
}

/// `GET /intentions/:year/:month`
pub async fn get_one<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Intention>, ApiError> {
  let period = Period::new(year, month)?;
  let intention = store
    .get_intention(period)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no intention for {period}")))?;
  Ok(Json(intention))
}

#[derive(Debug, Deserialize)]
pub struct IntentionBody {
  pub title:   String,
  pub content: String,
}

/// `PUT /intentions/:year/:month` — inserts or replaces the month's intention.
pub async fn upsert<S: RosaryStore>(
  State(store): State<Arc<S>>,
  Path((year, month)): Path<(i32, u32)>,
  Json(body): Json<IntentionBody>,
) -> Result<Json<Intention>, ApiError> {
  let input = NewIntention {
    period:  Period::new(year, month)?,
    title:   body.title,
    content: body.content,
  };
  let intention = store.upsert_intention(input).await.map_err(ApiError::store)?;
  Ok(Json(intention))
}
