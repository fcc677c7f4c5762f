//! JSON REST API for Rosary.
//!
//! Exposes an axum [`Router`] backed by any [`rosary_core::store::RosaryStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rosary_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod groups;
pub mod intentions;
pub mod mysteries;
pub mod profiles;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use rosary_core::{assignment::Period, store::RosaryStore};
use serde::Deserialize;

pub use error::ApiError;

/// `?period=YYYY-MM`, shared by every endpoint that computes assignments.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
  pub period: Option<Period>,
}

impl PeriodParams {
  /// The requested period, or the current month.
  pub fn resolve(&self) -> Period { self.period.unwrap_or_else(Period::current) }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RosaryStore + 'static,
{
  Router::new()
    // Catalog
    .route("/mysteries", get(mysteries::list))
    .route("/mysteries/{id}", get(mysteries::get_one))
    // Groups
    .route("/groups", get(groups::list::<S>).post(groups::create::<S>))
    .route(
      "/groups/{id}",
      get(groups::get_one::<S>)
        .patch(groups::rename::<S>)
        .delete(groups::delete_one::<S>),
    )
    .route("/groups/{id}/rotate", post(groups::rotate::<S>))
    .route("/groups/{id}/rotations", get(groups::rotations::<S>))
    .route("/groups/{id}/assignments", get(groups::assignments::<S>))
    // Profiles
    .route("/profiles", get(profiles::list::<S>).post(profiles::create::<S>))
    .route(
      "/profiles/{id}",
      get(profiles::get_one::<S>).delete(profiles::delete_one::<S>),
    )
    .route("/profiles/{id}/group", put(profiles::move_group::<S>))
    .route("/profiles/{id}/role", put(profiles::set_role::<S>))
    .route("/profiles/{id}/mystery", get(profiles::mystery::<S>))
    .route("/profiles/{id}/acknowledgments", post(profiles::acknowledge::<S>))
    .route(
      "/profiles/{id}/acknowledgments/{mystery_id}",
      get(profiles::check::<S>),
    )
    // Intentions
    .route("/intentions", get(intentions::list::<S>))
    .route(
      "/intentions/{year}/{month}",
      get(intentions::get_one::<S>).put(intentions::upsert::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
  };
  use rosary_core::assignment::RotationSchedule;
  use rosary_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header("content-type", "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_profile(app: &Router, name: &str, group_id: Option<i64>) -> Value {
    let (status, profile) = send(
      app,
      Method::POST,
      "/profiles",
      Some(json!({
        "full_name": name,
        "email": format!("{}@parish.example", name.to_lowercase()),
        "group_id": group_id,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{profile}");
    profile
  }

  // ── Catalog ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn catalog_lists_twenty_mysteries() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/mysteries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 20);

    let (status, body) = send(&app, Method::GET, "/mysteries/16", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["part"], "glorious");

    let (status, _) = send(&app, Method::GET, "/mysteries/21", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Groups ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn non_empty_group_cannot_be_deleted() {
    let app = app().await;
    let (status, group) =
      send(&app, Method::POST, "/groups", Some(json!({ "name": "Rose A" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let gid = group["id"].as_i64().unwrap();
    let member = create_profile(&app, "Anna", Some(gid)).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/groups/{gid}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("member"));

    let uri = format!("/profiles/{}/group", member["id"].as_str().unwrap());
    let (status, moved) = send(&app, Method::PUT, &uri, Some(json!({ "group_id": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(moved["rose_pos"].is_null());

    let (status, _) = send(&app, Method::DELETE, &format!("/groups/{gid}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/groups/{gid}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn rotate_requires_admin_and_advances_members() {
    let app = app().await;
    let (_, group) =
      send(&app, Method::POST, "/groups", Some(json!({ "name": "Rose A" }))).await;
    let gid = group["id"].as_i64().unwrap();
    let member = create_profile(&app, "Anna", Some(gid)).await;
    let member_id = member["id"].as_str().unwrap().to_owned();
    let boss = create_profile(&app, "Boss", None).await;
    let boss_id = boss["id"].as_str().unwrap().to_owned();

    let rotate = format!("/groups/{gid}/rotate");
    let (status, _) = send(
      &app,
      Method::POST,
      &rotate,
      Some(json!({ "performed_by": boss_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
      &app,
      Method::PUT,
      &format!("/profiles/{boss_id}/role"),
      Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mystery = format!("/profiles/{member_id}/mystery?period=2026-10");
    let (_, before) = send(&app, Method::GET, &mystery, None).await;
    assert_eq!(before["status"], "assigned");
    assert_eq!(before["mystery"]["id"], 1);

    let (status, body) = send(
      &app,
      Method::POST,
      &rotate,
      Some(json!({ "performed_by": boss_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group"]["generation"], 1);
    assert_eq!(body["rotation"]["generation"], 1);

    let (_, after) = send(&app, Method::GET, &mystery, None).await;
    assert_eq!(after["mystery"]["id"], 2);

    let (_, audit) = send(&app, Method::GET, &format!("/groups/{gid}/rotations"), None).await;
    assert_eq!(audit.as_array().unwrap().len(), 1);
  }

  // ── Profiles / acknowledgments ───────────────────────────────────────────────

  #[tokio::test]
  async fn unseated_profile_reports_unassigned() {
    let app = app().await;
    let p = create_profile(&app, "Anna", None).await;
    let uri = format!("/profiles/{}/mystery", p["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "unassigned" }));
  }

  #[tokio::test]
  async fn unknown_profile_mystery_is_404() {
    let app = app().await;
    let uri = format!("/profiles/{}/mystery", Uuid::new_v4());
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn acknowledge_then_check() {
    let app = app().await;
    let (_, group) =
      send(&app, Method::POST, "/groups", Some(json!({ "name": "Rose A" }))).await;
    let gid = group["id"].as_i64().unwrap();
    create_profile(&app, "Anna", Some(gid)).await;
    let bea = create_profile(&app, "Bea", Some(gid)).await;
    let bea_id = bea["id"].as_str().unwrap();

    let check = format!("/profiles/{bea_id}/acknowledgments/2");
    let (_, body) = send(&app, Method::GET, &check, None).await;
    assert_eq!(body["acknowledged"], false);

    let (status, _) = send(
      &app,
      Method::POST,
      &format!("/profiles/{bea_id}/acknowledgments"),
      Some(json!({ "mystery_id": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, ack) = send(
      &app,
      Method::POST,
      &format!("/profiles/{bea_id}/acknowledgments"),
      Some(json!({ "mystery_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ack["mystery_id"], 2);

    let (_, body) = send(&app, Method::GET, &check, None).await;
    assert_eq!(body["acknowledged"], true);

    let (_, overview) = send(
      &app,
      Method::GET,
      &format!("/groups/{gid}/assignments"),
      None,
    )
    .await;
    let flags: Vec<bool> = overview
      .as_array()
      .unwrap()
      .iter()
      .map(|row| row["acknowledged"].as_bool().unwrap())
      .collect();
    assert_eq!(flags, vec![false, true]);
  }

  #[tokio::test]
  async fn acknowledgment_cannot_target_another_month() {
    let now = Period::current();
    let next = now.next();
    let store = SqliteStore::open_in_memory()
      .await
      .unwrap()
      .with_schedule(RotationSchedule::Monthly { anchor: now });
    let app = api_router(Arc::new(store));

    let (_, group) =
      send(&app, Method::POST, "/groups", Some(json!({ "name": "Rose A" }))).await;
    let anna = create_profile(&app, "Anna", group["id"].as_i64()).await;
    let anna_id = anna["id"].as_str().unwrap();

    // Seat 1 holds mystery 1 this month and mystery 2 next month.
    let (status, _) = send(
      &app,
      Method::POST,
      &format!("/profiles/{anna_id}/acknowledgments"),
      Some(json!({ "mystery_id": 2, "period": next.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(
      &app,
      Method::GET,
      &format!("/profiles/{anna_id}/acknowledgments/2?period={next}"),
      None,
    )
    .await;
    assert_eq!(body["acknowledged"], false);

    let (status, ack) = send(
      &app,
      Method::POST,
      &format!("/profiles/{anna_id}/acknowledgments"),
      Some(json!({ "mystery_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ack["window"]["period"], now.to_string());
  }

  #[tokio::test]
  async fn malformed_period_is_rejected() {
    let app = app().await;
    let p = create_profile(&app, "Anna", None).await;
    let uri = format!("/profiles/{}/mystery?period=October", p["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Intentions ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn intention_put_then_get() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/intentions/2026/10", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = json!({ "title": "For peace", "content": "For peace in the world." });
    let (status, _) = send(&app, Method::PUT, "/intentions/2026/10", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, got) = send(&app, Method::GET, "/intentions/2026/10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["title"], "For peace");
    assert_eq!(got["period"], "2026-10");

    let body = json!({ "title": "x", "content": "y" });
    let (status, _) = send(&app, Method::PUT, "/intentions/2026/13", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Degraded assignment reads ────────────────────────────────────────────────

  mod degraded {
    use rosary_core::{
      DomainError,
      assignment::{Period, RotationSchedule},
      intention::{Intention, NewIntention},
      ledger::{Acknowledgment, Rotation},
      mystery::MysteryId,
      roster::{Group, MemberAssignment, NewProfile, Profile, Role},
    };

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("database unavailable")]
    struct Unavailable;

    impl DomainError for Unavailable {
      fn domain(&self) -> Option<&rosary_core::Error> { None }
    }

    /// A store whose assignment lookup always fails at the storage level.
    struct BrokenStore;

    impl RosaryStore for BrokenStore {
      type Error = Unavailable;
      fn schedule(&self) -> RotationSchedule { RotationSchedule::Manual }
      async fn create_group(&self, _: String) -> Result<Group, Unavailable> { unimplemented!() }
      async fn rename_group(&self, _: i64, _: String) -> Result<Group, Unavailable> { unimplemented!() }
      async fn get_group(&self, _: i64) -> Result<Option<Group>, Unavailable> { unimplemented!() }
      async fn list_groups(&self) -> Result<Vec<Group>, Unavailable> { unimplemented!() }
      async fn delete_group(&self, _: i64) -> Result<(), Unavailable> { unimplemented!() }
      async fn create_profile(&self, _: NewProfile) -> Result<Profile, Unavailable> { unimplemented!() }
      async fn get_profile(&self, _: Uuid) -> Result<Option<Profile>, Unavailable> { unimplemented!() }
      async fn list_profiles(&self, _: Option<i64>) -> Result<Vec<Profile>, Unavailable> { unimplemented!() }
      async fn set_role(&self, _: Uuid, _: Role) -> Result<Profile, Unavailable> { unimplemented!() }
      async fn move_user_to_group(&self, _: Uuid, _: Option<i64>) -> Result<Profile, Unavailable> { unimplemented!() }
      async fn delete_profile(&self, _: Uuid) -> Result<(), Unavailable> { unimplemented!() }
      async fn get_mystery_id_for_user(&self, _: Uuid, _: Period) -> Result<Option<MysteryId>, Unavailable> { Err(Unavailable) }
      async fn group_assignments(&self, _: i64, _: Period) -> Result<Vec<MemberAssignment>, Unavailable> { Err(Unavailable) }
      async fn rotate_group_members(&self, _: i64, _: Uuid) -> Result<Option<Rotation>, Unavailable> { unimplemented!() }
      async fn list_rotations(&self, _: i64) -> Result<Vec<Rotation>, Unavailable> { unimplemented!() }
      async fn acknowledge_mystery(&self, _: Uuid, _: MysteryId, _: Period) -> Result<Acknowledgment, Unavailable> { unimplemented!() }
      async fn check_acknowledgment(&self, _: Uuid, _: MysteryId, _: Period) -> Result<bool, Unavailable> { unimplemented!() }
      async fn upsert_intention(&self, _: NewIntention) -> Result<Intention, Unavailable> { unimplemented!() }
      async fn get_intention(&self, _: Period) -> Result<Option<Intention>, Unavailable> { unimplemented!() }
      async fn list_intentions(&self, _: Option<i32>) -> Result<Vec<Intention>, Unavailable> { unimplemented!() }
    }

    #[tokio::test]
    async fn storage_failure_degrades_to_compute_error() {
      let app = api_router(Arc::new(BrokenStore));
      let uri = format!("/profiles/{}/mystery", Uuid::new_v4());
      let (status, body) = send(&app, Method::GET, &uri, None).await;
      assert_eq!(status, StatusCode::OK);
      assert_eq!(body["status"], "compute_error");
      assert_eq!(body["reason"], "database unavailable");
    }

    #[tokio::test]
    async fn other_reads_still_fail_loudly() {
      let app = api_router(Arc::new(BrokenStore));
      let (status, body) = send(&app, Method::GET, "/groups/1/assignments", None).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(body["error"], "database unavailable");
    }
  }
}
