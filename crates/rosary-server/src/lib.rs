//! HTTP server for Rosary.
//!
//! Mounts the JSON API from `rosary-api` under `/api` behind HTTP Basic auth,
//! plus an unauthenticated `/health` probe.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, extract::State, middleware, routing::get};
use rosary_core::{assignment::RotationSchedule, store::RosaryStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Manual rotation unless configured otherwise.
  #[serde(default)]
  pub schedule:           RotationSchedule,
}

impl ServerConfig {
  /// Layer `ROSARY_*` environment variables over the TOML file at `path`.
  /// A missing file is not an error; missing keys are.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSARY"))
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~/` resolved against `$HOME`.
  pub fn store_file(&self) -> PathBuf {
    let raw = self.store_path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.store_path.clone()
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs from `main`.
#[derive(Clone)]
pub struct AppState<S: RosaryStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RosaryStore + 'static,
{
  let api = rosary_api::api_router(state.store.clone())
    .layer(middleware::from_fn_with_state(state.auth.clone(), require_auth));

  Router::new()
    .route("/health", get(health::<S>))
    .with_state(state.store)
    .nest("/api", api)
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

async fn health<S: RosaryStore>(State(store): State<Arc<S>>) -> Json<Value> {
  Json(json!({ "status": "ok", "schedule": store.schedule() }))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rosary_core::assignment::Period;
  use rosary_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_app(password: &str, schedule: RotationSchedule) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap().with_schedule(schedule);
    router(AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig {
        username:      "parish".to_string(),
        password_hash: auth::hash_password(password).unwrap(),
      }),
    })
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn send(
    app:    &Router,
    method: Method,
    uri:    &str,
    auth:   Option<String>,
    body:   Option<Value>,
  ) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status  = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
  }

  #[tokio::test]
  async fn health_needs_no_credentials() {
    let app = make_app("secret", RotationSchedule::Manual).await;
    let (status, _, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["schedule"]["mode"], "manual");
  }

  #[tokio::test]
  async fn api_without_credentials_is_401() {
    let app = make_app("secret", RotationSchedule::Manual).await;
    let (status, headers, _) = send(&app, Method::GET, "/api/groups", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn api_with_wrong_password_is_401() {
    let app = make_app("secret", RotationSchedule::Manual).await;
    let auth = Some(auth_header("parish", "wrong"));
    let (status, _, _) = send(&app, Method::GET, "/api/mysteries", auth, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn authenticated_requests_reach_the_api() {
    let app = make_app("secret", RotationSchedule::Manual).await;
    let auth = || Some(auth_header("parish", "secret"));

    let (status, _, body) = send(&app, Method::GET, "/api/mysteries", auth(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 20);

    let (status, _, group) = send(
      &app,
      Method::POST,
      "/api/groups",
      auth(),
      Some(json!({ "name": "Rose A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(group["generation"], 0);

    let (status, _, groups) = send(&app, Method::GET, "/api/groups", auth(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(groups.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn monthly_schedule_moves_assignments_with_the_calendar() {
    let anchor: Period = "2026-01".parse().unwrap();
    let app = make_app("secret", RotationSchedule::Monthly { anchor }).await;
    let auth = || Some(auth_header("parish", "secret"));

    let (_, _, group) = send(
      &app,
      Method::POST,
      "/api/groups",
      auth(),
      Some(json!({ "name": "Rose A" })),
    )
    .await;
    let (_, _, profile) = send(
      &app,
      Method::POST,
      "/api/profiles",
      auth(),
      Some(json!({
        "full_name": "Anna",
        "email": "anna@parish.example",
        "group_id": group["id"],
      })),
    )
    .await;
    let id = profile["id"].as_str().unwrap();

    let (_, _, jan) = send(
      &app,
      Method::GET,
      &format!("/api/profiles/{id}/mystery?period=2026-01"),
      auth(),
      None,
    )
    .await;
    let (_, _, apr) = send(
      &app,
      Method::GET,
      &format!("/api/profiles/{id}/mystery?period=2026-04"),
      auth(),
      None,
    )
    .await;
    assert_eq!(jan["mystery"]["id"], 1);
    assert_eq!(apr["mystery"]["id"], 4);
  }

  // ── Configuration ─────────────────────────────────────────────────────────

  fn config_at(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("rosary-{name}-{}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn config_file_with_monthly_schedule() {
    let path = config_at(
      "monthly",
      r#"
host               = "127.0.0.1"
port               = 8080
store_path         = "/var/lib/rosary/rosary.db"
auth_username      = "parish"
auth_password_hash = "$argon2id$v=19$m=19456,t=2,p=1$x"

[schedule]
mode   = "monthly"
anchor = "2026-01"
"#,
    );
    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.auth_username, "parish");
    assert_eq!(
      cfg.schedule,
      RotationSchedule::Monthly { anchor: "2026-01".parse().unwrap() }
    );
    assert_eq!(cfg.store_file(), PathBuf::from("/var/lib/rosary/rosary.db"));
  }

  #[test]
  fn schedule_defaults_to_manual() {
    let path = config_at(
      "manual",
      r#"
host               = "0.0.0.0"
port               = 9000
store_path         = "rosary.db"
auth_username      = "parish"
auth_password_hash = "x"
"#,
    );
    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.schedule, RotationSchedule::Manual);
  }

  #[test]
  fn store_file_resolves_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let cfg = ServerConfig {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      store_path:         PathBuf::from("~/.local/share/rosary/rosary.db"),
      auth_username:      "parish".to_string(),
      auth_password_hash: String::new(),
      schedule:           RotationSchedule::Manual,
    };
    assert_eq!(
      cfg.store_file(),
      PathBuf::from(home).join(".local/share/rosary/rosary.db")
    );
  }
}
