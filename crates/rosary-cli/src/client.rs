//! Async HTTP client wrapping the Rosary JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use rosary_core::{
  assignment::{AssignmentStatus, Period},
  intention::Intention,
  ledger::{Acknowledgment, Rotation},
  mystery::{Mystery, MysteryId},
  roster::{Group, MemberAssignment, Profile, Role},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use uuid::Uuid;

/// Connection settings for the Rosary API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Result of `POST /groups/:id/rotate`.
#[derive(Debug, Deserialize)]
pub struct RotateOutcome {
  pub group:    Group,
  pub rotation: Option<Rotation>,
}

#[derive(Debug, Deserialize)]
struct CheckBody {
  acknowledged: bool,
}

/// Async HTTP client for the Rosary JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req` and surface the server's `{"error":...}` message on failure.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned));
    match message {
      Some(m) => Err(anyhow!("{what} → {status}: {m}")),
      None => Err(anyhow!("{what} → {status}")),
    }
  }

  async fn json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  /// `GET /api/mysteries`
  pub async fn list_mysteries(&self) -> Result<Vec<Mystery>> {
    self.json(self.client.get(self.url("/mysteries")), "GET /mysteries").await
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  /// `GET /api/groups`
  pub async fn list_groups(&self) -> Result<Vec<Group>> {
    self.json(self.client.get(self.url("/groups")), "GET /groups").await
  }

  /// `POST /api/groups`
  pub async fn create_group(&self, name: &str) -> Result<Group> {
    let req = self.client.post(self.url("/groups")).json(&json!({ "name": name }));
    self.json(req, "POST /groups").await
  }

  /// `PATCH /api/groups/:id`
  pub async fn rename_group(&self, id: i64, name: &str) -> Result<Group> {
    let req = self
      .client
      .patch(self.url(&format!("/groups/{id}")))
      .json(&json!({ "name": name }));
    self.json(req, "PATCH /groups/:id").await
  }

  /// `DELETE /api/groups/:id`
  pub async fn delete_group(&self, id: i64) -> Result<()> {
    let req = self.client.delete(self.url(&format!("/groups/{id}")));
    self.send(req, "DELETE /groups/:id").await?;
    Ok(())
  }

  /// `POST /api/groups/:id/rotate`
  pub async fn rotate(&self, id: i64, performed_by: Uuid) -> Result<RotateOutcome> {
    let req = self
      .client
      .post(self.url(&format!("/groups/{id}/rotate")))
      .json(&json!({ "performed_by": performed_by }));
    self.json(req, "POST /groups/:id/rotate").await
  }

  /// `GET /api/groups/:id/rotations`
  pub async fn rotations(&self, id: i64) -> Result<Vec<Rotation>> {
    let req = self.client.get(self.url(&format!("/groups/{id}/rotations")));
    self.json(req, "GET /groups/:id/rotations").await
  }

  /// `GET /api/groups/:id/assignments[?period=]`
  pub async fn assignments(
    &self,
    id: i64,
    period: Option<Period>,
  ) -> Result<Vec<MemberAssignment>> {
    let req = with_period(
      self.client.get(self.url(&format!("/groups/{id}/assignments"))),
      period,
    );
    self.json(req, "GET /groups/:id/assignments").await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// `GET /api/profiles[?group_id=]`
  pub async fn list_profiles(&self, group_id: Option<i64>) -> Result<Vec<Profile>> {
    let mut req = self.client.get(self.url("/profiles"));
    if let Some(group_id) = group_id {
      req = req.query(&[("group_id", group_id)]);
    }
    self.json(req, "GET /profiles").await
  }

  /// `POST /api/profiles`
  pub async fn create_profile(
    &self,
    full_name: &str,
    email: &str,
    role: Role,
    group_id: Option<i64>,
  ) -> Result<Profile> {
    let req = self.client.post(self.url("/profiles")).json(&json!({
      "full_name": full_name,
      "email":     email,
      "role":      role,
      "group_id":  group_id,
    }));
    self.json(req, "POST /profiles").await
  }

  /// `PUT /api/profiles/:id/group`
  pub async fn move_profile(&self, id: Uuid, group_id: Option<i64>) -> Result<Profile> {
    let req = self
      .client
      .put(self.url(&format!("/profiles/{id}/group")))
      .json(&json!({ "group_id": group_id }));
    self.json(req, "PUT /profiles/:id/group").await
  }

  /// `PUT /api/profiles/:id/role`
  pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Profile> {
    let req = self
      .client
      .put(self.url(&format!("/profiles/{id}/role")))
      .json(&json!({ "role": role }));
    self.json(req, "PUT /profiles/:id/role").await
  }

  /// `DELETE /api/profiles/:id`
  pub async fn delete_profile(&self, id: Uuid) -> Result<()> {
    let req = self.client.delete(self.url(&format!("/profiles/{id}")));
    self.send(req, "DELETE /profiles/:id").await?;
    Ok(())
  }

  // ── Assignment / acknowledgments ─────────────────────────────────────────

  /// `GET /api/profiles/:id/mystery[?period=]`
  pub async fn mystery(&self, id: Uuid, period: Option<Period>) -> Result<AssignmentStatus> {
    let req = with_period(
      self.client.get(self.url(&format!("/profiles/{id}/mystery"))),
      period,
    );
    self.json(req, "GET /profiles/:id/mystery").await
  }

  /// `POST /api/profiles/:id/acknowledgments` (always the current month)
  pub async fn acknowledge(&self, id: Uuid, mystery_id: MysteryId) -> Result<Acknowledgment> {
    let req = self
      .client
      .post(self.url(&format!("/profiles/{id}/acknowledgments")))
      .json(&json!({ "mystery_id": mystery_id }));
    self.json(req, "POST /profiles/:id/acknowledgments").await
  }

  /// `GET /api/profiles/:id/acknowledgments/:mystery_id[?period=]`
  pub async fn check_acknowledgment(
    &self,
    id: Uuid,
    mystery_id: MysteryId,
    period: Option<Period>,
  ) -> Result<bool> {
    let req = with_period(
      self
        .client
        .get(self.url(&format!("/profiles/{id}/acknowledgments/{mystery_id}"))),
      period,
    );
    let body: CheckBody = self.json(req, "GET /profiles/:id/acknowledgments").await?;
    Ok(body.acknowledged)
  }

  // ── Intentions ────────────────────────────────────────────────────────────

  /// `GET /api/intentions[?year=]`
  pub async fn list_intentions(&self, year: Option<i32>) -> Result<Vec<Intention>> {
    let mut req = self.client.get(self.url("/intentions"));
    if let Some(year) = year {
      req = req.query(&[("year", year)]);
    }
    self.json(req, "GET /intentions").await
  }

  /// `GET /api/intentions/:year/:month`
  pub async fn intention(&self, period: Period) -> Result<Intention> {
    let path = format!("/intentions/{}/{}", period.year(), period.month());
    self.json(self.client.get(self.url(&path)), "GET /intentions/:year/:month").await
  }

  /// `PUT /api/intentions/:year/:month`
  pub async fn set_intention(
    &self,
    period: Period,
    title: &str,
    content: &str,
  ) -> Result<Intention> {
    let path = format!("/intentions/{}/{}", period.year(), period.month());
    let req = self
      .client
      .put(self.url(&path))
      .json(&json!({ "title": title, "content": content }));
    self.json(req, "PUT /intentions/:year/:month").await
  }
}

fn with_period(req: RequestBuilder, period: Option<Period>) -> RequestBuilder {
  match period {
    Some(p) => req.query(&[("period", p.to_string())]),
    None => req,
  }
}
