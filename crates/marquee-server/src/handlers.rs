//! HTTP route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/webhooks/clerk` | Signed delivery; raw body |
//! | `GET`  | `/api/users` | Full unpaginated dump |
//! | `GET`  | `/` | Liveness string |

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;

use marquee_core::store::UserStore;

use crate::{
  AppState,
  error::Error,
  signature::{self, SignatureError, WebhookHeaders},
};

// ─── Webhook ─────────────────────────────────────────────────────────────────

/// `POST /api/webhooks/clerk`
///
/// Verifies the delivery, acknowledges immediately, and defers the store
/// round trip to the sync worker. A failure after this point is logged by
/// the worker, not reflected in the response — the provider has already been
/// told the delivery succeeded.
pub async fn clerk_webhook<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<serde_json::Value>, Error>
where
  S: UserStore + Clone + Send + Sync + 'static,
{
  let svix =
    WebhookHeaders::from_header_map(&headers).map_err(|_| Error::MissingHeaders)?;

  let event = signature::verify_and_parse(&state.secret, &svix, &body).map_err(
    |e| match e {
      SignatureError::InvalidPayload(inner) => Error::InvalidPayload(inner.to_string()),
      other => Error::InvalidSignature(other),
    },
  )?;

  tracing::info!(kind = ?event.kind, delivery = %svix.id, "verified webhook delivery");

  state
    .sync
    .enqueue(event)
    .map_err(|_| Error::QueueUnavailable)?;

  Ok(Json(json!({ "success": true, "message": "Webhook received" })))
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
  pub total_users: usize,
  pub users:       Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
  pub id:    String,
  pub name:  String,
  pub email: Option<String>,
}

/// `GET /api/users` — the whole collection, unpaginated.
pub async fn list_users<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<UsersResponse>, Error>
where
  S: UserStore + Clone + Send + Sync + 'static,
{
  let users = state
    .store
    .list_users()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(UsersResponse {
    total_users: users.len(),
    users:       users
      .into_iter()
      .map(|u| UserSummary {
        id:    u.user_id,
        name:  u.name,
        email: u.email,
      })
      .collect(),
  }))
}

// ─── Liveness ────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn liveness() -> &'static str {
  "Marquee server is live"
}
