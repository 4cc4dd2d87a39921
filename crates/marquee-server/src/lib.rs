//! HTTP layer for the Marquee user-sync service.
//!
//! Exposes an axum [`Router`] with the signed webhook endpoint, the users
//! read endpoint, and a liveness probe, backed by any
//! [`marquee_core::store::UserStore`].

pub mod bus;
pub mod error;
pub mod handlers;
pub mod signature;
pub mod sync;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use marquee_core::store::UserStore;

use signature::WebhookSecret;
use sync::SyncQueue;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `MARQUEE_`-prefixed environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// The provider's signing secret (`whsec_…`).
  pub webhook_secret: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: UserStore> {
  pub store:  Arc<S>,
  pub secret: Arc<WebhookSecret>,
  pub sync:   SyncQueue,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
///
/// The webhook route reads the raw body through the `Bytes` extractor; no
/// JSON layer touches those bytes before signature verification.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: UserStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(handlers::liveness))
    .route("/api/users", get(handlers::list_users::<S>))
    .route("/api/webhooks/clerk", post(handlers::clerk_webhook::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
