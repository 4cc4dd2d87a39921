//! User record — the sole persisted entity.
//!
//! The identity key is issued by the external identity provider, never
//! generated locally, and is immutable once assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A synchronized user, as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
  /// Provider-issued subject identifier; the primary key.
  pub user_id:    String,
  /// May be `None` while the provider has not yet populated an address, or a
  /// deterministic placeholder pending a later `user.updated` event.
  pub email:      Option<String>,
  pub name:       String,
  /// Avatar URL; empty string when the provider supplies none.
  pub image:      String,
  /// Set by the store on first persistence and preserved by later upserts.
  pub created_at: DateTime<Utc>,
  /// Bumped by the store on every mutation.
  pub updated_at: DateTime<Utc>,
}

/// The mutable field set written by reconciliation. Timestamps are assigned
/// by the store, not the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
  pub email: Option<String>,
  pub name:  String,
  pub image: String,
}
