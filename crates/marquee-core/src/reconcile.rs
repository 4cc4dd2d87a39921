//! The user reconciler — the single module that applies identity events to
//! the store.
//!
//! Both delivery paths (the signed webhook and the event-bus subscription)
//! call [`apply`]; neither carries its own copy of this logic.
//!
//! Idempotence is structural: create is an upsert by key, delete is a
//! delete by key, so re-applying a duplicated delivery converges on the same
//! store state. Out-of-order delivery is not defended against — a late
//! `user.created` arriving after a `user.deleted` for the same key will
//! resurrect the record (last writer wins).

use thiserror::Error;

use crate::{
  event::{UserEvent, UserEventKind},
  store::UserStore,
  user::UserRecord,
};

/// What a single [`apply`] call did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// A record was inserted (or overwritten by an idempotent re-create).
  Created(UserRecord),
  /// An existing record was updated in place.
  Updated(UserRecord),
  /// The record was removed.
  Deleted(String),
  /// A delete targeted a key with no record; nothing changed.
  Absent(String),
  /// The event type is not one we handle; the store was not touched.
  Ignored,
}

#[derive(Debug, Error)]
pub enum ReconcileError<E> {
  #[error(transparent)]
  Event(#[from] crate::Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

/// Apply one identity event to the store.
///
/// | event | action | fallback |
/// |---|---|---|
/// | `user.created` | upsert by key | upsert is idempotent |
/// | `user.updated` | update by key | absent key: upsert the same payload |
/// | `user.deleted` | delete by key | absent key: no-op |
pub async fn apply<S: UserStore>(
  store: &S,
  event: &UserEvent,
) -> Result<Outcome, ReconcileError<S::Error>> {
  match event.kind {
    UserEventKind::Created => {
      let id = event.data.user_id()?;
      let record = store
        .upsert_user(id, event.data.fields(id))
        .await
        .map_err(ReconcileError::Store)?;
      Ok(Outcome::Created(record))
    }

    UserEventKind::Updated => {
      let id = event.data.user_id()?;
      let fields = event.data.fields(id);
      match store
        .update_user(id, fields.clone())
        .await
        .map_err(ReconcileError::Store)?
      {
        Some(record) => Ok(Outcome::Updated(record)),
        // An update for a key we have never seen is treated as a create.
        None => {
          let record = store
            .upsert_user(id, fields)
            .await
            .map_err(ReconcileError::Store)?;
          Ok(Outcome::Created(record))
        }
      }
    }

    UserEventKind::Deleted => {
      let id = event.data.user_id()?;
      let removed = store.delete_user(id).await.map_err(ReconcileError::Store)?;
      if removed {
        Ok(Outcome::Deleted(id.to_string()))
      } else {
        Ok(Outcome::Absent(id.to_string()))
      }
    }

    UserEventKind::Other => Ok(Outcome::Ignored),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
