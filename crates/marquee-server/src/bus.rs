//! Event-bus entry point.
//!
//! Besides the signed webhook, the identity provider's events reach us
//! through a message-bus subscription (`identity/user.*`). The consumer here
//! maps bus deliveries onto the same reconciler the webhook path uses; the
//! two entry points share one reconciliation capability rather than carrying
//! independent copies.
//!
//! The bus transport itself is external infrastructure. Deliveries arrive as
//! [`BusEvent`] values on an mpsc channel supplied by whatever hosts the
//! subscription.

use std::sync::Arc;

use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use marquee_core::{
  event::{UserEvent, UserEventKind, UserPayload},
  store::UserStore,
};

use crate::sync::apply_logged;

pub const USER_CREATED: &str = "identity/user.created";
pub const USER_UPDATED: &str = "identity/user.updated";
pub const USER_DELETED: &str = "identity/user.deleted";

/// One delivery from the bus: a subscription name and the provider payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BusEvent {
  pub name: String,
  pub data: serde_json::Value,
}

fn kind_for(name: &str) -> Option<UserEventKind> {
  match name {
    USER_CREATED => Some(UserEventKind::Created),
    USER_UPDATED => Some(UserEventKind::Updated),
    USER_DELETED => Some(UserEventKind::Deleted),
    _ => None,
  }
}

/// Spawn a consumer task that applies bus deliveries to `store`.
///
/// Unknown subscription names and undeserialisable payloads are logged and
/// skipped; the consumer never stops on a bad delivery.
pub fn spawn_consumer<S>(
  store: Arc<S>,
  mut rx: mpsc::Receiver<BusEvent>,
) -> JoinHandle<()>
where
  S: UserStore + 'static,
{
  tokio::spawn(async move {
    while let Some(delivery) = rx.recv().await {
      let Some(kind) = kind_for(&delivery.name) else {
        tracing::warn!(name = %delivery.name, "unknown bus subscription event");
        continue;
      };
      match serde_json::from_value::<UserPayload>(delivery.data) {
        Ok(data) => apply_logged(store.as_ref(), &UserEvent { kind, data }).await,
        Err(e) => {
          tracing::error!(name = %delivery.name, error = %e, "bus payload failed to deserialize");
        }
      }
    }
    tracing::debug!("bus channel closed; consumer exiting");
  })
}
