//! Background reconciliation worker.
//!
//! The webhook handler must acknowledge a delivery before the store round
//! trip completes (the provider enforces a response-time SLA and will retry
//! or disable the endpoint on timeout). Instead of a detached, unawaited
//! call, deferred work goes through a bounded queue drained by a worker task
//! that logs every outcome, so a reconciliation failure is still observable
//! after the 200 has gone out.

use std::sync::Arc;

use tokio::{
  sync::mpsc::{self, error::TrySendError},
  task::JoinHandle,
};

use marquee_core::{
  event::UserEvent,
  reconcile::{self, Outcome},
  store::UserStore,
};

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Sending half of the sync queue, held in the axum state.
#[derive(Clone)]
pub struct SyncQueue {
  tx: mpsc::Sender<UserEvent>,
}

impl SyncQueue {
  /// Hand an event to the worker without blocking the acknowledgement path.
  /// Fails only when the queue is full or the worker has shut down.
  pub fn enqueue(&self, event: UserEvent) -> Result<(), TrySendError<UserEvent>> {
    self.tx.try_send(event)
  }
}

/// Spawn the worker task draining the queue against `store`.
///
/// The returned handle outlives every HTTP response; dropping all `SyncQueue`
/// clones closes the channel and lets the worker exit.
pub fn spawn<S>(store: Arc<S>, capacity: usize) -> (SyncQueue, JoinHandle<()>)
where
  S: UserStore + 'static,
{
  let (tx, mut rx) = mpsc::channel(capacity);
  let handle = tokio::spawn(async move {
    while let Some(event) = rx.recv().await {
      apply_logged(store.as_ref(), &event).await;
    }
    tracing::debug!("sync queue closed; worker exiting");
  });
  (SyncQueue { tx }, handle)
}

/// Apply one event and log the outcome. Shared with the bus consumer.
pub(crate) async fn apply_logged<S: UserStore>(store: &S, event: &UserEvent) {
  match reconcile::apply(store, event).await {
    Ok(Outcome::Created(record)) => {
      tracing::info!(user_id = %record.user_id, "user created");
    }
    Ok(Outcome::Updated(record)) => {
      tracing::info!(user_id = %record.user_id, "user updated");
    }
    Ok(Outcome::Deleted(user_id)) => {
      tracing::info!(user_id = %user_id, "user deleted");
    }
    Ok(Outcome::Absent(user_id)) => {
      tracing::warn!(user_id = %user_id, "delete for unknown user; nothing to do");
    }
    Ok(Outcome::Ignored) => {
      tracing::debug!(kind = ?event.kind, "ignoring unhandled event type");
    }
    // The provider already received its 200; this log line is the failure
    // channel for the delivery.
    Err(e) => {
      tracing::error!(kind = ?event.kind, error = %e, "reconciliation failed");
    }
  }
}
