//! The `UserStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `marquee-store-sqlite`).
//! Higher layers (the HTTP server, the sync worker, the bus consumer) depend
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::user::{UserFields, UserRecord};

/// Abstraction over the user collection.
///
/// Uniqueness of a record per identity key is enforced structurally by the
/// backend (primary key + upsert), never by a secondary check. Correctness
/// under concurrent writers relies on the backend's atomic by-key operations;
/// the last writer wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or update the record for `user_id`. Idempotent: re-applying the
  /// same fields leaves a single, identical record. `created_at` is
  /// preserved when the record already exists.
  fn upsert_user<'a>(
    &'a self,
    user_id: &'a str,
    fields: UserFields,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + 'a;

  /// Update the record for `user_id`. Returns `None` (not an error) when no
  /// record exists; the caller decides the fallback.
  fn update_user<'a>(
    &'a self,
    user_id: &'a str,
    fields: UserFields,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + 'a;

  /// Remove the record for `user_id`. Returns whether a record was removed;
  /// deleting an absent key is a no-op, not an error.
  fn delete_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a record by identity key. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + 'a;

  /// List every record in the collection.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserRecord>, Self::Error>> + Send + '_;
}
