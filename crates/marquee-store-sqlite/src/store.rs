//! [`SqliteStore`] — the SQLite implementation of [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use marquee_core::{
  store::UserStore,
  user::{UserFields, UserRecord},
};

use crate::{
  Error, Result,
  encode::{RawUser, encode_dt},
  schema::SCHEMA,
};

/// Column list shared by every SELECT; order matches [`RawUser::from_row`].
pub const USER_COLUMNS: &str =
  "user_id, email, name, image, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Marquee user store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, so the
/// server handlers and the sync worker share one connection. Opening the
/// store is the "ensure connected" step of the service lifecycle; a failure
/// here is treated as fatal by the binary.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
    let id = user_id.to_string();
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawUser::into_record).transpose()
  }
}

// ─── UserStore implementation ────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn upsert_user(
    &self,
    user_id: &str,
    fields: UserFields,
  ) -> Result<UserRecord, Self::Error> {
    let id = user_id.to_string();
    let now = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        // created_at is written once; the conflict arm leaves it untouched.
        conn.execute(
          "INSERT INTO users (user_id, email, name, image, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)
           ON CONFLICT(user_id) DO UPDATE SET
             email      = excluded.email,
             name       = excluded.name,
             image      = excluded.image,
             updated_at = excluded.updated_at",
          rusqlite::params![id, fields.email, fields.name, fields.image, now],
        )?;

        let raw = conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
          rusqlite::params![id],
          RawUser::from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_record()
  }

  async fn update_user(
    &self,
    user_id: &str,
    fields: UserFields,
  ) -> Result<Option<UserRecord>, Self::Error> {
    let id = user_id.to_string();
    let now = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users
           SET email = ?2, name = ?3, image = ?4, updated_at = ?5
           WHERE user_id = ?1",
          rusqlite::params![id, fields.email, fields.name, fields.image, now],
        )?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch_user(user_id).await
  }

  async fn delete_user(&self, user_id: &str) -> Result<bool, Self::Error> {
    let id = user_id.to_string();
    let removed: usize = self
      .conn
      .call(move |conn| {
        let removed = conn
          .execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id])?;
        Ok(removed)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn get_user(
    &self,
    user_id: &str,
  ) -> Result<Option<UserRecord>, Self::Error> {
    self.fetch_user(user_id).await
  }

  async fn list_users(&self) -> Result<Vec<UserRecord>, Self::Error> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, user_id"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_record).collect()
  }
}
