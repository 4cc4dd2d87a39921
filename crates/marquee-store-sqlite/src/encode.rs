//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use marquee_core::user::UserRecord;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// A `users` row as read from SQLite, before timestamp decoding.
pub struct RawUser {
  pub user_id:    String,
  pub email:      Option<String>,
  pub name:       String,
  pub image:      String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  /// Column order must match [`crate::store::USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      email:      row.get(1)?,
      name:       row.get(2)?,
      image:      row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<UserRecord> {
    Ok(UserRecord {
      user_id:    self.user_id,
      email:      self.email,
      name:       self.name,
      image:      self.image,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
