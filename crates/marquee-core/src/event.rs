//! Identity-provider lifecycle events and field derivation.
//!
//! The provider delivers `user.created` / `user.updated` / `user.deleted`
//! events whose payload mirrors its own user object. Only the fields the
//! reconciler needs are modelled; everything else is ignored by serde.

use serde::Deserialize;

use crate::{
  Error, Result,
  user::UserFields,
};

/// Display name used when the payload carries neither a first nor last name.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// Deterministic placeholder address used when the payload references a
/// primary email that has not resolved to an address yet. A later
/// `user.updated` event is expected to supply the real one.
pub fn placeholder_email(user_id: &str) -> String {
  format!("user_{user_id}@placeholder.com")
}

// ─── Event envelope ──────────────────────────────────────────────────────────

/// The lifecycle transition an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UserEventKind {
  #[serde(rename = "user.created")]
  Created,
  #[serde(rename = "user.updated")]
  Updated,
  #[serde(rename = "user.deleted")]
  Deleted,
  /// Any event type we do not handle. Kept so an unrecognised delivery is
  /// acknowledged and skipped rather than rejected.
  #[serde(other)]
  Other,
}

/// A verified, parsed identity event.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEvent {
  #[serde(rename = "type")]
  pub kind: UserEventKind,
  pub data: UserPayload,
}

impl UserEvent {
  /// Parse an event from raw JSON bytes (the verified webhook body).
  pub fn from_json(bytes: &[u8]) -> Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// One entry of the provider's `email_addresses` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailEntry {
  #[serde(default)]
  pub id:            Option<String>,
  #[serde(default)]
  pub email_address: Option<String>,
}

/// The provider's user object, reduced to the fields we persist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
  #[serde(default)]
  pub id:                       Option<String>,
  #[serde(default)]
  pub first_name:               Option<String>,
  #[serde(default)]
  pub last_name:                Option<String>,
  #[serde(default)]
  pub email_addresses:          Vec<EmailEntry>,
  #[serde(default)]
  pub primary_email_address_id: Option<String>,
  #[serde(default)]
  pub image_url:                Option<String>,
}

impl UserPayload {
  /// The provider subject id. Required for every transition.
  pub fn user_id(&self) -> Result<&str> {
    self
      .id
      .as_deref()
      .filter(|id| !id.is_empty())
      .ok_or(Error::MissingUserId)
  }

  /// `trim(first + " " + last)`, falling back to [`UNKNOWN_USER_NAME`].
  pub fn display_name(&self) -> String {
    let first = self.first_name.as_deref().unwrap_or("");
    let last  = self.last_name.as_deref().unwrap_or("");
    let full  = format!("{first} {last}");
    let full  = full.trim();
    if full.is_empty() {
      UNKNOWN_USER_NAME.to_string()
    } else {
      full.to_string()
    }
  }

  /// Email derivation: first listed address if populated; else the
  /// deterministic placeholder when a primary-email reference exists but no
  /// address has resolved; else `None`.
  pub fn email(&self, user_id: &str) -> Option<String> {
    if let Some(address) = self
      .email_addresses
      .first()
      .and_then(|entry| entry.email_address.as_deref())
      .filter(|address| !address.is_empty())
    {
      return Some(address.to_string());
    }
    if self.primary_email_address_id.is_some() {
      return Some(placeholder_email(user_id));
    }
    None
  }

  /// The full derived field set for an upsert or update.
  pub fn fields(&self, user_id: &str) -> UserFields {
    UserFields {
      email: self.email(user_id),
      name:  self.display_name(),
      image: self.image_url.clone().unwrap_or_default(),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(json: serde_json::Value) -> UserPayload {
    serde_json::from_value(json).unwrap()
  }

  #[test]
  fn parses_created_event() {
    let raw = br#"{
      "type": "user.created",
      "data": {
        "id": "u1",
        "first_name": "Ann",
        "last_name": "Lee",
        "email_addresses": [{"email_address": "a@x.com"}],
        "image_url": "http://img/a.png"
      }
    }"#;
    let event = UserEvent::from_json(raw).unwrap();
    assert_eq!(event.kind, UserEventKind::Created);
    assert_eq!(event.data.user_id().unwrap(), "u1");
  }

  #[test]
  fn unrecognised_event_type_parses_as_other() {
    let raw = br#"{"type": "session.created", "data": {}}"#;
    let event = UserEvent::from_json(raw).unwrap();
    assert_eq!(event.kind, UserEventKind::Other);
  }

  #[test]
  fn display_name_concatenates_and_trims() {
    let p = payload(serde_json::json!({ "first_name": "Ann", "last_name": "Lee" }));
    assert_eq!(p.display_name(), "Ann Lee");

    let first_only = payload(serde_json::json!({ "first_name": "Ann" }));
    assert_eq!(first_only.display_name(), "Ann");
  }

  #[test]
  fn empty_names_fall_back_to_unknown_user() {
    let p = payload(serde_json::json!({ "first_name": "", "last_name": "" }));
    assert_eq!(p.display_name(), UNKNOWN_USER_NAME);

    let absent = payload(serde_json::json!({}));
    assert_eq!(absent.display_name(), UNKNOWN_USER_NAME);
  }

  #[test]
  fn email_prefers_first_listed_address() {
    let p = payload(serde_json::json!({
      "email_addresses": [
        { "email_address": "first@x.com" },
        { "email_address": "second@x.com" }
      ],
      "primary_email_address_id": "ema_1"
    }));
    assert_eq!(p.email("u1").as_deref(), Some("first@x.com"));
  }

  #[test]
  fn email_synthesizes_placeholder_for_unresolved_primary() {
    let p = payload(serde_json::json!({
      "email_addresses": [],
      "primary_email_address_id": "ema_1"
    }));
    assert_eq!(p.email("u1").as_deref(), Some("user_u1@placeholder.com"));
  }

  #[test]
  fn email_is_none_without_addresses_or_primary_reference() {
    let p = payload(serde_json::json!({}));
    assert_eq!(p.email("u1"), None);
  }

  #[test]
  fn missing_id_is_an_error() {
    let p = payload(serde_json::json!({ "first_name": "Ann" }));
    assert!(matches!(p.user_id(), Err(Error::MissingUserId)));

    let empty = payload(serde_json::json!({ "id": "" }));
    assert!(matches!(empty.user_id(), Err(Error::MissingUserId)));
  }
}
