//! Webhook signature verification (Svix scheme, as used by the identity
//! provider).
//!
//! The provider signs `"{id}.{timestamp}.{body}"` with HMAC-SHA256 and sends
//! the result base64-encoded in the `svix-signature` header, which may carry
//! several space-separated `v1,<base64>` candidates (one per active secret
//! during rotation). Verification must run over the raw request bytes; a
//! re-serialised body would change the signature input.

use axum::http::HeaderMap;
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use marquee_core::event::UserEvent;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted clock skew between the provider and us, in seconds.
pub const TOLERANCE_SECS: i64 = 5 * 60;

pub const HEADER_ID: &str = "svix-id";
pub const HEADER_TIMESTAMP: &str = "svix-timestamp";
pub const HEADER_SIGNATURE: &str = "svix-signature";

#[derive(Debug, Error)]
pub enum SignatureError {
  #[error("missing required header: {0}")]
  MissingHeader(&'static str),

  #[error("webhook secret is not valid base64")]
  InvalidSecret,

  #[error("timestamp header is not a unix timestamp")]
  InvalidTimestamp,

  #[error("timestamp outside the permitted tolerance")]
  TimestampOutOfTolerance,

  #[error("no signature matched the payload")]
  Mismatch,

  #[error("payload is not a valid event: {0}")]
  InvalidPayload(#[from] marquee_core::Error),
}

// ─── Secret ──────────────────────────────────────────────────────────────────

/// The shared signing secret, held as a keyed HMAC ready to clone per
/// delivery.
#[derive(Clone)]
pub struct WebhookSecret {
  mac: HmacSha256,
}

impl WebhookSecret {
  /// Accepts the provider's `whsec_<base64>` form; the prefix is optional.
  pub fn new(secret: &str) -> Result<Self, SignatureError> {
    let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
    let key = B64
      .decode(encoded)
      .map_err(|_| SignatureError::InvalidSecret)?;
    let mac = HmacSha256::new_from_slice(&key)
      .map_err(|_| SignatureError::InvalidSecret)?;
    Ok(Self { mac })
  }

  fn mac(&self) -> HmacSha256 { self.mac.clone() }

  /// Produce a `v1,<base64>` signature for the given delivery. The provider
  /// does this on its side; we use it to forge deliveries in tests and local
  /// tooling.
  pub fn sign(&self, msg_id: &str, timestamp: &str, payload: &[u8]) -> String {
    let mut mac = self.mac();
    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("v1,{}", B64.encode(mac.finalize().into_bytes()))
  }
}

// ─── Headers ─────────────────────────────────────────────────────────────────

/// The provider-supplied header triple on every delivery.
#[derive(Debug, Clone)]
pub struct WebhookHeaders {
  pub id:        String,
  pub timestamp: String,
  pub signature: String,
}

impl WebhookHeaders {
  pub fn from_header_map(headers: &HeaderMap) -> Result<Self, SignatureError> {
    let get = |name: &'static str| {
      headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(SignatureError::MissingHeader(name))
    };
    Ok(Self {
      id:        get(HEADER_ID)?,
      timestamp: get(HEADER_TIMESTAMP)?,
      signature: get(HEADER_SIGNATURE)?,
    })
  }
}

// ─── Verification ────────────────────────────────────────────────────────────

/// Verify a delivery against the shared secret. No side effects.
pub fn verify(
  secret: &WebhookSecret,
  headers: &WebhookHeaders,
  payload: &[u8],
) -> Result<(), SignatureError> {
  let timestamp: i64 = headers
    .timestamp
    .parse()
    .map_err(|_| SignatureError::InvalidTimestamp)?;
  let now = Utc::now().timestamp();
  // The header is attacker-controlled; the subtraction must not overflow on
  // extreme values.
  match now.checked_sub(timestamp) {
    Some(skew) if skew.saturating_abs() <= TOLERANCE_SECS => {}
    _ => return Err(SignatureError::TimestampOutOfTolerance),
  }

  let mut mac = secret.mac();
  mac.update(headers.id.as_bytes());
  mac.update(b".");
  mac.update(headers.timestamp.as_bytes());
  mac.update(b".");
  mac.update(payload);

  for candidate in headers.signature.split_whitespace() {
    let Some(encoded) = candidate.strip_prefix("v1,") else {
      continue;
    };
    let Ok(bytes) = B64.decode(encoded) else {
      continue;
    };
    // verify_slice is constant-time.
    if mac.clone().verify_slice(&bytes).is_ok() {
      return Ok(());
    }
  }
  Err(SignatureError::Mismatch)
}

/// Verify a delivery and parse its body into a typed event.
pub fn verify_and_parse(
  secret: &WebhookSecret,
  headers: &WebhookHeaders,
  payload: &[u8],
) -> Result<UserEvent, SignatureError> {
  verify(secret, headers, payload)?;
  Ok(UserEvent::from_json(payload)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
