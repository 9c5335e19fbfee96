//! # Session Token Codec
//!
//! Issues and verifies the signed, expiring token the browser holds.
//!
//! Wire format is `base64url(claims json).hex(hmac-sha256)`, signed with a
//! process-wide secret. Verification recomputes the signature over the
//! encoded claims and compares in constant time before anything is parsed
//! out of the payload, so a forged token learns nothing about why it was
//! rejected beyond invalid-vs-expired.

use crate::error::{ConnectError, ConnectResult};
use crate::session::SessionRecord;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Signed claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    record: SessionRecord,

    /// Issuance time (unix seconds)
    iat: i64,

    /// Expiry time (unix seconds)
    exp: i64,
}

/// Issues and checks signed session tokens.
///
/// Constructed once at startup with the app secret; `issue` and `verify` are
/// pure computation with no side effects.
#[derive(Clone)]
pub struct SessionTokenCodec {
    secret: String,
    ttl: Duration,
}

impl SessionTokenCodec {
    /// Create a codec with the signing secret and token time-to-live
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Serialize, timestamp, and sign a session record into an opaque token
    pub fn issue(&self, record: &SessionRecord) -> ConnectResult<String> {
        self.issue_at(record, Utc::now().timestamp())
    }

    /// Check signature and expiry, returning the embedded session record.
    ///
    /// Fails with [`ConnectError::InvalidSessionToken`] when the token does
    /// not parse or the signature does not match (indistinguishably), and
    /// with [`ConnectError::ExpiredSessionToken`] when past expiry. Any code
    /// path that authorizes an action must use this, never [`Self::decode`].
    pub fn verify(&self, token: &str) -> ConnectResult<SessionRecord> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Non-verifying optimistic read of the embedded session record.
    ///
    /// Enforces neither signature nor expiry; only for rendering state the
    /// handler already trusts (e.g. echoing back an already-issued token).
    pub fn decode(&self, token: &str) -> Option<SessionRecord> {
        let (encoded, _signature) = token.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;

        Some(claims.record)
    }

    fn issue_at(&self, record: &SessionRecord, now: i64) -> ConnectResult<String> {
        let claims = SessionClaims {
            record: record.clone(),
            iat: now,
            exp: now + self.ttl.num_seconds(),
        };

        let payload = serde_json::to_vec(&claims)
            .map_err(|e| ConnectError::Serialization(format!("Failed to encode claims: {}", e)))?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let signature = compute_hmac_sha256(&self.secret, &encoded);

        Ok(format!("{}.{}", encoded, signature))
    }

    fn verify_at(&self, token: &str, now: i64) -> ConnectResult<SessionRecord> {
        let (encoded, signature) = token
            .split_once('.')
            .ok_or(ConnectError::InvalidSessionToken)?;

        // Signature first; payload contents are untrusted until it passes.
        let expected = compute_hmac_sha256(&self.secret, encoded);
        if !constant_time_compare(signature, &expected) {
            return Err(ConnectError::InvalidSessionToken);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| ConnectError::InvalidSessionToken)?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| ConnectError::InvalidSessionToken)?;

        if now >= claims.exp {
            return Err(ConnectError::ExpiredSessionToken);
        }

        Ok(claims.record)
    }
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
