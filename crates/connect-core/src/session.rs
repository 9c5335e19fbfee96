//! # Session Types
//!
//! The session record is the only user data this app ever hands to the
//! browser. It is built once at callback time from the provider profile and
//! carried inside the signed session token from then on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display-safe subset of the provider's public profile.
///
/// Exactly these three fields are forwarded to the browser; nothing else from
/// the provider profile is trusted across that boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublicProfile {
    /// Account handle (e.g., "alice"), also the payment destination
    pub handle: String,

    /// Human-readable display name
    pub display_name: String,

    /// Avatar image URL
    pub avatar_url: String,
}

/// A browser session minted at authorization-callback time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique session identifier; keys the authorization token store
    pub session_id: Uuid,

    /// Display-safe user fields
    pub user: UserPublicProfile,
}

impl SessionRecord {
    /// Create a fresh session for a user (new random session id)
    pub fn new(user: UserPublicProfile) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user,
        }
    }
}
