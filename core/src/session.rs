//! Session/auth state consulted by the pipeline.
//!
//! The pipeline never owns the session. It holds an `Arc<dyn SessionStore>`,
//! reads the token once per request during interception, and calls `clear`
//! when the server answers 401. Concurrent clears are last-write-wins.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Read/clear access to the current authenticated identity.
pub trait SessionStore: Send + Sync {
    /// Current token, if a member is logged in.
    fn token(&self) -> Option<String>;

    /// Forget the logged-in member.
    fn clear(&self);
}

/// Logged-in member as returned by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub token: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
}

impl Profile {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            id: String::new(),
            account: String::new(),
            mobile: String::new(),
            nickname: String::new(),
            avatar: String::new(),
        }
    }
}

/// In-memory member store, one per process.
#[derive(Debug, Default)]
pub struct MemberStore {
    profile: RwLock<Option<Profile>>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.profile.read().clone()
    }

    pub fn set_profile(&self, profile: Profile) {
        *self.profile.write() = Some(profile);
    }
}

impl SessionStore for MemberStore {
    fn token(&self) -> Option<String> {
        self.profile
            .read()
            .as_ref()
            .map(|p| p.token.clone())
            .filter(|t| !t.is_empty())
    }

    fn clear(&self) {
        *self.profile.write() = None;
    }
}
