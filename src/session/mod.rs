//! Client-side session state
//!
//! The token pair is the only shared mutable state of the client. It lives
//! behind the [`SessionStore`] trait so the API client never reaches for
//! ambient storage, and tests can inject an in-memory store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

mod file;
mod identity;
mod memory;
mod navigator;

pub use file::FileSessionStore;
pub use identity::DecodedIdentity;
pub use memory::MemorySessionStore;
#[cfg(test)]
pub use navigator::RecordingNavigator;
pub use navigator::{Navigator, TerminalNavigator};

/// An authenticated session: the access/refresh token pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Short-lived credential sent as the bearer token
    pub access_token: String,

    /// Longer-lived credential used only to obtain a new access token
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens never end up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Raw storage slots; either may be missing independently.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for SessionSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSlots")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SessionSlots {
    /// A session exists only when a refresh token does.
    pub fn session(&self) -> Option<Session> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) => Some(Session::new(access, refresh)),
            _ => None,
        }
    }
}

/// Persistent storage for the token pair.
///
/// Writes must be visible to every read issued after they return.
pub trait SessionStore: Send + Sync {
    /// Read both slots.
    fn slots(&self) -> Result<SessionSlots>;

    /// Replace both slots with a fresh session.
    fn store(&self, session: &Session) -> Result<()>;

    /// Replace the access token, keeping the refresh token.
    fn set_access_token(&self, token: &str) -> Result<()>;

    /// Remove both tokens. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<()>;

    /// The current session, if both tokens are present.
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.slots()?.session())
    }

    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.slots()?.access_token)
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.slots()?.refresh_token)
    }
}
