//! In-memory session store

use std::sync::RwLock;

use super::{Session, SessionSlots, SessionStore};
use crate::error::{Result, SessionError};

/// Session store backed by process memory.
///
/// Default store of a client built without one, and the store used in tests.
#[derive(Default)]
pub struct MemorySessionStore {
    slots: RwLock<SessionSlots>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    #[cfg(test)]
    pub fn with_session(session: Session) -> Self {
        Self {
            slots: RwLock::new(SessionSlots {
                access_token: Some(session.access_token),
                refresh_token: Some(session.refresh_token),
            }),
        }
    }

    /// Create a store from raw slots, e.g. an access token without a refresh token.
    #[cfg(test)]
    pub fn with_slots(slots: SessionSlots) -> Self {
        Self {
            slots: RwLock::new(slots),
        }
    }

    fn update(&self, f: impl FnOnce(&mut SessionSlots)) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| SessionError::Write(e.to_string()))?;
        f(&mut slots);
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn slots(&self) -> Result<SessionSlots> {
        let slots = self
            .slots
            .read()
            .map_err(|e| SessionError::Read(e.to_string()))?;
        Ok(slots.clone())
    }

    fn store(&self, session: &Session) -> Result<()> {
        self.update(|slots| {
            slots.access_token = Some(session.access_token.clone());
            slots.refresh_token = Some(session.refresh_token.clone());
        })
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.update(|slots| slots.access_token = Some(token.to_string()))
    }

    fn clear(&self) -> Result<()> {
        self.update(|slots| *slots = SessionSlots::default())
    }
}
