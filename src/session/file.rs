//! YAML-file session store
//!
//! Persists the token pair across process restarts. The file holds the
//! `accessToken` and `refreshToken` keys. Writes go to a sibling temp file
//! that is renamed over the target, so a reader never sees a half-written pair.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Session, SessionSlots, SessionStore};
use crate::error::{Result, SessionError};

/// Session store backed by a YAML file
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<SessionSlots> {
        if !self.path.exists() {
            return Ok(SessionSlots::default());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| SessionError::Read(format!("{}: {}", self.path.display(), e)))?;
        if contents.trim().is_empty() {
            return Ok(SessionSlots::default());
        }

        let slots = serde_yaml::from_str(&contents)
            .map_err(|e| SessionError::Corrupted(e.to_string()))?;
        Ok(slots)
    }

    fn write_slots(&self, slots: &SessionSlots) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Write(e.to_string()))?;
        }

        let contents =
            serde_yaml::to_string(slots).map_err(|e| SessionError::Write(e.to_string()))?;

        let tmp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp_path, contents).map_err(|e| SessionError::Write(e.to_string()))?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp_path, perms)
                .map_err(|e| SessionError::Write(e.to_string()))?;
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| SessionError::Write(e.to_string()))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut SessionSlots)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SessionError::Write(e.to_string()))?;
        let mut slots = self.read_slots()?;
        f(&mut slots);
        self.write_slots(&slots)
    }
}

impl SessionStore for FileSessionStore {
    fn slots(&self) -> Result<SessionSlots> {
        self.read_slots()
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
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SessionError::Write(e.to_string()))?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Write(e.to_string()).into()),
        }
    }
}
