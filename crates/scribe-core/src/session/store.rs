//! Session store
//!
//! Sessions are stored one per file as `<dir>/<id>.json`. The store holds the
//! active session in memory; nothing is written until [`SessionStore::save`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::types::{Session, SessionContext};

/// Name of the session created when none is active
pub const DEFAULT_SESSION_NAME: &str = "default";

pub struct SessionStore {
    dir: PathBuf,
    workspace: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    /// New sessions capture `workspace` as their working directory.
    pub fn new(dir: impl Into<PathBuf>, workspace: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            workspace: workspace.into(),
            current: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Create a session and make it active. The previous session is not saved.
    pub fn create(&mut self, name: &str) -> &mut Session {
        let session = Session::new(name, SessionContext::capture(&self.workspace));
        info!("Created session {} ({})", session.id, name);
        self.current.insert(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(self.session_path(&session.id), json)?;
        debug!("Saved session {}", session.id);
        Ok(())
    }

    /// Save the active session, if any
    pub fn save_current(&self) -> Result<()> {
        match &self.current {
            Some(session) => self.save(session),
            None => Ok(()),
        }
    }

    pub fn load(&self, id: &str) -> Result<Session> {
        let path = self.session_path(id);
        if !path.is_file() {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        let json = std::fs::read_to_string(&path)?;
        let session = serde_json::from_str(&json)
            .map_err(|e| Error::Session(format!("failed to parse session {}: {}", id, e)))?;
        Ok(session)
    }

    /// All readable sessions, most recently updated first
    pub fn list(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<Session>(&json) {
                    Ok(session) => sessions.push(session),
                    Err(e) => warn!("Skipping unreadable session {:?}: {}", path, e),
                },
                Err(e) => warn!("Failed to read session {:?}: {}", path, e),
            }
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    /// Resolve a full id or a unique id prefix to a stored session id
    pub fn resolve(&self, id_or_prefix: &str) -> Result<String> {
        if id_or_prefix.is_empty() {
            return Err(Error::SessionNotFound(String::new()));
        }
        if self.session_path(id_or_prefix).is_file() {
            return Ok(id_or_prefix.to_string());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) {
                if stem.starts_with(id_or_prefix) {
                    matches.push(stem);
                }
            }
        }

        match matches.len() {
            0 => Err(Error::SessionNotFound(id_or_prefix.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(Error::Session(format!(
                "session id prefix '{}' is ambiguous ({} matches)",
                id_or_prefix, n
            ))),
        }
    }

    /// Load a stored session and make it active. The outgoing session is not saved.
    pub fn switch(&mut self, id_or_prefix: &str) -> Result<&mut Session> {
        let id = self.resolve(id_or_prefix)?;
        let session = self.load(&id)?;
        info!("Switched to session {}", session.id);
        Ok(self.current.insert(session))
    }

    /// Delete a stored session. The active session cannot be deleted.
    pub fn delete(&mut self, id_or_prefix: &str) -> Result<String> {
        let id = self.resolve(id_or_prefix)?;
        if self.current.as_ref().is_some_and(|s| s.id == id) {
            return Err(Error::ActiveSessionDelete(id));
        }
        std::fs::remove_file(self.session_path(&id))?;
        info!("Deleted session {}", id);
        Ok(id)
    }

    /// Active session, created as `"default"` on first use
    pub fn current(&mut self) -> &Session {
        self.current_mut()
    }

    pub fn current_mut(&mut self) -> &mut Session {
        match self.current {
            Some(ref mut session) => session,
            None => self.create(DEFAULT_SESSION_NAME),
        }
    }

    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }
}
