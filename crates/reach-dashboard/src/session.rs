//! Demo login session.
//!
//! The session is a JSON file under the user config directory holding
//! `{email, created_at}`. It has an explicit lifecycle: created on login,
//! removed on logout, loaded once at startup. It is not a security
//! boundary and nothing validates it server-side.

use std::fs;
use std::path::PathBuf;

use thiserror::Error as ThisError;
use tracing::warn;

use reach_core::{defaults, Error, Result, Session};

/// Validation errors shown on the login form. The messages are the exact
/// copy the form displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum LoginError {
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Demo login rules: any email containing `@` plus any non-empty password.
///
/// Rejection happens before any network call is made.
pub fn validate_login(email: &str, password: &str) -> std::result::Result<(), LoginError> {
    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }
    if !email.contains('@') {
        return Err(LoginError::InvalidEmail);
    }
    Ok(())
}

/// File-backed session store.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform config directory
    /// (`<config>/reachinbox/session.json`).
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("no user config directory".to_string()))?;
        Ok(Self::with_path(
            base.join(defaults::CONFIG_DIR).join(defaults::SESSION_FILE),
        ))
    }

    /// Store at an explicit path (tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the current session, if any. A corrupt file counts as logged
    /// out rather than an error.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }

    /// Persist a freshly minted session (login).
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the session file (logout). Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Session(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
