// insiders-client/src/session.rs
// Session storage - JSON file under the session directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::CustomerRecord;
use tracing::{debug, warn};

use crate::{ClientError, ClientResult};

const SESSION_FILE: &str = "session.json";

/// Persisted session state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionData {
    /// Signed-in customer (self-service pages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<CustomerRecord>,
    /// Signed-in admin email (admin console marker)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_email: Option<String>,
    /// Backend cookies, `Cookie` header form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cookies: Option<String>,
}

/// Explicit session handle passed to every command
///
/// Lifecycle: `load` at start, mutate, `save`; `clear` on sign-out.
#[derive(Debug, Clone)]
pub struct SessionContext {
    path: PathBuf,
    data: SessionData,
}

impl SessionContext {
    /// Empty session stored under `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(SESSION_FILE),
            data: SessionData::default(),
        }
    }

    /// Load the session under `dir`; a missing file is an empty session.
    ///
    /// An unreadable file is discarded with a warning so a corrupt session
    /// never locks the user out of signing in again.
    pub fn load(dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let mut session = Self::new(dir);
        if !session.path.exists() {
            return Ok(session);
        }
        let json = fs::read_to_string(&session.path)?;
        match serde_json::from_str(&json) {
            Ok(data) => session.data = data,
            Err(e) => warn!(path = %session.path.display(), error = %e, "Discarding unreadable session"),
        }
        debug!(path = %session.path.display(), "Session loaded");
        Ok(session)
    }

    pub fn save(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Forget everything and delete the file
    pub fn clear(&mut self) -> ClientResult<()> {
        self.data = SessionData::default();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user(&self) -> Option<&CustomerRecord> {
        self.data.user.as_ref()
    }

    pub fn set_user(&mut self, user: CustomerRecord) {
        self.data.user = Some(user);
    }

    pub fn admin_email(&self) -> Option<&str> {
        self.data.admin_email.as_deref()
    }

    pub fn set_admin(&mut self, email: impl Into<String>) {
        self.data.admin_email = Some(email.into());
    }

    pub fn cookies(&self) -> Option<&str> {
        self.data.cookies.as_deref()
    }

    pub fn set_cookies(&mut self, cookies: Option<String>) {
        self.data.cookies = cookies;
    }

    /// Admin marker or a session error
    pub fn require_admin(&self) -> ClientResult<&str> {
        self.admin_email()
            .ok_or_else(|| ClientError::Session("admin sign-in required".into()))
    }

    /// Signed-in customer or a session error
    pub fn require_user(&self) -> ClientResult<&CustomerRecord> {
        self.user()
            .ok_or_else(|| ClientError::Session("customer sign-in required".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CustomerId, FixedFields};
    use tempfile::TempDir;

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let mut session = SessionContext::load(dir.path()).unwrap();
        assert!(session.user().is_none());
        assert!(session.admin_email().is_none());
        assert!(session.cookies().is_none());
        assert!(session.require_admin().is_err());

        let mut user = FixedFields::new(CustomerId::Int(4));
        user.name = "Ann".into();
        session.set_user(user.into());
        session.set_admin("boss@bk.com");
        session.set_cookies(Some("sid=1".into()));
        session.save().unwrap();

        let loaded = SessionContext::load(dir.path()).unwrap();
        assert_eq!(loaded.admin_email(), Some("boss@bk.com"));
        assert_eq!(loaded.require_user().unwrap().display_name(), "Ann");
        assert_eq!(loaded.cookies(), Some("sid=1"));

        session.clear().unwrap();
        assert!(!session.path().exists());
        assert!(session.user().is_none());
        assert!(SessionContext::load(dir.path()).unwrap().admin_email().is_none());
    }

    #[test]
    fn test_corrupt_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        let session = SessionContext::load(dir.path()).unwrap();
        assert!(session.user().is_none());
    }
}
