//! Local session persistence.
//!
//! A session is exactly two files under the state directory: the bearer
//! token and the user record. The session counts as active only when both
//! are present and the user record parses; a record that fails to parse
//! forces a logout so a corrupt session can never half-exist.
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::{debug, error, info, warn};
use tempfile::NamedTempFile;

use crate::{
    demo, AuthApi, AuthSession, Config, DiaglabError, LoginRequest, RegisterRequest,
    RegisterResponse, Result, User,
};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Holds the signed-in identity and keeps it in sync with disk.
pub struct SessionStore {
    state_dir: PathBuf,
    auth: AuthApi,
    user: Option<User>,
    token: Option<String>,
}

impl SessionStore {
    pub fn new(config: &Config) -> Self {
        SessionStore {
            state_dir: config.state_dir.clone(),
            auth: AuthApi::new(&config.auth_url),
            user: None,
            token: None,
        }
    }

    fn token_path(&self) -> PathBuf {
        self.state_dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.state_dir.join(USER_FILE)
    }

    /// Loads any persisted session into memory. Returns whether a session
    /// is active afterwards. Unreadable or corrupt state signs the user
    /// out rather than erroring.
    pub fn restore(&mut self) -> bool {
        let token_path = self.token_path();
        let user_path = self.user_path();

        if !token_path.exists() || !user_path.exists() {
            debug!("No stored session in {}", self.state_dir.display());
            return false;
        }

        let token = match fs::read_to_string(&token_path) {
            Ok(raw) => raw.trim().to_string(),
            Err(e) => {
                warn!("Failed to read stored token, signing out: {}", e);
                self.logout();
                return false;
            }
        };
        if token.is_empty() {
            warn!("Stored token is empty, signing out");
            self.logout();
            return false;
        }

        let raw_user = match fs::read_to_string(&user_path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read stored user record, signing out: {}", e);
                self.logout();
                return false;
            }
        };
        let user: User = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Stored user record is corrupt, signing out: {}", e);
                self.logout();
                return false;
            }
        };

        info!("Restored session for {}", user.email);
        self.token = Some(token);
        self.user = Some(user);
        true
    }

    /// Signs in against the service and persists the session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = self.auth.login(&request).await?;
        self.adopt(session.clone())?;
        Ok(session)
    }

    /// Creates an account. The caller still has to log in afterwards.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.auth.register(&request).await
    }

    /// Starts the canned offline demo session and persists it like a real
    /// one.
    pub fn login_as_demo(&mut self) -> Result<AuthSession> {
        let session = demo::demo_session();
        self.adopt(session.clone())?;
        info!("Demo session started");
        Ok(session)
    }

    /// Clears the session from memory and disk. Disk removal is
    /// best-effort; a failure is logged, not raised.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;

        for path in [self.token_path(), self.user_path()] {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    fn adopt(&mut self, session: AuthSession) -> Result<()> {
        self.persist(&session)?;
        self.token = Some(session.token);
        self.user = Some(session.user);
        Ok(())
    }

    fn persist(&self, session: &AuthSession) -> Result<()> {
        if !self.state_dir.exists() {
            debug!("Creating state directory: {}", self.state_dir.display());
            fs::create_dir_all(&self.state_dir).map_err(|e| {
                error!("Failed to create state directory: {}", e);
                DiaglabError::DirectoryError {
                    path: self.state_dir.clone(),
                }
            })?;
        }

        fs::write(self.token_path(), &session.token)?;

        // Replace the user record atomically so a crash cannot leave half
        // a file behind.
        let json = serde_json::to_string_pretty(&session.user)?;
        let mut temp_file = NamedTempFile::new_in(&self.state_dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(self.user_path()).map_err(|e| {
            error!("Failed to persist user record: {}", e.error);
            DiaglabError::Io(e.error)
        })?;

        info!("Session persisted for {}", session.user.email);
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// True when the active session is the built-in demo identity.
    pub fn is_demo(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.user_id == demo::DEMO_USER_ID)
    }

    /// The bearer token, or `NoSession` when signed out.
    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(DiaglabError::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> SessionStore {
        let config = Config {
            state_dir: dir.to_path_buf(),
            ..Default::default()
        };
        SessionStore::new(&config)
    }

    #[test]
    fn demo_session_round_trips_through_disk() {
        let dir = tempdir().unwrap();

        let mut first = store_in(dir.path());
        first.login_as_demo().unwrap();
        assert!(first.is_authenticated());
        assert!(first.is_demo());

        let mut second = store_in(dir.path());
        assert!(second.restore());
        assert_eq!(second.user().unwrap().user_id, demo::DEMO_USER_ID);
        assert_eq!(second.token().unwrap(), demo::DEMO_TOKEN);
    }

    #[test]
    fn missing_files_mean_signed_out() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(!store.restore());
        assert!(!store.is_authenticated());
        assert!(store.require_token().is_err());
    }

    #[test]
    fn one_file_alone_is_not_a_session() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TOKEN_FILE), "tok-123").unwrap();

        let mut store = store_in(dir.path());
        assert!(!store.restore());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn corrupt_user_record_forces_logout() {
        let dir = tempdir().unwrap();
        let mut seeded = store_in(dir.path());
        seeded.login_as_demo().unwrap();

        fs::write(dir.path().join(USER_FILE), "{definitely not json").unwrap();

        let mut store = store_in(dir.path());
        assert!(!store.restore());
        assert!(!store.is_authenticated());
        // forced logout wipes both files
        assert!(!dir.path().join(USER_FILE).exists());
        assert!(!dir.path().join(TOKEN_FILE).exists());
    }

    #[test]
    fn logout_removes_both_files_and_is_repeatable() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.login_as_demo().unwrap();

        store.logout();
        assert!(!store.is_authenticated());
        assert!(!dir.path().join(TOKEN_FILE).exists());
        assert!(!dir.path().join(USER_FILE).exists());

        // second logout is a no-op
        store.logout();
    }

    #[test]
    fn empty_token_file_forces_logout() {
        let dir = tempdir().unwrap();
        let mut seeded = store_in(dir.path());
        seeded.login_as_demo().unwrap();
        fs::write(dir.path().join(TOKEN_FILE), "\n").unwrap();

        let mut store = store_in(dir.path());
        assert!(!store.restore());
        assert!(!dir.path().join(USER_FILE).exists());
    }
}
