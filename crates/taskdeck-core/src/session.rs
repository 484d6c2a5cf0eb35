//! Bearer token storage and the session handle.
//!
//! The token lives in `<base>/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Persistent storage for the single session token.
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<()>;
}

/// On-disk shape of the session file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// File-backed token store (`session.json`).
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `TASKDECK_HOME`.
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, file: &SessionFile) -> Result<()> {
        let path = &self.path;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(file).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut handle = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            handle
                .write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        let file: SessionFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;

        Ok(file.token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        self.write(&SessionFile {
            token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))
    }
}

/// In-memory token store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned lock still holds a valid Option<String>.
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Explicit session context: cached token plus the store it persists to.
///
/// Cloning is cheap; clones share the store but each keeps its own cached view,
/// so one owner (the UI runtime or a CLI command) should drive mutations.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Opens a session by reading the current token from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: Arc<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?;
        Ok(Self { store, token })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Persists a new token and caches it.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written; the cached token is
    /// left unchanged in that case.
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.store.save(token)?;
        self.token = Some(token.to_string());
        tracing::info!("session token stored");
        Ok(())
    }

    /// Drops the cached token and clears the store.
    ///
    /// The cached token is dropped even if the store fails, so the session
    /// never keeps using a token the server rejected.
    ///
    /// # Errors
    /// Returns an error if the store cannot be cleared.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        tracing::info!("session token cleared");
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save("tok123").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok123".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.save("secret").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_empty_token_in_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": ""}"#).unwrap();

        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_session_set_and_clear_reach_the_store() {
        let store = Arc::new(MemoryTokenStore::default());
        let mut session = Session::open(Arc::clone(&store) as Arc<dyn TokenStore>).unwrap();
        assert!(!session.is_authenticated());

        session.set_token("abc").unwrap();
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(store.load().unwrap(), Some("abc".to_string()));

        session.clear().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_session_open_reads_existing_token() {
        let store = Arc::new(MemoryTokenStore::with_token("persisted"));
        let session = Session::open(store).unwrap();
        assert_eq!(session.token(), Some("persisted"));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let session = Session::open(Arc::new(MemoryTokenStore::with_token("s3cr3t"))).unwrap();
        assert!(!format!("{session:?}").contains("s3cr3t"));
    }
}
