// Allow dead code: store implementations are also constructed from tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Access to the persisted bearer token.
///
/// The API client is handed a `TokenStore` rather than reaching for a
/// global: every outgoing request reads the token through it, and the
/// 401 handler clears it through it. Implementations are shared across
/// in-flight requests; a request that reads a token just before a
/// concurrent clear simply earns its own 401 and the same recovery.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Clearing an absent token is a no-op.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(access_token: String, email: String) -> Self {
        Self {
            access_token,
            email,
            created_at: Utc::now(),
        }
    }

    /// Minutes since login, for the status line.
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.created_at).num_minutes().max(0)
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m", minutes)
        } else {
            format!("{}h{:02}m", minutes / 60, minutes % 60)
        }
    }
}

/// File-backed token store, persisting the session as JSON in the
/// application data directory.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Load the full session record, if present.
    pub fn read(&self) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    /// Persist a full session record (login path).
    pub fn write(&self, data: &SessionData) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl TokenStore for SessionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read()?.map(|data| data.access_token))
    }

    fn save(&self, token: &str) -> Result<()> {
        // Preserve the recorded email when only the token changes
        let email = self
            .read()
            .unwrap_or(None)
            .map(|data| data.email)
            .unwrap_or_default();
        self.write(&SessionData::new(token.to_string(), email))
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// In-memory token store for tests and ephemeral runs.
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .read()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?
            .clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))? =
            Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().to_path_buf());

        assert!(store.load().expect("load").is_none());

        let data = SessionData::new("abc123".to_string(), "alice@example.com".to_string());
        store.write(&data).expect("write");

        assert_eq!(store.load().expect("load").as_deref(), Some("abc123"));
        let read_back = store.read().expect("read").expect("present");
        assert_eq!(read_back.email, "alice@example.com");
    }

    #[test]
    fn test_session_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().to_path_buf());

        // Clearing an empty store must succeed
        store.clear().expect("clear empty");

        let data = SessionData::new("abc123".to_string(), String::new());
        store.write(&data).expect("write");
        store.clear().expect("clear");
        store.clear().expect("clear again");
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_save_preserves_email() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().to_path_buf());

        store
            .write(&SessionData::new(
                "old".to_string(),
                "alice@example.com".to_string(),
            ))
            .expect("write");
        store.save("new").expect("save");

        let data = store.read().expect("read").expect("present");
        assert_eq!(data.access_token, "new");
        assert_eq!(data.email, "alice@example.com");
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert!(store.load().expect("load").is_none());

        store.save("tok").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("tok"));

        store.clear().expect("clear");
        store.clear().expect("clear again");
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn test_session_age_display() {
        let mut data = SessionData::new("t".to_string(), String::new());
        assert_eq!(data.age_display(), "just now");

        data.created_at = Utc::now() - chrono::Duration::minutes(5);
        assert_eq!(data.age_display(), "5m");

        data.created_at = Utc::now() - chrono::Duration::minutes(125);
        assert_eq!(data.age_display(), "2h05m");
    }
}
