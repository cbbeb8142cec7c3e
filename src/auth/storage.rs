//! Durable storage for session state.
//!
//! Two channels with different sensitivity:
//! - the session snapshot, a JSON file under the app data directory
//! - the credential token, held in the OS keyring
//!
//! Every operation is infallible at the signature level. When storage is
//! unavailable (missing keyring backend, unwritable directory) the console
//! degrades to a non-persistent session instead of failing; trouble is
//! logged and swallowed.

use std::path::PathBuf;
use std::sync::Mutex;

use keyring::Entry;
use tracing::warn;

use super::session::SessionSnapshot;

/// Snapshot file name in the data directory
const SNAPSHOT_FILE: &str = "greenride-auth.json";

/// Keyring service for the credential token
const SERVICE_NAME: &str = "greenride-ops";

/// Keyring account under which the token is filed
const TOKEN_ACCOUNT: &str = "session-token";

pub trait SessionStorage: Send + Sync {
    fn load_snapshot(&self) -> Option<SessionSnapshot>;
    fn store_snapshot(&self, snapshot: &SessionSnapshot);
    fn clear_snapshot(&self);
    fn load_token(&self) -> Option<String>;
    fn store_token(&self, token: &str);
    fn clear_token(&self);
}

/// Production storage: snapshot on disk, token in the OS keyring.
pub struct DiskStorage {
    data_dir: PathBuf,
}

impl DiskStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            warn!(error = %e, dir = %data_dir.display(), "Could not create data directory; session will not persist");
        }
        Self { data_dir }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    fn token_entry() -> Option<Entry> {
        match Entry::new(SERVICE_NAME, TOKEN_ACCOUNT) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Keyring unavailable; token will not persist");
                None
            }
        }
    }
}

impl SessionStorage for DiskStorage {
    fn load_snapshot(&self) -> Option<SessionSnapshot> {
        let path = self.snapshot_path();
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to read session snapshot");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Session snapshot is corrupt; ignoring it");
                None
            }
        }
    }

    fn store_snapshot(&self, snapshot: &SessionSnapshot) {
        let contents = match serde_json::to_string_pretty(snapshot) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session snapshot");
                return;
            }
        };
        if let Err(e) = std::fs::write(self.snapshot_path(), contents) {
            warn!(error = %e, "Failed to write session snapshot");
        }
    }

    fn clear_snapshot(&self) {
        let path = self.snapshot_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to remove session snapshot");
            }
        }
    }

    fn load_token(&self) -> Option<String> {
        let entry = Self::token_entry()?;
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read token from keyring");
                None
            }
        }
    }

    fn store_token(&self, token: &str) {
        if let Some(entry) = Self::token_entry() {
            if let Err(e) = entry.set_password(token) {
                warn!(error = %e, "Failed to store token in keyring");
            }
        }
    }

    fn clear_token(&self) {
        if let Some(entry) = Self::token_entry() {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!(error = %e, "Failed to remove token from keyring"),
            }
        }
    }
}

/// Process-local storage, used in tests and as the fallback when no data
/// directory can be resolved. A poisoned lock is treated the same as
/// unavailable storage.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<SessionSnapshot>>,
    token: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load_snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }

    fn store_snapshot(&self, snapshot: &SessionSnapshot) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(snapshot.clone());
        }
    }

    fn clear_snapshot(&self) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = None;
        }
    }

    fn load_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn store_token(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear_token(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_keeps_channels_separate() {
        let storage = MemoryStorage::new();
        storage.store_token("tok-1");

        assert_eq!(storage.load_token().as_deref(), Some("tok-1"));
        assert!(storage.load_snapshot().is_none());

        storage.clear_token();
        assert!(storage.load_token().is_none());
    }

    #[test]
    fn test_disk_snapshot_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = DiskStorage::new(dir.path().to_path_buf());
        assert!(storage.load_snapshot().is_none());

        let snapshot = SessionSnapshot {
            identity: None,
            is_authenticated: false,
        };
        storage.store_snapshot(&snapshot);
        assert_eq!(storage.load_snapshot(), Some(snapshot));

        storage.clear_snapshot();
        assert!(storage.load_snapshot().is_none());
        // Clearing twice is a no-op, not an error
        storage.clear_snapshot();
    }

    #[test]
    fn test_corrupt_snapshot_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = DiskStorage::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "{not json")
            .expect("write corrupt file");

        assert!(storage.load_snapshot().is_none());
    }

    #[test]
    fn test_unwritable_data_dir_is_a_noop() {
        // A path under a regular file can never be created
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").expect("write blocker");

        let storage = DiskStorage::new(blocker.join("nested"));
        let snapshot = SessionSnapshot {
            identity: None,
            is_authenticated: false,
        };
        storage.store_snapshot(&snapshot);
        assert!(storage.load_snapshot().is_none());
    }
}
