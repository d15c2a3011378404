use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::StorageError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";
pub const USER_ROLE_KEY: &str = "user_role";
pub const MINISTRY_ID_KEY: &str = "ministry_id";
pub const OFFICE_NAME_KEY: &str = "office_name";
pub const WALLET_ADDRESS_KEY: &str = "wallet_address";

/// Every key a session writes. Logout removes all of them together.
pub const SESSION_KEYS: [&str; 7] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_KEY,
    USER_ROLE_KEY,
    MINISTRY_ID_KEY,
    OFFICE_NAME_KEY,
    WALLET_ADDRESS_KEY,
];

/// Durable client-side key/value storage for the session.
///
/// Synchronous on purpose: browser `localStorage` is synchronous and the gate
/// must be restorable before the first render.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn clear_session(&self) -> Result<(), StorageError> {
        for key in SESSION_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// JSON file storage for terminal clients.
///
/// The whole map is rewritten through a temporary file on every change, and
/// the file is deleted once the last key is removed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened session file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            restrict_permissions(&file)?;
            file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear_session(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !SESSION_KEYS.contains(&key.as_str()));
        if entries.len() != before {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clears_every_session_key() {
        let storage = MemoryStorage::new();
        for key in SESSION_KEYS {
            storage.set(key, "value").unwrap();
        }
        storage.set("theme", "dark").unwrap();

        storage.clear_session().unwrap();

        for key in SESSION_KEYS {
            assert_eq!(storage.get(key).unwrap(), None);
        }
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "token-1").unwrap();
        storage.set(OFFICE_NAME_KEY, "FinanceOffice").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("token-1")
        );
        assert_eq!(
            reopened.get(OFFICE_NAME_KEY).unwrap().as_deref(),
            Some("FinanceOffice")
        );
    }

    #[test]
    fn file_storage_removes_file_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "token-1").unwrap();
        assert!(path.exists());

        storage.clear_session().unwrap();
        assert!(!path.exists());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Encoding(_))
        ));
    }
}
