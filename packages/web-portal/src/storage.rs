//! localStorage-backed session storage.

#[cfg(feature = "web")]
pub use browser::LocalStorage;

/// Storage the portal keeps its session in.
#[cfg(feature = "web")]
pub fn session_storage() -> LocalStorage {
    LocalStorage
}

/// Without a browser there is nothing durable to write to.
#[cfg(not(feature = "web"))]
pub fn session_storage() -> treasury_client::MemoryStorage {
    treasury_client::MemoryStorage::new()
}

#[cfg(feature = "web")]
mod browser {
    use treasury_client::{SessionStorage, StorageError};

    /// `window.localStorage`, looked up on every call.
    ///
    /// `web_sys::Storage` is neither `Send` nor `Sync`, so the handle is
    /// never held.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorage;

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }

    impl SessionStorage for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}
