//! Key/value storage behind the save blob

use std::collections::HashMap;

/// String storage keyed by name. Failures are reported, never raised.
pub trait SaveBackend {
    fn read(&self, key: &str) -> Option<String>;

    /// Returns false when the write did not happen
    fn write(&mut self, key: &str, value: &str) -> bool;
}

/// In-process storage (native builds and tests)
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with one stored value
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut backend = Self::new();
        backend.items.insert(key.to_string(), value.to_string());
        backend
    }
}

impl SaveBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Option<String> {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, starting fresh");
            return None;
        };
        storage.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) -> bool {
        let Some(storage) = Self::storage() else {
            return false;
        };
        storage.set_item(key, value).is_ok()
    }
}
