//! `window.localStorage` backend.
//! Persistent per origin. Writes can fail when the quota is exhausted.

use async_trait::async_trait;
use companion_core::ports::StoragePort;
use companion_types::{CompanionError, Result};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Fails when there is no window or the browser denies access.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| CompanionError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| CompanionError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| CompanionError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| CompanionError::Storage(format!("{:?}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CompanionError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| CompanionError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
